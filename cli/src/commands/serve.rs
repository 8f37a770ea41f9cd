// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Gateway server
//!
//! Binds the HTTP surface from `aegis_pdp_core::presentation::api` and runs
//! until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use aegis_pdp_core::domain::gateway_config::GatewayConfig;
use aegis_pdp_core::presentation::api::{app, AppState};

#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (overrides server.bind_address)
    #[arg(long, env = "AEGIS_PDP_HOST")]
    pub host: Option<String>,

    /// Listen port (overrides server.port)
    #[arg(long, env = "AEGIS_PDP_PORT")]
    pub port: Option<u16>,

    /// Expose Prometheus metrics on this port
    #[arg(long, env = "AEGIS_PDP_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

pub async fn run(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config =
        GatewayConfig::load_or_default(config_path).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.bind_address = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config
        .validate()
        .context("Configuration validation failed")?;

    if let Some(metrics_port) = args.metrics_port {
        install_metrics_exporter(&config.server.bind_address, metrics_port).await?;
    }

    let state = AppState::from_config(&config).context("Failed to build gateway state")?;

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        policy_engine = %config.policy_engine.url,
        device_posture = %config.device_posture.url,
        "PDP gateway listening on {}",
        addr
    );
    println!("{} {}", "✓ PDP gateway listening on".green(), addr.bold());

    axum::serve(listener, app(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("PDP gateway shutting down");

    Ok(())
}

async fn install_metrics_exporter(host: &str, port: u16) -> Result<()> {
    let addr = resolve_listen_addr(host, port).await?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Prometheus metrics exposed on {}", addr);
    Ok(())
}

/// Resolve a bind host (IP literal or hostname) to a socket address.
async fn resolve_listen_addr(host: &str, port: u16) -> Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("Failed to resolve listen address {}:{}", host, port))?
        .next()
        .with_context(|| format!("No address found for {}:{}", host, port))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listen_addr_accepts_ip_literal() {
        let addr = resolve_listen_addr("0.0.0.0", 9090).await.unwrap();
        assert!(addr.ip().is_unspecified());
        assert_eq!(addr.port(), 9090);
    }

    #[tokio::test]
    async fn test_listen_addr_resolves_hostname() {
        let addr = resolve_listen_addr("localhost", 9091).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9091);
    }
}
