// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! One-shot authorization against the configured upstreams.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use aegis_pdp_core::application::Authorization;
use aegis_pdp_core::presentation::api::AppState;

#[derive(Args)]
pub struct CheckArgs {
    /// Caller identity id
    #[arg(long)]
    pub user: String,

    /// Device id
    #[arg(long)]
    pub device: String,

    /// HTTP method of the simulated request
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Resource path of the simulated request
    #[arg(long, default_value = "/api/data")]
    pub path: String,
}

/// Fails when the request would not be allowed, so the exit code carries the verdict.
pub async fn run(args: CheckArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_validated_config(config_path)?;
    let state = AppState::from_config(&config).context("Failed to build gateway state")?;

    let auth = state
        .authorization
        .authorize(Some(args.user.as_str()), Some(args.device.as_str()), &args.method, &args.path)
        .await
        .with_context(|| format!("{} {} rejected", args.method, args.path))?;

    print_verdict(&args, &auth);

    if !auth.is_allowed() {
        anyhow::bail!("Access denied");
    }
    Ok(())
}

fn print_verdict(args: &CheckArgs, auth: &Authorization) {
    let verdict = if auth.is_allowed() {
        "ALLOW".green().bold()
    } else {
        "DENY".red().bold()
    };
    println!("{} {} {}", verdict, args.method.to_uppercase(), args.path);

    let roles: Vec<&str> = auth.identity.roles.iter().map(String::as_str).collect();
    println!(
        "  User: {} ({}) roles=[{}]",
        auth.identity.id,
        auth.identity.email,
        roles.join(", ")
    );
    println!(
        "  Device: {} trusted={} score={} level={:?}",
        auth.posture.device_id,
        auth.posture.trusted,
        auth.posture.compliance_score,
        auth.posture.trust_level
    );
    if let Some(verdict) = &auth.decision.raw_verdict {
        println!("  Policy: {}", verdict.to_string().dimmed());
    }
}
