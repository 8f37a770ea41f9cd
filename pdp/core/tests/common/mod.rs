// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

#![allow(dead_code)]

use std::time::Duration;

use aegis_pdp_core::infrastructure::{HttpDevicePostureClient, HttpPolicyEngineClient};

pub const UPSTREAM_TIMEOUT: Duration = Duration::from_millis(500);
pub const HEALTH_TIMEOUT: Duration = Duration::from_millis(200);

pub fn policy_client(base_url: &str) -> HttpPolicyEngineClient {
    HttpPolicyEngineClient::new(base_url, UPSTREAM_TIMEOUT, HEALTH_TIMEOUT)
}

pub fn posture_client(base_url: &str) -> HttpDevicePostureClient {
    HttpDevicePostureClient::new(base_url, UPSTREAM_TIMEOUT, HEALTH_TIMEOUT)
}

/// Base URL of a port nothing listens on.
pub async fn refused_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Base URL of a server that accepts connections and never answers.
pub async fn silent_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{}", addr)
}
