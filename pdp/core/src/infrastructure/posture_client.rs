// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Device Posture Service Adapter
//!
//! Anti-Corruption Layer for the external device posture service.
//!
//! ```text
//! POST {base}/api/check  {"device_id": .., "user_id": ..}
//!   -> {"trusted": bool, "compliance_score": number, "trust_level": string}
//! GET  {base}/health     -> 200 when reachable
//! ```
//!
//! Every failure (timeout, transport error, any status but 200, undecodable
//! body) degrades to [`DevicePosture::untrusted`]; nothing is propagated.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::device::{DevicePosture, DevicePostureProvider, TrustLevel};
use crate::domain::error::UpstreamError;

const CHECK_PATH: &str = "/api/check";
const HEALTH_PATH: &str = "/health";

pub struct HttpDevicePostureClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
}

#[derive(Serialize)]
struct PostureCheckRequest<'a> {
    device_id: &'a str,
    user_id: &'a str,
}

#[derive(Deserialize)]
struct PostureCheckResponse {
    #[serde(default)]
    trusted: Option<bool>,
    #[serde(default)]
    compliance_score: Option<f64>,
    #[serde(default)]
    trust_level: Option<TrustLevel>,
}

impl HttpDevicePostureClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, health_timeout: Duration) -> Self {
        Self::with_client(Client::new(), base_url, timeout, health_timeout)
    }

    /// Reuse an existing connection pool.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        timeout: Duration,
        health_timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
            health_timeout,
        }
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn try_fetch(&self, device_id: &str, identity_id: &str) -> Result<DevicePosture, UpstreamError> {
        let url = self.build_url(CHECK_PATH);
        debug!(%url, device_id, identity_id, "Requesting device posture");

        let response = self
            .client
            .post(&url)
            .json(&PostureCheckRequest {
                device_id,
                user_id: identity_id,
            })
            .timeout(self.timeout)
            .send()
            .await?;

        // Only a plain 200 carries a definitive answer.
        if response.status() != StatusCode::OK {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }

        let body: PostureCheckResponse = response.json().await?;

        Ok(DevicePosture {
            device_id: device_id.to_string(),
            trusted: body.trusted.unwrap_or(false),
            compliance_score: body.compliance_score.map(DevicePosture::clamp_score).unwrap_or(0),
            trust_level: body.trust_level.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl DevicePostureProvider for HttpDevicePostureClient {
    async fn fetch(&self, device_id: &str, identity_id: &str) -> DevicePosture {
        match self.try_fetch(device_id, identity_id).await {
            Ok(posture) => posture,
            Err(e) => {
                warn!(device_id, error = %e, "Device posture unavailable, assuming untrusted device");
                DevicePosture::untrusted(device_id)
            }
        }
    }

    async fn health_check(&self) -> bool {
        let result = self
            .client
            .get(self.build_url(HEALTH_PATH))
            .timeout(self.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!(error = %e, "Device posture health probe failed");
                false
            }
        }
    }
}
