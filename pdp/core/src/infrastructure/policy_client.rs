// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Policy Engine Adapter
//!
//! Anti-Corruption Layer for an OPA-compatible data API.
//!
//! ```text
//! POST {base}/v1/data/zerotrust/allow       {"input": ..} -> {"result": bool}
//! POST {base}/v1/data/zerotrust/diagnostic  {"input": ..} -> opaque document
//! GET  {base}/health                        -> 200 when reachable
//! ```
//!
//! # Security
//!
//! `evaluate` allows only on an HTTP 200 whose body holds boolean `true`
//! at `result`. Every other outcome, including transport failures, is a
//! deny. Ambiguity never resolves to access.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::decision::{Decision, DecisionRequest, PolicyEngine, PolicyInput};
use crate::domain::error::UpstreamError;

const ALLOW_PATH: &str = "/v1/data/zerotrust/allow";
const DIAGNOSTIC_PATH: &str = "/v1/data/zerotrust/diagnostic";
const HEALTH_PATH: &str = "/health";

pub struct HttpPolicyEngineClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
}

impl HttpPolicyEngineClient {
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

    async fn post_input(&self, path: &str, input: &PolicyInput<'_>) -> Result<Value, UpstreamError> {
        let url = self.build_url(path);
        debug!(%url, "Submitting policy input");

        let response = self
            .client
            .post(&url)
            .json(input)
            .timeout(self.timeout)
            .send()
            .await?;

        // Only a plain 200 carries a definitive answer.
        if response.status() != StatusCode::OK {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PolicyEngine for HttpPolicyEngineClient {
    async fn evaluate(&self, request: &DecisionRequest) -> Decision {
        match self.post_input(ALLOW_PATH, &request.to_policy_input()).await {
            Ok(body) => {
                let decision = Decision::from_verdict(body);
                info!(
                    user_id = %request.identity.id,
                    method = %request.method,
                    path = ?request.path_segments,
                    allow = decision.allow,
                    "Policy engine verdict"
                );
                decision
            }
            Err(e) => {
                warn!(
                    user_id = %request.identity.id,
                    error = %e,
                    "Policy engine unavailable, denying"
                );
                Decision::fail_closed()
            }
        }
    }

    async fn diagnose(&self, input: &PolicyInput<'_>) -> Value {
        match self.post_input(DIAGNOSTIC_PATH, input).await {
            Ok(body) => body,
            Err(e) => json!({ "error": e.to_string() }),
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
                debug!(error = %e, "Policy engine health probe failed");
                false
            }
        }
    }
}
