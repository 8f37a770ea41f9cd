// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Diagnostic Reporter
//!
//! Observational snapshot for operators: identity lookup, device posture,
//! the policy engine's diagnostic document and upstream reachability.
//!
//! Nothing here gates access. Every failure is reported as a field value,
//! so `diagnose` has no error path.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::decision::{normalize_path, PolicyEngine, PolicyInput};
use crate::domain::device::{DevicePosture, DevicePostureProvider};
use crate::domain::identity::IdentityResolver;

/// Stand-in for a caller or device id that was not supplied.
pub const UNKNOWN_ID: &str = "unknown";

const DIAGNOSTIC_METHOD: &str = "GET";
const DIAGNOSTIC_PATH: &str = "/api/diagnostic";

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticSnapshot {
    pub timestamp: DateTime<Utc>,
    pub user: IdentityReport,
    pub device: DevicePosture,
    /// Raw diagnostic document, or `{"error": ...}`.
    pub policy_diagnostic: Value,
    pub system_status: UpstreamStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityReport {
    pub id: String,
    pub exists: bool,
    pub roles: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpstreamStatus {
    pub policy_engine_connected: bool,
    pub device_posture_connected: bool,
}

pub struct DiagnosticReporter {
    identities: Arc<dyn IdentityResolver>,
    posture: Arc<dyn DevicePostureProvider>,
    policy: Arc<dyn PolicyEngine>,
}

impl DiagnosticReporter {
    pub fn new(
        identities: Arc<dyn IdentityResolver>,
        posture: Arc<dyn DevicePostureProvider>,
        policy: Arc<dyn PolicyEngine>,
    ) -> Self {
        Self {
            identities,
            posture,
            policy,
        }
    }

    /// Probe both upstreams concurrently.
    pub async fn upstream_status(&self) -> UpstreamStatus {
        let (policy_engine_connected, device_posture_connected) =
            tokio::join!(self.policy.health_check(), self.posture.health_check());
        UpstreamStatus {
            policy_engine_connected,
            device_posture_connected,
        }
    }

    pub async fn diagnose(&self, caller_id: Option<&str>, device_id: Option<&str>) -> DiagnosticSnapshot {
        let caller_id = caller_id.filter(|id| !id.is_empty()).unwrap_or(UNKNOWN_ID);
        let device_id = device_id.filter(|id| !id.is_empty()).unwrap_or(UNKNOWN_ID);

        let identity = self.identities.resolve(caller_id).await;
        let device = self.posture.fetch(device_id, caller_id).await;

        let path = normalize_path(DIAGNOSTIC_PATH);
        let input = PolicyInput::new(identity.as_ref(), &device, DIAGNOSTIC_METHOD, &path);
        let policy_diagnostic = self.policy.diagnose(&input).await;

        let system_status = self.upstream_status().await;

        tracing::debug!(
            caller_id,
            identity_found = identity.is_some(),
            policy_engine_connected = system_status.policy_engine_connected,
            device_posture_connected = system_status.device_posture_connected,
            "Diagnostic snapshot assembled"
        );

        DiagnosticSnapshot {
            timestamp: Utc::now(),
            user: IdentityReport {
                id: caller_id.to_string(),
                exists: identity.is_some(),
                roles: identity.map(|identity| identity.roles).unwrap_or_default(),
            },
            device,
            policy_diagnostic,
            system_status,
        }
    }
}
