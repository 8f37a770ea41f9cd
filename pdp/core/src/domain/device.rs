// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Device Posture Domain Module
//!
//! Normalized device trust posture as seen by the policy engine. A posture is
//! produced fresh for every authorization call and never cached: the device
//! may have changed since the last request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Coarse trust tier reported by the posture service.
///
/// Any value the gateway does not recognize deserializes as `Unknown`, the
/// most restrictive tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Low,
    Medium,
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePosture {
    pub device_id: String,
    pub trusted: bool,
    /// 0..=100
    pub compliance_score: u8,
    pub trust_level: TrustLevel,
}

impl DevicePosture {
    /// Most restrictive posture, used whenever the posture service cannot
    /// give a definitive answer.
    pub fn untrusted(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            trusted: false,
            compliance_score: 0,
            trust_level: TrustLevel::Unknown,
        }
    }

    /// Clamp an upstream score into `0..=100`. Non-finite values count as 0.
    pub fn clamp_score(raw: f64) -> u8 {
        if !raw.is_finite() {
            return 0;
        }
        raw.round().clamp(0.0, 100.0) as u8
    }
}

/// Source of device posture.
///
/// `fetch` never fails the caller: implementations degrade to
/// [`DevicePosture::untrusted`] on any upstream problem.
#[async_trait]
pub trait DevicePostureProvider: Send + Sync {
    async fn fetch(&self, device_id: &str, identity_id: &str) -> DevicePosture;

    /// Bounded-timeout reachability probe.
    async fn health_check(&self) -> bool;
}
