// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Decision Domain Module
//!
//! The request submitted to the external policy engine and the verdict the
//! gateway derives from its answer.
//!
//! ## Fail-closed
//!
//! A [`Decision`] only allows when the engine produced a definitive boolean
//! `true`. Timeouts, transport errors, non-success statuses, malformed bodies
//! and missing fields all produce `allow = false`.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::device::DevicePosture;
use super::identity::Identity;

/// Split a request path into the ordered segments the policy engine matches on.
///
/// Leading and trailing separators are trimmed; interior empty segments are
/// kept so `/a//b` stays distinguishable from `/a/b`. The root path has no
/// segments.
pub fn normalize_path(path: &str) -> Vec<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').map(str::to_string).collect()
}

/// Exact, order-preserving input to one policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRequest {
    pub identity: Identity,
    pub posture: DevicePosture,
    pub method: String,
    pub path_segments: Vec<String>,
}

impl DecisionRequest {
    pub fn new(identity: Identity, posture: DevicePosture, method: &str, path: &str) -> Self {
        Self {
            identity,
            posture,
            method: method.to_ascii_uppercase(),
            path_segments: normalize_path(path),
        }
    }

    /// Wire body for the policy engine's data API.
    pub fn to_policy_input(&self) -> PolicyInput<'_> {
        PolicyInput::new(
            Some(&self.identity),
            &self.posture,
            &self.method,
            &self.path_segments,
        )
    }
}

/// `{"input": {...}}` envelope posted to the policy engine.
#[derive(Debug, Serialize)]
pub struct PolicyInput<'a> {
    pub input: PolicyInputBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct PolicyInputBody<'a> {
    pub user: Subject<'a>,
    pub device: &'a DevicePosture,
    pub method: &'a str,
    pub path: &'a [String],
}

/// The `user` member of the policy input. Anonymous callers (diagnostics
/// only) serialize as an empty object.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Subject<'a> {
    Known(&'a Identity),
    Anonymous {},
}

impl<'a> PolicyInput<'a> {
    pub fn new(
        identity: Option<&'a Identity>,
        device: &'a DevicePosture,
        method: &'a str,
        path: &'a [String],
    ) -> Self {
        let user = match identity {
            Some(identity) => Subject::Known(identity),
            None => Subject::Anonymous {},
        };
        Self {
            input: PolicyInputBody {
                user,
                device,
                method,
                path,
            },
        }
    }
}

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub allow: bool,
    /// Engine response body, when one was received and parsed.
    pub raw_verdict: Option<Value>,
}

impl Decision {
    /// Interpret an engine response body: only a boolean `true` at `result`
    /// allows.
    pub fn from_verdict(body: Value) -> Self {
        let allow = matches!(body.get("result"), Some(Value::Bool(true)));
        Self {
            allow,
            raw_verdict: Some(body),
        }
    }

    /// Deny without a verdict, for when the engine could not be consulted.
    pub fn fail_closed() -> Self {
        Self {
            allow: false,
            raw_verdict: None,
        }
    }
}

/// External policy engine.
///
/// `evaluate` is the only authority for access; `diagnose` returns the raw
/// diagnostic document (or an `{"error": ...}` descriptor) and must never be
/// used to gate a request.
#[async_trait]
pub trait PolicyEngine: Send + Sync {
    async fn evaluate(&self, request: &DecisionRequest) -> Decision;

    async fn diagnose(&self, input: &PolicyInput<'_>) -> Value;

    /// Bounded-timeout reachability probe.
    async fn health_check(&self) -> bool;
}
