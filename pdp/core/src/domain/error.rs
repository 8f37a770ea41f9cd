// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Error taxonomy of the decision pipeline.
//!
//! | Condition | Surfaced as |
//! |-----------|-------------|
//! | caller or device id absent | [`AccessError::CredentialsMissing`] (401) |
//! | caller id unresolved | [`AccessError::IdentityNotFound`] (404) |
//! | engine said no, or gave no usable answer | [`AccessError::Denied`] (403) |
//! | upstream unreachable / timed out / malformed | [`UpstreamError`], absorbed into a deny |
//!
//! `Denied` carries no cause: an outage and an explicit "no" look identical
//! to the caller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Missing credentials")]
    CredentialsMissing,

    #[error("Identity not found: {0}")]
    IdentityNotFound(String),

    #[error("Access denied")]
    Denied,
}

impl AccessError {
    /// HTTP status expected by callers of the gateway.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::CredentialsMissing => 401,
            AccessError::IdentityNotFound(_) => 404,
            AccessError::Denied => 403,
        }
    }
}

/// Failure talking to the policy engine or posture service.
///
/// Never returned from a public client operation; each client converts it to
/// its fail-closed value and logs it.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected status: HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Duplicate identity id: {0}")]
    DuplicateIdentity(String),
}
