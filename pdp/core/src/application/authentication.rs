// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Authentication stage.
//!
//! Checks that a call carries both a caller id and a device id before any
//! lookup or network call happens. It says nothing about whether the caller
//! is allowed; that is the aggregator's job.

use crate::domain::error::AccessError;

/// Request metadata header carrying the caller id.
pub const CALLER_ID_HEADER: &str = "x-user-id";
/// Request metadata header carrying the device id.
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Caller and device ids, both present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerCredentials {
    pub caller_id: String,
    pub device_id: String,
}

impl CallerCredentials {
    /// Empty and whitespace-only values count as absent.
    pub fn authenticate(
        caller_id: Option<&str>,
        device_id: Option<&str>,
    ) -> Result<Self, AccessError> {
        let present = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (present(caller_id), present(device_id)) {
            (Some(caller_id), Some(device_id)) => Ok(Self {
                caller_id,
                device_id,
            }),
            _ => Err(AccessError::CredentialsMissing),
        }
    }
}
