// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer (`aegis-pdp-core`)
//!
//! Value types of the decision pipeline and the traits behind which the
//! external collaborators (identity directory, device posture service,
//! policy engine) sit.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identity`] | `Identity`, `ClearanceLevel`, `IdentityResolver` |
//! | [`device`] | `DevicePosture`, `TrustLevel`, `DevicePostureProvider` |
//! | [`decision`] | `DecisionRequest`, `Decision`, `PolicyEngine` |
//! | [`resource`] | `Resource`, `Classification` |
//! | [`error`] | `AccessError`, `UpstreamError`, `CatalogError` |
//! | [`gateway_config`] | `GatewayConfig` |

pub mod decision;
pub mod device;
pub mod error;
pub mod gateway_config;
pub mod identity;
pub mod resource;
