// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod identity_catalog;
pub mod policy_client;
pub mod posture_client;
pub mod resource_catalog;

pub use identity_catalog::StaticIdentityCatalog;
pub use policy_client::HttpPolicyEngineClient;
pub use posture_client::HttpDevicePostureClient;
pub use resource_catalog::StaticResourceCatalog;
