// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application services of the decision pipeline.
//!
//! Authentication (are the ids present?) and authorization (does the policy
//! engine allow it?) are separate stages; the classifier only runs after an
//! allow and the diagnostic reporter never decides anything.

pub mod authentication;
pub mod authorization;
pub mod classifier;
pub mod diagnostics;

pub use authentication::CallerCredentials;
pub use authorization::{Authorization, AuthorizationService};
pub use diagnostics::{DiagnosticReporter, DiagnosticSnapshot};
