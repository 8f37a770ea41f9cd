// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! AEGIS Policy Decision Point
//!
//! Zero-trust authorization pipeline: every call is decided from the
//! caller's identity, the caller's device posture and the requested action,
//! with the verdict delegated to an external policy engine.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Decision aggregation, response classification and diagnostics

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
