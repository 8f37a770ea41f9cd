// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`aegis-pdp-core`)
//!
//! HTTP surface that translates inbound calls into application service
//! calls. **No decision logic lives here**: handlers only extract caller
//! metadata, call the aggregator and shape the response.
//!
//! | Module | Transport | Description |
//! |--------|-----------|-------------|
//! | [`api`] | HTTP (Axum) | Protected API, health and diagnostic endpoints |

pub mod api;
