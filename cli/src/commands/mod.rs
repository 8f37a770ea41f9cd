// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the AEGIS PDP CLI

pub mod check;
pub mod config;
pub mod diagnose;
pub mod serve;

pub use self::config::ConfigCommand;

use anyhow::{Context, Result};
use std::path::PathBuf;

use aegis_pdp_core::domain::gateway_config::GatewayConfig;

/// Discover, load and validate the configuration for one-shot commands.
pub(crate) fn load_validated_config(config_path: Option<PathBuf>) -> Result<GatewayConfig> {
    let config =
        GatewayConfig::load_or_default(config_path).context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}
