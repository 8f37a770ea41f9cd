// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use aegis_pdp_core::presentation::api::AppState;

#[derive(Args)]
pub struct DiagnoseArgs {
    /// Caller identity id
    #[arg(long)]
    pub user: Option<String>,

    /// Device id
    #[arg(long)]
    pub device: Option<String>,
}

pub async fn run(args: DiagnoseArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_validated_config(config_path)?;
    let state = AppState::from_config(&config).context("Failed to build gateway state")?;

    let snapshot = state
        .diagnostics
        .diagnose(args.user.as_deref(), args.device.as_deref())
        .await;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
