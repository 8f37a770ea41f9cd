// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

/// Sensitivity tier of a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Public,
    Internal,
    Confidential,
    Secret,
    TopSecret,
}

/// An entry of the read-only protected resource catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: u32,
    pub title: String,
    pub classification: Classification,
    pub sensitive: bool,
}

impl Resource {
    pub fn new(id: u32, title: &str, classification: Classification, sensitive: bool) -> Self {
        Self {
            id,
            title: title.to_string(),
            classification,
            sensitive,
        }
    }
}
