// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::resource::{Classification, Resource};

/// Read-only catalog of protected resources, in display order.
#[derive(Debug, Clone, Default)]
pub struct StaticResourceCatalog {
    resources: Vec<Resource>,
}

impl StaticResourceCatalog {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    /// Illustrative catalog: one resource per classification tier.
    pub fn demo() -> Self {
        Self::new(vec![
            Resource::new(1, "Public Info", Classification::Public, false),
            Resource::new(2, "Internal Memo", Classification::Internal, false),
            Resource::new(3, "Financial Report", Classification::Confidential, true),
            Resource::new(4, "Security Audit", Classification::Secret, true),
            Resource::new(5, "Incident Plan", Classification::TopSecret, true),
        ])
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }
}
