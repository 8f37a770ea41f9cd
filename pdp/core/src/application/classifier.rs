// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Resource Classifier
//!
//! Shapes an allowed response: which protected resources the caller sees
//! depends on the highest access tier its roles grant.
//!
//! | Tier | Granted by | Visible classifications |
//! |------|------------|-------------------------|
//! | `Admin` | `admin` | all |
//! | `Manager` | `manager` | public, internal, confidential |
//! | `User` | `user` | public, internal |
//! | `Public` | anything else | public |
//!
//! Tiers are not additive: the first matching row wins.
//!
//! Only call this after the aggregator allowed the request. It never decides
//! access itself.

use std::collections::BTreeSet;

use crate::domain::resource::{Classification, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    Admin,
    Manager,
    User,
    Public,
}

impl AccessTier {
    pub fn from_roles(roles: &BTreeSet<String>) -> Self {
        if roles.contains("admin") {
            AccessTier::Admin
        } else if roles.contains("manager") {
            AccessTier::Manager
        } else if roles.contains("user") {
            AccessTier::User
        } else {
            AccessTier::Public
        }
    }

    pub fn visible_classifications(self) -> &'static [Classification] {
        use Classification::*;
        match self {
            AccessTier::Admin => &[Public, Internal, Confidential, Secret, TopSecret],
            AccessTier::Manager => &[Public, Internal, Confidential],
            AccessTier::User => &[Public, Internal],
            AccessTier::Public => &[Public],
        }
    }

    pub fn can_see(self, classification: Classification) -> bool {
        self.visible_classifications().contains(&classification)
    }
}

/// Resources visible to a caller holding `roles`, in catalog order.
pub fn filter(resources: &[Resource], roles: &BTreeSet<String>) -> Vec<Resource> {
    let tier = AccessTier::from_roles(roles);
    resources
        .iter()
        .filter(|resource| tier.can_see(resource.classification))
        .cloned()
        .collect()
}
