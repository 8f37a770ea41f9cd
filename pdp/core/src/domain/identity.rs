// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Identity Domain Module
//!
//! Caller identity records and the resolver seam used by the decision
//! aggregator. Identities are immutable once loaded: the gateway looks them
//! up by id and never writes them back.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Identity value objects and the `IdentityResolver` trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordered clearance tiers: `public < confidential < secret < top_secret`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearanceLevel {
    Public,
    Confidential,
    Secret,
    TopSecret,
}

/// A resolved caller.
///
/// The serialized form is the user document policies are written against
/// (`user_id`, `full_name`, `realm_access.roles`), so catalog files and
/// policy input share one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub department: String,
    pub clearance_level: ClearanceLevel,
    pub roles: BTreeSet<String>,
}

impl Identity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

#[derive(Serialize, Deserialize)]
struct RealmAccess {
    #[serde(default)]
    roles: BTreeSet<String>,
}

#[derive(Serialize, Deserialize)]
struct UserDocument {
    user_id: String,
    email: String,
    full_name: String,
    department: String,
    clearance_level: ClearanceLevel,
    realm_access: RealmAccess,
}

impl Serialize for Identity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        UserDocument {
            user_id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.display_name.clone(),
            department: self.department.clone(),
            clearance_level: self.clearance_level,
            realm_access: RealmAccess {
                roles: self.roles.clone(),
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = UserDocument::deserialize(deserializer)?;
        Ok(Self {
            id: doc.user_id,
            email: doc.email,
            display_name: doc.full_name,
            department: doc.department,
            clearance_level: doc.clearance_level,
            roles: doc.realm_access.roles,
        })
    }
}

/// Maps an opaque caller identifier to an identity record.
///
/// Lookups are pure: no side effects, and an absent id is `None` rather than
/// an error so callers have to branch on it.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, id: &str) -> Option<Identity>;

    /// Every identity known to the resolver, in id order.
    async fn list(&self) -> Vec<Identity>;
}
