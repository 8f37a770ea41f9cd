// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Static identity catalog.
//!
//! Read-only lookup table built once at startup and shared across every
//! request without locking. Stands in for a real directory service behind
//! [`IdentityResolver`].

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::domain::error::CatalogError;
use crate::domain::identity::{ClearanceLevel, Identity, IdentityResolver};

#[derive(Debug, Clone, Default)]
pub struct StaticIdentityCatalog {
    identities: BTreeMap<String, Identity>,
}

impl StaticIdentityCatalog {
    pub fn from_identities(
        identities: impl IntoIterator<Item = Identity>,
    ) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for identity in identities {
            if map.contains_key(&identity.id) {
                return Err(CatalogError::DuplicateIdentity(identity.id));
            }
            map.insert(identity.id.clone(), identity);
        }
        Ok(Self { identities: map })
    }

    /// Parse a YAML sequence of user documents.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let identities: Vec<Identity> = serde_yaml::from_str(yaml)?;
        Self::from_identities(identities)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// The four demo identities, one per access tier.
    pub fn demo() -> Self {
        let identities = [
            demo_identity("admin-001", "admin", "Admin User", "IT Security", ClearanceLevel::TopSecret, "admin"),
            demo_identity("manager-001", "manager", "Manager User", "Operations", ClearanceLevel::Secret, "manager"),
            demo_identity("user-001", "user", "Regular User", "Engineering", ClearanceLevel::Confidential, "user"),
            demo_identity("guest-001", "guest", "Guest User", "External", ClearanceLevel::Public, "guest"),
        ];
        Self {
            identities: identities
                .into_iter()
                .map(|identity| (identity.id.clone(), identity))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Identity> {
        self.identities.get(id)
    }
}

fn demo_identity(
    id: &str,
    mailbox: &str,
    display_name: &str,
    department: &str,
    clearance_level: ClearanceLevel,
    role: &str,
) -> Identity {
    Identity {
        id: id.to_string(),
        email: format!("{}@zerotrust.local", mailbox),
        display_name: display_name.to_string(),
        department: department.to_string(),
        clearance_level,
        roles: BTreeSet::from([role.to_string()]),
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityCatalog {
    async fn resolve(&self, id: &str) -> Option<Identity> {
        self.identities.get(id).cloned()
    }

    async fn list(&self) -> Vec<Identity> {
        self.identities.values().cloned().collect()
    }
}
