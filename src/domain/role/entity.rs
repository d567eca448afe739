//! Role entity and related types

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when building roles
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoleValidationError {
    #[error("Invalid role ID: '{0}'")]
    InvalidId(String),

    #[error("Role name cannot be empty")]
    EmptyName,
}

/// Role identifier (UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Result<Self, RoleValidationError> {
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|_| RoleValidationError::InvalidId(id.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for RoleId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role entity: a named set of permission tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: String,
    permissions: BTreeSet<String>,
}

impl Role {
    /// Permission to edit an account
    pub const USER_MODIFY: &'static str = "USER_MODIFY";
    /// Permission to delete any account
    pub const USER_DEACTIVATE: &'static str = "USER_DEACTIVATE";

    /// Create a role without permissions
    pub fn new(id: RoleId, name: impl Into<String>) -> Result<Self, RoleValidationError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(RoleValidationError::EmptyName);
        }

        Ok(Self {
            id,
            name,
            permissions: BTreeSet::new(),
        })
    }

    /// Set permissions (builder pattern)
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &RoleId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}
