//! Role repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Role, RoleId};
use crate::domain::DomainError;

/// Lookup for roles maintained elsewhere
#[async_trait]
pub trait RoleRepository: Send + Sync + Debug {
    /// Get a role by ID
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, DomainError>;

    /// Insert or replace a role (used for seeding)
    async fn save(&self, role: Role) -> Result<Role, DomainError>;
}
