//! In-memory role repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::role::{Role, RoleId, RoleRepository};
use crate::domain::DomainError;

/// In-memory implementation of RoleRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoleRepository {
    roles: Arc<RwLock<HashMap<RoleId, Role>>>,
}

impl InMemoryRoleRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial roles
    pub fn with_roles(roles: Vec<Role>) -> Self {
        let roles = roles.into_iter().map(|r| (*r.id(), r)).collect();

        Self {
            roles: Arc::new(RwLock::new(roles)),
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, DomainError> {
        let roles = self.roles.read().await;
        Ok(roles.get(id).cloned())
    }

    async fn save(&self, role: Role) -> Result<Role, DomainError> {
        let mut roles = self.roles.write().await;
        roles.insert(*role.id(), role.clone());
        Ok(role)
    }
}
