//! Default role resolution for new accounts

use tracing::{error, info};

use crate::domain::role::{Role, RoleId, RoleRepository};
use crate::domain::DomainError;

/// Holds the role attached to every newly registered account
///
/// The role is looked up once, when the provisioner is built at startup. A
/// missing role is a configuration error: the caller should abort rather
/// than start serving requests.
#[derive(Debug, Clone)]
pub struct RoleProvisioner {
    default_role: Role,
}

impl RoleProvisioner {
    /// Resolve the configured default role through `lookup`
    pub async fn initialize<L>(lookup: &L, default_role_id: &RoleId) -> Result<Self, DomainError>
    where
        L: RoleRepository + ?Sized,
    {
        match lookup.find_by_id(default_role_id).await? {
            Some(role) => {
                info!(role_id = %role.id(), role_name = %role.name(), "Default role resolved");
                Ok(Self { default_role: role })
            }
            None => {
                error!(role_id = %default_role_id, "Configured default role does not exist");
                Err(DomainError::role_not_found(default_role_id))
            }
        }
    }

    /// Build a provisioner around an already resolved role
    pub fn with_role(default_role: Role) -> Self {
        Self { default_role }
    }

    pub fn default_role(&self) -> &Role {
        &self.default_role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::role::InMemoryRoleRepository;

    const DEFAULT_ROLE_ID: &str = "d29e709c-0ff1-4f4c-a7ef-09f656c390f1";

    #[tokio::test]
    async fn test_initialize_resolves_role() {
        let role_id = RoleId::parse(DEFAULT_ROLE_ID).unwrap();
        let role = Role::new(role_id, "USER").unwrap();
        let lookup = InMemoryRoleRepository::with_roles(vec![role.clone()]);

        let provisioner = RoleProvisioner::initialize(&lookup, &role_id).await.unwrap();

        assert_eq!(provisioner.default_role(), &role);
    }

    #[tokio::test]
    async fn test_missing_role_is_fatal() {
        let role_id = RoleId::parse(DEFAULT_ROLE_ID).unwrap();
        let lookup = InMemoryRoleRepository::new();

        let error = RoleProvisioner::initialize(&lookup, &role_id)
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::RoleNotFound { ref role_id } if role_id == DEFAULT_ROLE_ID));
        assert!(error.is_fatal());
    }
}
