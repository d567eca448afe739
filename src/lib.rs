//! Account Registry
//!
//! User-account core: registration with age eligibility and default role
//! provisioning, profile lifecycle management and paginated admin search.
//! Storage is pluggable between memory and PostgreSQL.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use domain::{Clock, DefaultClock, DomainError, Role, RoleId, RoleRepository, UserRepository};
use infrastructure::{
    role::{InMemoryRoleRepository, PostgresRoleRepository, RoleProvisioner},
    storage::{connect_pool, run_account_migrations},
    user::{
        Argon2Hasher, InMemoryUserRepository, PasswordHasher, PostgresUserRepository,
        ProfileService, RegistrationService, UserSearchService,
    },
};
use crate::config::StorageBackend;
use tracing::info;

pub type DynRegistrationService = RegistrationService<dyn UserRepository, dyn PasswordHasher>;
pub type DynProfileService = ProfileService<dyn UserRepository, dyn PasswordHasher>;
pub type DynSearchService = UserSearchService<dyn UserRepository>;

/// Fully wired account services sharing one repository
#[derive(Debug, Clone)]
pub struct AppServices {
    pub registration: Arc<DynRegistrationService>,
    pub profiles: Arc<DynProfileService>,
    pub search: Arc<DynSearchService>,
    pub roles: Arc<RoleProvisioner>,
}

/// Parse the configured default role ID
pub fn default_role_id(config: &AppConfig) -> Result<RoleId, DomainError> {
    RoleId::parse(&config.accounts.default_role_id)
        .map_err(|e| DomainError::configuration(format!("accounts.default_role_id: {}", e)))
}

/// The configured default role, as seeded into fresh storage
pub fn default_role(config: &AppConfig) -> Result<Role, DomainError> {
    let role = Role::new(default_role_id(config)?, config.accounts.default_role_name.clone())
        .map_err(|e| DomainError::configuration(format!("accounts.default_role_name: {}", e)))?;

    Ok(role.with_permissions([Role::USER_MODIFY]))
}

/// Build the services for the configured storage backend
///
/// Fails when the default role cannot be resolved; callers must not start
/// without it.
pub async fn create_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let default_role_id = default_role_id(config)?;

    let (users, roles): (Arc<dyn UserRepository>, Arc<dyn RoleRepository>) =
        match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                let roles = InMemoryRoleRepository::with_roles(vec![default_role(config)?]);
                (Arc::new(InMemoryUserRepository::new()), Arc::new(roles))
            }
            StorageBackend::Postgres => {
                info!("Using PostgreSQL storage");
                let pool = connect_pool(&config.storage).await?;
                let applied = run_account_migrations(&pool).await?;
                info!(applied, "Migrations up to date");
                (
                    Arc::new(PostgresUserRepository::new(pool.clone())),
                    Arc::new(PostgresRoleRepository::new(pool)),
                )
            }
        };

    let provisioner = Arc::new(RoleProvisioner::initialize(roles.as_ref(), &default_role_id).await?);

    Ok(wire_services(users, provisioner, config))
}

fn wire_services(
    users: Arc<dyn UserRepository>,
    roles: Arc<RoleProvisioner>,
    config: &AppConfig,
) -> AppServices {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    AppServices {
        registration: Arc::new(RegistrationService::new(
            users.clone(),
            hasher.clone(),
            roles.clone(),
            clock.clone(),
        )),
        profiles: Arc::new(ProfileService::new(users.clone(), hasher, clock.clone())),
        search: Arc::new(
            UserSearchService::new(users, clock).with_max_page_size(config.search.max_page_size),
        ),
        roles,
    }
}
