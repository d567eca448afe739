//! Role infrastructure module

mod postgres_repository;
mod provisioner;
mod repository;

pub use postgres_repository::PostgresRoleRepository;
pub use provisioner::RoleProvisioner;
pub use repository::InMemoryRoleRepository;
