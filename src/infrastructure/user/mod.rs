//! User infrastructure module
//!
//! Account workflows (registration, profile lifecycle, search) plus password
//! hashing with Argon2 and the in-memory and PostgreSQL repositories.

mod password;
mod postgres_repository;
mod profile;
mod registration;
mod repository;
mod search;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use profile::ProfileService;
pub use registration::{AccountDetails, RegistrationService, DEFAULT_DEVELOPMENT_PASSWORD};
pub use repository::InMemoryUserRepository;
pub use search::{UserSearchService, DEFAULT_MAX_PAGE_SIZE};
