//! Role domain
//!
//! Roles are owned and maintained outside this crate; here they are only
//! looked up and attached to accounts.

mod entity;
mod repository;

pub use entity::{Role, RoleId, RoleValidationError};
pub use repository::RoleRepository;
