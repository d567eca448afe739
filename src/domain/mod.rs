//! Domain layer - Core business logic and entities

pub mod clock;
pub mod error;
pub mod role;
pub mod user;

pub use clock::{CalendarClock, Clock, DefaultClock};
#[cfg(test)]
pub use clock::FixedClock;
pub use error::DomainError;
pub use role::{Role, RoleId, RoleRepository};
pub use user::{
    AccountIdentity, Profile, ProfileDetails, User, UserId, UserRepository, UserSearchQuery,
    UserValidationError,
};
