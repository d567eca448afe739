//! User domain
//!
//! This module provides the user and profile entities, age eligibility and
//! field validation, search parameters, and the repository trait.

mod age;
mod entity;
mod query;
mod repository;
mod validation;

pub use age::{age_in_years, validate_age, MINIMUM_AGE};
pub use entity::{AccountIdentity, Profile, ProfileDetails, User, UserId};
pub use query::{UserSearchQuery, DEFAULT_PAGE_SIZE};
pub use repository::UserRepository;
pub use validation::{
    validate_address, validate_birth_date, validate_email, validate_password,
    validate_profile_image_url, UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
