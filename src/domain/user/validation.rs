//! User validation utilities

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Local part, a single `@`, and a domain part, without whitespace
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap());

static IMAGE_URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://.*$").unwrap());

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Age must be at least {minimum} (was {age})")]
    AgeTooLow { age: i32, minimum: i32 },

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("Address is mandatory")]
    EmptyAddress,

    #[error("Birth date must be in the past")]
    BirthDateNotInPast,

    #[error("Profile picture is mandatory")]
    EmptyProfileImageUrl,

    #[error("Invalid profile picture URL: '{0}'")]
    InvalidProfileImageUrl(String),

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("Invalid user ID: '{0}'")]
    InvalidUserId(String),

    #[error("Page size must be greater than zero")]
    InvalidPageSize,
}

const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate a postal address (must not be blank)
pub fn validate_address(address: &str) -> Result<(), UserValidationError> {
    if address.trim().is_empty() {
        return Err(UserValidationError::EmptyAddress);
    }

    Ok(())
}

/// Validate that a birth date lies strictly before `today`
pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<(), UserValidationError> {
    if birth_date >= today {
        return Err(UserValidationError::BirthDateNotInPast);
    }

    Ok(())
}

/// Validate a profile image URL
///
/// Rules:
/// - Cannot be blank
/// - Must use the `http` or `https` scheme
pub fn validate_profile_image_url(url: &str) -> Result<(), UserValidationError> {
    if url.trim().is_empty() {
        return Err(UserValidationError::EmptyProfileImageUrl);
    }

    if !IMAGE_URL_PATTERN.is_match(url) {
        return Err(UserValidationError::InvalidProfileImageUrl(url.to_string()));
    }

    Ok(())
}

/// Validate a caller-supplied raw password
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}
