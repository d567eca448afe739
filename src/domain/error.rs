use thiserror::Error;

use super::user::UserValidationError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] UserValidationError),

    #[error("Conflict: an account with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Configuration error: role '{role_id}' not found")]
    RoleNotFound { role_id: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn role_not_found(role_id: impl ToString) -> Self {
        Self::RoleNotFound {
            role_id: role_id.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists { .. })
    }

    /// Misconfiguration that must abort the enclosing operation without retry
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RoleNotFound { .. } | Self::Configuration { .. })
    }
}
