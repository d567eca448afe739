//! Account metrics
//!
//! Counters are emitted through the `metrics` facade; with no recorder
//! installed they are no-ops.

use metrics::{counter, histogram};

use crate::domain::DomainError;

/// Which registration entry point produced an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPath {
    Password,
    DefaultPassword,
    Admin,
}

impl RegistrationPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::DefaultPassword => "default_password",
            Self::Admin => "admin",
        }
    }
}

/// Collapse an operation result into a low-cardinality label
pub fn outcome_label<T>(result: &Result<T, DomainError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(DomainError::Validation(_)) => "invalid",
        Err(DomainError::EmailAlreadyExists { .. }) => "conflict",
        Err(DomainError::NotFound { .. }) => "not_found",
        Err(_) => "error",
    }
}

/// Record a registration attempt
pub fn record_registration(path: RegistrationPath, outcome: &'static str) {
    counter!(
        "accounts_registrations_total",
        "path" => path.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a profile update attempt
pub fn record_profile_update(outcome: &'static str) {
    counter!("accounts_profile_updates_total", "outcome" => outcome).increment(1);
}

/// Record an account deletion; `scope` is `own` or `admin`
pub fn record_deletion(scope: &'static str, outcome: &'static str) {
    counter!("accounts_deletions_total", "scope" => scope, "outcome" => outcome).increment(1);
}

/// Record a search and the size of the returned page
pub fn record_search(matched: usize, returned: usize) {
    counter!("accounts_searches_total").increment(1);
    histogram!("accounts_search_matched_users").record(matched as f64);
    histogram!("accounts_search_page_users").record(returned as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserValidationError;

    #[test]
    fn test_outcome_labels() {
        let ok: Result<(), DomainError> = Ok(());
        assert_eq!(outcome_label(&ok), "success");

        let invalid: Result<(), DomainError> =
            Err(UserValidationError::AgeTooLow { age: 10, minimum: 13 }.into());
        assert_eq!(outcome_label(&invalid), "invalid");

        let conflict: Result<(), DomainError> =
            Err(DomainError::email_already_exists("a@example.com"));
        assert_eq!(outcome_label(&conflict), "conflict");

        let storage: Result<(), DomainError> = Err(DomainError::storage("down"));
        assert_eq!(outcome_label(&storage), "error");
    }

    #[test]
    fn test_registration_path_labels() {
        assert_eq!(RegistrationPath::Password.as_str(), "password");
        assert_eq!(RegistrationPath::DefaultPassword.as_str(), "default_password");
        assert_eq!(RegistrationPath::Admin.as_str(), "admin");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_registration(RegistrationPath::Admin, "success");
        record_profile_update("success");
        record_deletion("own", "success");
        record_search(3, 2);
    }
}
