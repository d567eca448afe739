//! Account registration workflow

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::user::{
    validate_address, validate_age, validate_birth_date, validate_email, validate_password,
    validate_profile_image_url, ProfileDetails, User, UserId, UserRepository, UserValidationError,
};
use crate::domain::{CalendarClock, Clock, DomainError};
use crate::infrastructure::observability::{outcome_label, record_registration, RegistrationPath};
use crate::infrastructure::role::RoleProvisioner;

use super::password::PasswordHasher;

/// Password given to accounts created without one. Development and test
/// provisioning only; it is hashed like any other password.
pub const DEFAULT_DEVELOPMENT_PASSWORD: &str = "1234";

/// Account fields supplied by callers when creating or editing an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile: ProfileDetails,
}

impl AccountDetails {
    /// Check every field rule, including the minimum age on `today`
    ///
    /// Field rules run first, so a birth date of today or later reports
    /// `BirthDateNotInPast` rather than `AgeTooLow`.
    pub fn validate(&self, today: NaiveDate) -> Result<(), UserValidationError> {
        validate_email(&self.email)?;
        validate_address(&self.profile.address)?;
        validate_birth_date(self.profile.birth_date, today)?;
        validate_profile_image_url(&self.profile.profile_image_url)?;
        validate_age(self.profile.birth_date, today)
    }

    /// Trim surrounding whitespace from the email
    pub(crate) fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

/// Creates accounts together with their profile and default role
pub struct RegistrationService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    repository: Arc<R>,
    hasher: Arc<H>,
    roles: Arc<RoleProvisioner>,
    clock: Arc<dyn Clock>,
}

impl<R, H> std::fmt::Debug for RegistrationService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationService")
            .field("repository", &self.repository)
            .field("hasher", &self.hasher)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

impl<R, H> RegistrationService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub fn new(
        repository: Arc<R>,
        hasher: Arc<H>,
        roles: Arc<RoleProvisioner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            hasher,
            roles,
            clock,
        }
    }

    /// Register an account with a caller-supplied password
    pub async fn register_with_password(
        &self,
        details: AccountDetails,
        raw_password: &str,
    ) -> Result<User, DomainError> {
        let result = match validate_password(raw_password) {
            Ok(()) => self.register(details, raw_password).await,
            Err(e) => Err(e.into()),
        };

        record_registration(RegistrationPath::Password, outcome_label(&result));
        result
    }

    /// Register an account with [`DEFAULT_DEVELOPMENT_PASSWORD`]
    pub async fn register_with_default_password(
        &self,
        details: AccountDetails,
    ) -> Result<User, DomainError> {
        let result = self.register(details, DEFAULT_DEVELOPMENT_PASSWORD).await;

        record_registration(RegistrationPath::DefaultPassword, outcome_label(&result));
        result
    }

    /// Administrative account creation
    ///
    /// Refuses an email that is already registered before doing anything
    /// else. The check is advisory: a concurrent registration can still
    /// win the race, in which case `save` reports the conflict.
    pub async fn create_profile_admin(&self, details: AccountDetails) -> Result<User, DomainError> {
        let details = details.normalized();

        let result = match self.repository.find_by_email(&details.email).await {
            Ok(Some(_)) => {
                warn!(email = %details.email, "Admin profile creation rejected: email already registered");
                Err(DomainError::email_already_exists(&details.email))
            }
            Ok(None) => self.register(details, DEFAULT_DEVELOPMENT_PASSWORD).await,
            Err(e) => Err(e),
        };

        record_registration(RegistrationPath::Admin, outcome_label(&result));
        result
    }

    async fn register(&self, details: AccountDetails, raw_password: &str) -> Result<User, DomainError> {
        let details = details.normalized();

        if let Err(e) = details.validate(self.clock.today()) {
            warn!(email = %details.email, reason = %e, "Registration rejected");
            return Err(e.into());
        }

        let password_hash = self.hasher.hash(raw_password)?;
        let default_role = self.roles.default_role();

        let mut user = User::new(
            UserId::generate(),
            details.first_name,
            details.last_name,
            details.email,
            password_hash,
        );
        user.assign_role(*default_role.id());
        user.upsert_profile(details.profile);

        let user = self.repository.save(user).await?;

        info!(
            user_id = %user.id(),
            role = %default_role.name(),
            "Account registered"
        );

        Ok(user)
    }
}
