//! Profile lifecycle: reading, editing and deleting accounts

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::user::{AccountIdentity, User, UserId, UserRepository};
use crate::domain::{CalendarClock, Clock, DomainError};
use crate::infrastructure::observability::{outcome_label, record_deletion, record_profile_update};

use super::password::PasswordHasher;
use super::registration::AccountDetails;

/// Reads, edits and deletes individual accounts
///
/// Performs no authorization: callers decide whether the requester may act
/// on the given account.
pub struct ProfileService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    repository: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> std::fmt::Debug for ProfileService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileService")
            .field("repository", &self.repository)
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl<R, H> ProfileService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub fn new(repository: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            hasher,
            clock,
        }
    }

    /// Resolve the caller's own account by ID or email
    pub async fn get_own_profile(&self, identity: &AccountIdentity) -> Result<User, DomainError> {
        let user = match identity {
            AccountIdentity::Id(id) => self.repository.find_by_id(id).await?,
            AccountIdentity::Email(email) => self.repository.find_by_email(email.trim()).await?,
        };

        user.ok_or_else(|| DomainError::not_found(format!("User '{}' not found", identity)))
    }

    /// Replace names, email and profile fields of an account
    ///
    /// An account that somehow lost its profile gets a new one linked.
    pub async fn update_own_profile(
        &self,
        id: &UserId,
        details: AccountDetails,
    ) -> Result<User, DomainError> {
        let result = self.apply_update(id, details).await;
        record_profile_update(outcome_label(&result));
        result
    }

    async fn apply_update(&self, id: &UserId, details: AccountDetails) -> Result<User, DomainError> {
        let mut user = self.load(id).await?;
        let details = details.normalized();

        if let Err(e) = details.validate(self.clock.today()) {
            warn!(user_id = %id, reason = %e, "Profile update rejected");
            return Err(e.into());
        }

        let created_profile = user.profile().is_none();

        user.set_name(details.first_name, details.last_name);
        user.set_email(details.email);
        user.upsert_profile(details.profile);

        let user = self.repository.save(user).await?;

        info!(user_id = %user.id(), created_profile, "Profile updated");
        Ok(user)
    }

    /// Delete the caller's own account and, with it, its profile
    pub async fn delete_own_profile(&self, id: &UserId) -> Result<(), DomainError> {
        let result = match self.load(id).await {
            Ok(user) => self.repository.delete(&user).await,
            Err(e) => Err(e),
        };

        if result.is_ok() {
            info!(user_id = %id, "Account deleted by owner");
        }

        record_deletion("own", outcome_label(&result));
        result
    }

    /// Get any account by ID
    pub async fn find_by_id(&self, id: &UserId) -> Result<User, DomainError> {
        self.load(id).await
    }

    /// List every account
    pub async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        self.repository.find_all().await
    }

    /// Administrative delete of any account by ID
    pub async fn delete_by_id(&self, id: &UserId) -> Result<(), DomainError> {
        let result = match self.repository.delete_by_id(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::not_found(format!("User '{}' not found", id))),
            Err(e) => Err(e),
        };

        if result.is_ok() {
            info!(user_id = %id, "Account deleted by administrator");
        }

        record_deletion("admin", outcome_label(&result));
        result
    }

    /// Look up an account by email and check its password
    ///
    /// Returns `None` for an unknown email or a wrong password alike.
    pub async fn verify_credentials(
        &self,
        email: &str,
        raw_password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.repository.find_by_email(email.trim()).await? else {
            return Ok(None);
        };

        if self.hasher.verify(raw_password, user.password_hash()) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    async fn load(&self, id: &UserId) -> Result<User, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }
}
