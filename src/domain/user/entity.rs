//! User and profile entities

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::UserValidationError;
use crate::domain::role::RoleId;

/// User identifier (UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidUserId(id.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable profile fields, as supplied by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub address: String,
    pub birth_date: NaiveDate,
    pub profile_image_url: String,
}

/// Profile owned by exactly one user
///
/// `owner` is a plain identifier, not a handle to the user. The user value
/// owns the profile; navigating back goes through a repository lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    owner: UserId,
    address: String,
    birth_date: NaiveDate,
    profile_image_url: String,
}

impl Profile {
    fn new(owner: UserId, details: ProfileDetails) -> Self {
        Self {
            owner,
            address: details.address,
            birth_date: details.birth_date,
            profile_image_url: details.profile_image_url,
        }
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn profile_image_url(&self) -> &str {
        &self.profile_image_url
    }

    fn apply(&mut self, details: ProfileDetails) {
        self.address = details.address;
        self.birth_date = details.birth_date;
        self.profile_image_url = details.profile_image_url;
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    roles: BTreeSet<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<Profile>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user without a profile
    pub fn new(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            roles: BTreeSet::new(),
            profile: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Restore persisted timestamps
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn roles(&self) -> &BTreeSet<RoleId> {
        &self.roles
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Birth date from the profile, if one is attached
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.profile.as_ref().map(Profile::birth_date)
    }

    pub fn has_role(&self, role: &RoleId) -> bool {
        self.roles.contains(role)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_name(&mut self, first_name: impl Into<String>, last_name: impl Into<String>) {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self.touch();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.touch();
    }

    pub fn assign_role(&mut self, role: RoleId) {
        self.roles.insert(role);
        self.touch();
    }

    /// Update the attached profile in place, or create and link one
    pub fn upsert_profile(&mut self, details: ProfileDetails) {
        match self.profile.as_mut() {
            Some(profile) => profile.apply(details),
            None => self.profile = Some(Profile::new(self.id, details)),
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// How a caller names the account it is acting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountIdentity {
    Id(UserId),
    Email(String),
}

impl std::fmt::Display for AccountIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Email(email) => write!(f, "{}", email),
        }
    }
}
