//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// A user is persisted together with its profile and role links; `save`
/// writes the whole graph or nothing. Email uniqueness is enforced here and
/// reported as [`DomainError::EmailAlreadyExists`].
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Load every user
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Get a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert or replace a user
    async fn save(&self, user: User) -> Result<User, DomainError>;

    /// Delete a loaded user; fails with `NotFound` if it is already gone
    async fn delete(&self, user: &User) -> Result<(), DomainError>;

    /// Delete a user by ID, returning whether a record was removed
    async fn delete_by_id(&self, id: &UserId) -> Result<bool, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock user repository for testing
    ///
    /// Counts `save` calls so tests can assert that rejected requests never
    /// reach storage.
    #[derive(Debug, Default)]
    pub struct MockUserRepository {
        users: Arc<RwLock<HashMap<UserId, User>>>,
        should_fail: Arc<RwLock<bool>>,
        save_calls: Arc<RwLock<usize>>,
    }

    impl MockUserRepository {
        /// Create a new mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        /// Number of `save` calls seen so far
        pub async fn save_calls(&self) -> usize {
            *self.save_calls.read().await
        }

        /// Put a user straight into the store, bypassing `save`
        pub async fn insert(&self, user: User) {
            self.users.write().await.insert(*user.id(), user);
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_all(&self) -> Result<Vec<User>, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users.values().cloned().collect())
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users.get(id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users.values().find(|u| u.email() == email).cloned())
        }

        async fn save(&self, user: User) -> Result<User, DomainError> {
            *self.save_calls.write().await += 1;
            self.check_should_fail().await?;
            let mut users = self.users.write().await;

            let email_taken = users
                .values()
                .any(|u| u.email() == user.email() && u.id() != user.id());

            if email_taken {
                return Err(DomainError::email_already_exists(user.email()));
            }

            users.insert(*user.id(), user.clone());
            Ok(user)
        }

        async fn delete(&self, user: &User) -> Result<(), DomainError> {
            if self.delete_by_id(user.id()).await? {
                Ok(())
            } else {
                Err(DomainError::not_found(format!("User '{}' not found", user.id())))
            }
        }

        async fn delete_by_id(&self, id: &UserId) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            let mut users = self.users.write().await;
            Ok(users.remove(id).is_some())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn create_test_user(email: &str) -> User {
            User::new(UserId::generate(), "Test", "User", email, "hashed_password")
        }

        #[tokio::test]
        async fn test_save_and_find() {
            let repo = MockUserRepository::new();
            let user = create_test_user("a@example.com");

            repo.save(user.clone()).await.unwrap();

            let by_id = repo.find_by_id(user.id()).await.unwrap();
            assert!(by_id.is_some());

            let by_email = repo.find_by_email("a@example.com").await.unwrap();
            assert_eq!(by_email.unwrap().id(), user.id());
            assert_eq!(repo.save_calls().await, 1);
        }

        #[tokio::test]
        async fn test_email_uniqueness() {
            let repo = MockUserRepository::new();

            repo.save(create_test_user("a@example.com")).await.unwrap();

            let result = repo.save(create_test_user("a@example.com")).await;
            assert!(matches!(result, Err(DomainError::EmailAlreadyExists { .. })));
        }

        #[tokio::test]
        async fn test_should_fail() {
            let repo = MockUserRepository::new();
            repo.set_should_fail(true).await;

            let result = repo.find_all().await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }

        #[tokio::test]
        async fn test_delete_missing_user() {
            let repo = MockUserRepository::new();
            let user = create_test_user("a@example.com");

            let result = repo.delete(&user).await;
            assert!(result.unwrap_err().is_not_found());
        }
    }
}
