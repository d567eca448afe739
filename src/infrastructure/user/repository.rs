//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Store {
    users: HashMap<UserId, User>,
    /// email -> user ID
    email_index: HashMap<String, UserId>,
}

impl Store {
    fn insert(&mut self, user: User) -> Result<User, DomainError> {
        let id = *user.id();

        if let Some(owner) = self.email_index.get(user.email()) {
            if *owner != id {
                return Err(DomainError::email_already_exists(user.email()));
            }
        }

        if let Some(previous) = self.users.get(&id) {
            if previous.email() != user.email() {
                self.email_index.remove(previous.email());
            }
        }

        self.email_index.insert(user.email().to_string(), id);
        self.users.insert(id, user.clone());

        Ok(user)
    }

    fn remove(&mut self, id: &UserId) -> bool {
        match self.users.remove(id) {
            Some(user) => {
                self.email_index.remove(user.email());
                true
            }
            None => false,
        }
    }
}

/// In-memory implementation of UserRepository
///
/// User, profile and role links live in one value, so every write is atomic
/// under the store lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    ///
    /// Later users with an email already taken are skipped.
    pub fn with_users(users: Vec<User>) -> Self {
        let mut store = Store::default();

        for user in users {
            if let Err(e) = store.insert(user) {
                tracing::warn!(error = %e, "Skipping seeded user");
            }
        }

        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;
        Ok(store.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .email_index
            .get(email)
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        let mut store = self.store.write().await;
        store.insert(user)
    }

    async fn delete(&self, user: &User) -> Result<(), DomainError> {
        let mut store = self.store.write().await;

        if store.remove(user.id()) {
            Ok(())
        } else {
            Err(DomainError::not_found(format!("User '{}' not found", user.id())))
        }
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        Ok(store.remove(id))
    }
}
