//! In-process credential store
//!
//! Backs `memory://` deployments and the test suites. Uniqueness checks and
//! inserts happen under the same write lock.

use super::store::{CredentialStore, NewUser, StoreError, UniqueField, UserRecord};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

/// Credential store holding every record in memory
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let username = username.to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.is_active && u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.is_active && u.email.to_lowercase() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.is_active && u.id == id).cloned())
    }

    async fn create(&self, user: NewUser<'_>) -> Result<UserRecord, StoreError> {
        let username = user.username.to_lowercase();
        let email = user.email.to_lowercase();
        let mut users = self.users.write().await;

        let active = || users.iter().filter(|u| u.is_active);
        if active().any(|u| u.username == username) {
            return Err(StoreError::DuplicateKey(UniqueField::Username));
        }
        if active().any(|u| u.email.to_lowercase() == email) {
            return Err(StoreError::DuplicateKey(UniqueField::Email));
        }

        // Records are never removed, so the length is a fresh id
        let now = Utc::now();
        let record = UserRecord {
            id: users.len() as i64 + 1,
            name: user.name.to_string(),
            email: user.email.to_string(),
            username,
            password_hash: user.password_hash.to_string(),
            created_at: now,
            updated_at: now,
            is_active: true,
            email_verified: false,
        };
        users.push(record.clone());

        Ok(record)
    }

    async fn deactivate(&self, id: i64) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.is_active && u.id == id) {
            Some(user) => {
                user.is_active = false;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        Ok(self.users.read().await.len() as i64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
