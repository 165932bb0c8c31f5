//! Credential store contract
//!
//! Every read path filters out inactive records, so a deactivated account
//! is invisible to authentication without callers having to check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cointelligence_shared::UserResponse;
use std::fmt;
use thiserror::Error;

/// User record as persisted by a credential store
#[derive(Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub email_verified: bool,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("is_active", &self.is_active)
            .field("email_verified", &self.email_verified)
            .finish()
    }
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
            is_active: user.is_active,
            email_verified: user.email_verified,
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Column protected by a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Username => f.write_str("username"),
            UniqueField::Email => f.write_str("email"),
        }
    }
}

/// Credential store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("An active user with this {0} already exists")]
    DuplicateKey(UniqueField),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for user credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find an active user by username.
    ///
    /// The lookup key is lowercased before matching.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Find an active user by email, compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Find an active user by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;

    /// Persist a new active, unverified user.
    ///
    /// # Errors
    /// * `DuplicateKey` - an active record already holds the username or email
    /// * `Database` - the backing store failed
    async fn create(&self, user: NewUser<'_>) -> Result<UserRecord, StoreError>;

    /// Soft-delete a user by clearing its active flag.
    ///
    /// Returns `false` when no active record had this id.
    async fn deactivate(&self, id: i64) -> Result<bool, StoreError>;

    /// Count all records, active or not.
    async fn count_users(&self) -> Result<i64, StoreError>;

    /// Cheap connectivity probe.
    async fn health_check(&self) -> Result<(), StoreError>;
}
