//! PostgreSQL credential store

use super::store::{CredentialStore, NewUser, StoreError, UniqueField, UserRecord};
use crate::db;
use async_trait::async_trait;
use sqlx::PgPool;

/// Name of the partial unique index on active usernames
const USERNAME_CONSTRAINT: &str = "users_username_active_key";

/// Name of the partial unique index on active emails
const EMAIL_CONSTRAINT: &str = "users_email_active_key";

/// Credential store backed by the `users` table
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Translate a unique-index violation into the field it protects
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(EMAIL_CONSTRAINT) => return StoreError::DuplicateKey(UniqueField::Email),
                Some(USERNAME_CONSTRAINT) => {
                    return StoreError::DuplicateKey(UniqueField::Username)
                }
                _ => {}
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, username, password_hash, created_at, updated_at,
                   is_active, email_verified
            FROM users
            WHERE username = $1 AND is_active
            "#,
        )
        .bind(username.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, username, password_hash, created_at, updated_at,
                   is_active, email_verified
            FROM users
            WHERE lower(email) = lower($1) AND is_active
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, username, password_hash, created_at, updated_at,
                   is_active, email_verified
            FROM users
            WHERE id = $1 AND is_active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser<'_>) -> Result<UserRecord, StoreError> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, username, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, username, password_hash, created_at, updated_at,
                      is_active, email_verified
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.username.to_lowercase())
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn deactivate(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND is_active
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        db::health_check(&self.pool).await?;
        Ok(())
    }
}
