//! Authenticator: registration, login and token verification
//!
//! Composes the credential store, the password hasher and the token codec.
//! Each call is independent; the store is the only shared state.

use crate::auth::{JwtService, PasswordService};
use crate::error::{ApiError, ApiResult};
use crate::repositories::{CredentialStore, NewUser, UserRecord};
use cointelligence_shared::RegisterRequest;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{info, warn};

/// Authentication service shared by all handlers
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    passwords: PasswordService,
    tokens: JwtService,
    /// Verified against on unknown usernames so both login failures cost one bcrypt check
    dummy_hash: Arc<OnceCell<String>>,
}

const DUMMY_PASSWORD: &str = "no-account-has-this-password";

impl Authenticator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        passwords: PasswordService,
        tokens: JwtService,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn tokens(&self) -> &JwtService {
        &self.tokens
    }

    /// Register a new user and issue a token for them
    ///
    /// Username availability is checked before email, so a request clashing
    /// on both reports `DuplicateUsername`. The pre-checks are not atomic
    /// with the insert; a concurrent registration that wins the race surfaces
    /// through the store's `DuplicateKey`, which maps to the same errors.
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<(UserRecord, String)> {
        let registration = request.validate()?;

        if self
            .store
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(ApiError::DuplicateUsername);
        }

        if self
            .store
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(ApiError::DuplicateEmail);
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let password_hash = self
            .passwords
            .hash_async(registration.password)
            .await
            .map_err(ApiError::Internal)?;

        let user = self
            .store
            .create(NewUser {
                name: &registration.name,
                email: &registration.email,
                username: &registration.username,
                password_hash: &password_hash,
            })
            .await?;

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, username = %user.username, "User registered");

        Ok((user, token))
    }

    /// Verify a username and password and issue a token
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<(UserRecord, String)> {
        let Some(user) = self.store.find_by_username(username).await? else {
            self.verify_against_dummy(password).await?;
            warn!("Login failed");
            return Err(ApiError::InvalidCredentials);
        };

        // Verify password on blocking thread pool (CPU-intensive)
        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            warn!("Login failed");
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, username = %user.username, "User logged in");

        Ok((user, token))
    }

    /// Resolve a bearer token to the current, active user
    ///
    /// The account is re-read from the store, so a deactivated user is
    /// rejected even while their token has not expired.
    pub async fn authenticate_token(&self, token: &str) -> ApiResult<UserRecord> {
        let claims = self
            .tokens
            .decode_and_verify(token)
            .map_err(|_| ApiError::Unauthenticated)?;

        let user = self
            .store
            .find_by_username(&claims.sub)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        // Both shipped stores already hide inactive records; this guards
        // other `CredentialStore` implementations that return them
        if !user.is_active {
            return Err(ApiError::InactiveUser);
        }

        Ok(user)
    }

    /// Mint a fresh token for a user who already holds a valid one
    pub fn refresh(&self, current_user: &UserRecord) -> ApiResult<String> {
        self.issue_token(current_user)
    }

    /// Spend the same bcrypt work as a real check, at the configured cost
    async fn verify_against_dummy(&self, password: &str) -> ApiResult<()> {
        let passwords = self.passwords;
        let dummy_hash = self.dummy_hash.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || {
            let hash = dummy_hash.get_or_try_init(|| passwords.hash(DUMMY_PASSWORD))?;
            PasswordService::verify(&password, hash);
            Ok::<_, anyhow::Error>(())
        })
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Task join error: {}", e)))?
        .map_err(ApiError::Internal)
    }

    fn issue_token(&self, user: &UserRecord) -> ApiResult<String> {
        self.tokens
            .issue(&user.username)
            .map_err(|e| ApiError::Internal(e.into()))
    }
}
