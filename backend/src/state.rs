//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys are derived once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::{JwtService, PasswordService};
use crate::config::AppConfig;
use crate::repositories::CredentialStore;
use crate::services::Authenticator;
use anyhow::Result;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Registration, login and token verification
    pub authenticator: Authenticator,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails when the configured JWT algorithm is unusable.
    pub fn new(store: Arc<dyn CredentialStore>, config: AppConfig) -> Result<Self> {
        let tokens = JwtService::new(
            &config.jwt.secret,
            config.jwt.algorithm()?,
            config.jwt.access_token_expiry_secs,
        );
        let passwords = PasswordService::new(config.password.bcrypt_cost);

        Ok(Self {
            config: Arc::new(config),
            authenticator: Authenticator::new(store, passwords, tokens),
        })
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the authenticator
    #[inline]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Get a reference to the credential store
    #[inline]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        self.authenticator.store()
    }
}
