//! JWT token generation and validation
//!
//! Tokens are stateless: a token is valid while its signature verifies and
//! its `exp` lies in the future. Keys are pre-computed once and shared.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (normalized username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token id, the key for a future deny-list
    pub jti: String,
}

/// Token codec errors
///
/// Decoding collapses every failure (malformed, tampered, expired, missing
/// claims) into `Invalid` so callers cannot tell which check failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Invalid token")]
    Invalid,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Derive both keys from a shared secret
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }
}

/// JWT service for token operations
///
/// Cloning is cheap: keys sit behind `Arc`.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    algorithm: Algorithm,
    validation: Arc<Validation>,
    default_ttl: Duration,
}

impl JwtService {
    /// Create a new JWT service
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, algorithm: Algorithm, default_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: JwtKeys::from_secret(secret.as_bytes()),
            algorithm,
            validation: Arc::new(validation),
            default_ttl: Duration::seconds(default_ttl_secs),
        }
    }

    /// Sign a token for `subject` that expires after `ttl`
    pub fn encode(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Sign a token for `subject` with the configured lifetime
    #[inline]
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.encode(subject, self.default_ttl)
    }

    /// Verify signature and expiry, returning the claims
    pub fn decode_and_verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = %e, "Rejected bearer token");
                TokenError::Invalid
            })
    }

    /// Lifetime of tokens minted by [`issue`](Self::issue), in seconds
    #[inline]
    pub fn default_ttl_secs(&self) -> i64 {
        self.default_ttl.num_seconds()
    }
}
