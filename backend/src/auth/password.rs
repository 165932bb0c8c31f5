//! Password hashing using bcrypt
//!
//! Hashes are self-describing (`$2b$<cost>$<salt><digest>`), so verification
//! needs nothing but the stored string.
//!
//! bcrypt only reads the first 72 bytes of its input. Longer passwords are
//! refused outright instead of being silently truncated.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. Request handlers use the `_async`
//! variants, which move the work onto the blocking thread pool.

use anyhow::Result;
use cointelligence_shared::MAX_PASSWORD_BYTES;

/// Password hashing service
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordService {
    /// Create a hasher with the given bcrypt work factor
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Work factor used for new hashes
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            anyhow::bail!("Password exceeds {} bytes", MAX_PASSWORD_BYTES);
        }
        bcrypt::hash(password, self.cost)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A malformed hash never matches; it is not an error. Neither does a
    /// password longer than bcrypt reads.
    pub fn verify(password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}
