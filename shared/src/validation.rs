//! Input validation functions
//!
//! Registration input is validated here, at the boundary, and converted into
//! a [`Registration`] before it reaches the authenticator.

use crate::errors::ValidationError;
use crate::types::RegisterRequest;
use validator::ValidateEmail;

/// Maximum display name length, in characters (`users.name`)
pub const MAX_NAME_LEN: usize = 100;

/// Minimum username length, in characters
pub const MIN_USERNAME_LEN: usize = 3;

/// Maximum username length after lowercasing, in characters (`users.username`)
pub const MAX_USERNAME_LEN: usize = 50;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum password length, in bytes. bcrypt ignores everything past this.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Registration input that passed validation.
///
/// `name` and `email` are trimmed, `username` is lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    /// Validate every field, reporting the first failure in field order
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let name = validate_name(&self.name)?;
        let email = validate_email(&self.email)?;
        let username = normalize_username(&self.username)?;
        validate_password(&self.password)?;

        Ok(Registration {
            name,
            email,
            username,
            password: self.password,
        })
    }
}

/// Validate a display name, returning it trimmed
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("name", "Name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new(
            "name",
            format!("Name must be at most {MAX_NAME_LEN} characters long"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate email format, returning it trimmed
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("email", "Email cannot be empty"));
    }
    if trimmed.len() > 255 {
        return Err(ValidationError::new("email", "Email too long"));
    }
    if !trimmed.validate_email() {
        return Err(ValidationError::new("email", "Invalid email format"));
    }
    Ok(trimmed.to_string())
}

/// Validate a username and return its canonical lowercase form
pub fn normalize_username(username: &str) -> Result<String, ValidationError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::new(
            "username",
            format!("Username must be at least {MIN_USERNAME_LEN} characters long"),
        ));
    }
    if !username.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::new(
            "username",
            "Username must contain only letters and numbers",
        ));
    }

    // Lowercasing can lengthen a string, so the stored form is what's measured
    let normalized = username.to_lowercase();
    if normalized.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::new(
            "username",
            format!("Username must be at most {MAX_USERNAME_LEN} characters long"),
        ));
    }
    Ok(normalized)
}

/// Validate password strength
///
/// The upper bound is in bytes, so multi-byte characters count for more.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at most {MAX_PASSWORD_BYTES} bytes long"),
        ));
    }
    Ok(())
}
