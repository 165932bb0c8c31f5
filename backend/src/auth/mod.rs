//! Authentication module
//!
//! Provides bcrypt password hashing, JWT issuance and validation, and the
//! bearer-token extractor used by protected routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{bearer_token, CurrentUser};
pub use password::PasswordService;
