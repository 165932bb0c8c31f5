//! Co-Intelligence Platform Shared Library
//!
//! Wire types and boundary validation shared between the backend and
//! anything that talks to it.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
pub use validation::{Registration, MAX_PASSWORD_BYTES};
