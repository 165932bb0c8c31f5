//! Credential storage
//!
//! Provides the credential store contract and its PostgreSQL and in-memory
//! implementations.

pub mod memory;
pub mod store;
pub mod user;

pub use memory::InMemoryCredentialStore;
pub use store::{CredentialStore, NewUser, StoreError, UniqueField, UserRecord};
pub use user::PgCredentialStore;
