//! Co-Intelligence Backend Library
//!
//! Account registration, password login and stateless bearer-token
//! authentication, exposed as a library for the binary and the tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
