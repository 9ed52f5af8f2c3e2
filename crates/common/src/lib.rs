//! # Common Noncegate
//!
//! Shared building blocks for the Noncegate service crates.
//!
//! ## Key Features
//! - Error taxonomy with the `NoncegateError` marker trait
//! - Layered configuration loading and database configuration
//! - Keyed hashing, HMAC signing and constant-time comparison
//! - SQLite connection management (behind the `sqlite` feature)
//!
//! ## Design Principles
//! - Minimal dependencies to avoid bloat in dependent crates
//! - Trait-based abstractions for dependency injection
//! - Secrets never appear in `Debug` output or logs

pub mod config;
pub mod crypto;
pub mod error;
pub mod persistence;

// Re-export commonly used types at the crate root for convenience
pub use config::*;
pub use crypto::*;
pub use error::*;

/// Version of the common crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
