//! # Noncegate nonce API
//!
//! Issues store API session nonces to callers that sign their request with a
//! platform REST API key, using OAuth1.0a HMAC-SHA1/HMAC-SHA256 signatures.
//!
//! ## Features
//!
//! - **Credential resolution**: consumer keys are sanitized and hashed before lookup
//! - **Signature verification**: canonical signing base string and constant-time comparison
//! - **Nonces**: stateless, time-windowed, scoped to action and user
//! - **OpenAPI Documentation**: Auto-generated API documentation
//! - **Monitoring**: Prometheus metrics and structured logging

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod nonce;
pub mod oauth;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use server::{AppState, Server};

/// Version of the nonce-api crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
