//! Error handling for Noncegate
//!
//! This module defines the error infrastructure shared by all Noncegate crates:
//! - `NoncegateError` marker trait for consistent error handling
//! - Domain error types for crypto, configuration and persistence
//!
//! Library code uses `thiserror`; the binary wraps these in `anyhow`.

use thiserror::Error;

/// Base trait for all Noncegate-specific errors
///
/// All implementors are thread-safe, `'static` and implement `std::error::Error`,
/// so they can cross task boundaries and be boxed freely.
pub trait NoncegateError: std::error::Error + Send + Sync + 'static {}

/// Cryptographic operation errors
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The MAC could not be initialised with the given key
    #[error("Invalid MAC key for {algorithm}")]
    InvalidKey { algorithm: String },
}

impl NoncegateError for CryptoError {}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },
}

impl NoncegateError for ConfigurationError {}

/// Database and persistence-related errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Database connection failed
    #[error("Database connection failed: {source}")]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Database query failed
    #[error("Database query failed: {query}")]
    QueryFailed {
        query: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File I/O error
    #[error("File I/O error for {path}: {source}")]
    FileError {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization failed
    #[error("Deserialization failed: {details}")]
    DeserializationFailed { details: String },
}

impl NoncegateError for PersistenceError {}

impl ConfigurationError {
    /// Create an invalid value error
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl PersistenceError {
    /// Create a connection failed error from any error type
    pub fn connection_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ConnectionFailed {
            source: Box::new(source),
        }
    }

    /// Create a query failed error from any error type
    pub fn query_failed(
        query: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::QueryFailed {
            query: query.into(),
            source: Box::new(source),
        }
    }
}
