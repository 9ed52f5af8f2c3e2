//! # Configuration Traits
//!
//! Core traits for configuration loading and validation.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::error::{ConfigurationError, NoncegateError};

/// Configuration loader trait
///
/// Provides a standardized interface for loading configuration with layered
/// support (compiled defaults, then file, then environment variables).
pub trait ConfigLoader<C: DeserializeOwned + Send + Sync> {
    /// Load configuration with optional path override
    ///
    /// When no path is given the implementor's default file name is tried and
    /// silently skipped if absent.
    fn load(path_override: Option<PathBuf>) -> Result<C, ConfigurationError>;

    /// Load configuration from a specific file, which must exist
    fn load_from_file(path: &Path) -> Result<C, ConfigurationError>;
}

/// Common configuration validation trait
pub trait ConfigValidation {
    type Error: NoncegateError;

    /// Validate the configuration
    fn validate(&self) -> Result<(), Self::Error>;

    /// Get configuration warnings (non-fatal issues)
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }
}
