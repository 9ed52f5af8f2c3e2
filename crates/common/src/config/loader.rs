//! # Configuration Loader
//!
//! Figment-based configuration loading with layered support:
//! 1. Compiled defaults
//! 2. TOML configuration file
//! 3. Environment variable overrides
//!
//! Nested fields map to environment variables with a double underscore, so
//! `NONCEGATE_DATABASE__URL` overrides `database.url`.

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration loading options
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Optional path to configuration file
    pub config_path: Option<PathBuf>,
    /// Environment variable prefix, without the trailing underscore
    pub env_prefix: String,
    /// Whether configuration file is required
    pub require_file: bool,
}

impl LoadOptions {
    /// Options for an optional file with the given environment prefix
    pub fn new(config_path: Option<PathBuf>, env_prefix: impl Into<String>) -> Self {
        Self {
            config_path,
            env_prefix: env_prefix.into(),
            require_file: false,
        }
    }

    /// Require the configuration file to exist
    pub fn require_file(mut self) -> Self {
        self.require_file = true;
        self
    }
}

/// Load configuration with custom options
pub fn load_config_with_options<T>(options: LoadOptions) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + Serialize,
{
    debug!("Loading configuration with options: {:?}", options);

    let mut figment = Figment::new().merge(Serialized::defaults(T::default()));

    if let Some(path) = &options.config_path {
        if path.exists() {
            info!("Loading configuration from file: {}", path.display());
            figment = add_file_provider(figment, path)?;
        } else if options.require_file {
            return Err(ConfigurationError::FileNotFound {
                path: path.display().to_string(),
            });
        } else {
            warn!(
                "Configuration file not found: {} (using defaults)",
                path.display()
            );
        }
    }

    figment = figment.merge(
        Env::prefixed(&format!("{}_", options.env_prefix))
            .split("__")
            .ignore(&["PATH", "HOME", "USER"]),
    );

    let config: T = figment
        .extract()
        .map_err(|err| ConfigurationError::ParseError {
            details: err.to_string(),
        })?;

    debug!(
        "Configuration loaded from {} sources",
        figment.metadata().count()
    );

    Ok(config)
}

/// Add file provider to figment based on file extension
fn add_file_provider(figment: Figment, path: &Path) -> Result<Figment, ConfigurationError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("toml");

    match extension.to_lowercase().as_str() {
        "toml" => Ok(figment.merge(Toml::file(path))),
        _ => Err(ConfigurationError::ParseError {
            details: format!("Unsupported configuration file format: {extension} (supported: toml)"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct SampleConfig {
        name: String,
        port: u16,
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let options = LoadOptions::new(
            Some(PathBuf::from("/nonexistent/sample.toml")),
            "NONCEGATE_LOADER_TEST_MISSING",
        );
        let config: SampleConfig = load_config_with_options(options).unwrap();
        assert_eq!(config, SampleConfig::default());
    }

    #[test]
    fn test_required_file_missing() {
        let options = LoadOptions::new(
            Some(PathBuf::from("/nonexistent/sample.toml")),
            "NONCEGATE_LOADER_TEST_REQUIRED",
        )
        .require_file();
        let result: Result<SampleConfig, _> = load_config_with_options(options);
        assert!(matches!(result, Err(ConfigurationError::FileNotFound { .. })));
    }

    #[test]
    fn test_file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "name = \"shop\"\nport = 8080").unwrap();

        let options = LoadOptions::new(
            Some(file.path().to_path_buf()),
            "NONCEGATE_LOADER_TEST_FILE",
        );
        let config: SampleConfig = load_config_with_options(options).unwrap();
        assert_eq!(config.name, "shop");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let options = LoadOptions::new(
            Some(file.path().to_path_buf()),
            "NONCEGATE_LOADER_TEST_EXT",
        );
        let result: Result<SampleConfig, _> = load_config_with_options(options);
        assert!(matches!(result, Err(ConfigurationError::ParseError { .. })));
    }
}
