//! Configuration module for the nonce API

mod nonce;
mod oauth;
mod server;
mod telemetry;

pub use nonce::NonceConfig;
pub use oauth::OAuthConfig;
pub use server::ServerConfig;
pub use telemetry::{LogFormat, TelemetryConfig};

use common::config::{load_config_with_options, ConfigLoader, ConfigValidation, LoadOptions};
use common::{ConfigurationError as ConfigError, DatabaseConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix, e.g. `NONCEGATE_SERVER__BIND_ADDRESS`
pub const ENV_PREFIX: &str = "NONCEGATE";

/// Configuration file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "noncegate.toml";

const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// Main configuration structure for the nonce API
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Request signing configuration
    pub oauth: OAuthConfig,

    /// Nonce configuration
    pub nonce: NonceConfig,

    /// Credential store configuration
    pub database: DatabaseConfig,

    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => <Config as ConfigLoader<Config>>::load_from_file(path)?,
            None => <Config as ConfigLoader<Config>>::load(None)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Generate example configuration file
    pub fn generate_example() -> Result<String, ConfigError> {
        let config = Self::default();
        toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError {
            details: format!("Failed to serialize config: {e}"),
        })
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout)
    }
}

impl ConfigLoader<Config> for Config {
    fn load(path: Option<PathBuf>) -> Result<Config, ConfigError> {
        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        load_config_with_options(LoadOptions::new(Some(path), ENV_PREFIX))
    }

    fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
        load_config_with_options(LoadOptions::new(Some(path.to_path_buf()), ENV_PREFIX).require_file())
    }
}

impl ConfigValidation for Config {
    type Error = ConfigError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.oauth.base_path.is_empty() {
            return Err(ConfigError::invalid_value(
                "oauth.base_path",
                &self.oauth.base_path,
                "Base path cannot be empty; use \"/\" for the site root",
            ));
        }

        if !SUPPORTED_SCHEMES.contains(&self.oauth.public_scheme.as_str()) {
            return Err(ConfigError::invalid_value(
                "oauth.public_scheme",
                &self.oauth.public_scheme,
                "Scheme must be http or https",
            ));
        }

        if self.oauth.key_hash_secret.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "oauth.key_hash_secret".to_string(),
            });
        }

        if self.nonce.lifetime_secs < 2 {
            return Err(ConfigError::invalid_value(
                "nonce.lifetime_secs",
                self.nonce.lifetime_secs.to_string(),
                "Nonce lifetime must be at least 2 seconds",
            ));
        }

        if self.nonce.action.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "nonce.action".to_string(),
            });
        }

        if self.server.request_timeout == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout",
                "0",
                "Request timeout must be greater than 0",
            ));
        }

        self.database.validate()
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = self.database.warnings();

        if self.nonce.secret.is_none() {
            warnings.push(
                "nonce.secret is not set; a random secret will be generated at startup".to_string(),
            );
        }
        if self.oauth.trust_forwarded_proto && self.oauth.site_url.is_none() {
            warnings.push(
                "oauth.trust_forwarded_proto is enabled; only run behind a proxy that sets X-Forwarded-Proto"
                    .to_string(),
            );
        }

        warnings
    }
}
