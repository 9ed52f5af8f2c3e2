//! # Configuration Types
//!
//! Configuration structures shared across Noncegate components.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigurationError;

use super::ConfigValidation;

/// Database configuration for the credential store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Prefix of the host platform's tables (`wp_` gives `wp_woocommerce_api_keys`)
    pub table_prefix: String,

    /// Create the API key table if it does not exist (local setups only)
    pub bootstrap_schema: bool,

    /// Optional JSON file of credential records to serve from memory instead of the database
    pub keys_file: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:noncegate.db".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
            table_prefix: "wp_".to_string(),
            bootstrap_schema: false,
            keys_file: None,
        }
    }
}

impl DatabaseConfig {
    /// Connection timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Fully qualified name of the API key table
    pub fn api_keys_table(&self) -> String {
        format!("{}woocommerce_api_keys", self.table_prefix)
    }
}

impl ConfigValidation for DatabaseConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.keys_file.is_none() && self.url.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "database.url",
                &self.url,
                "Database URL cannot be empty",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                self.max_connections.to_string(),
                "Max connections must be greater than 0",
            ));
        }

        // The prefix is interpolated into SQL, so only identifier characters are allowed
        if !self
            .table_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigurationError::invalid_value(
                "database.table_prefix",
                &self.table_prefix,
                "Table prefix may only contain ASCII letters, digits and underscores",
            ));
        }

        Ok(())
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.bootstrap_schema {
            warnings.push(
                "database.bootstrap_schema is enabled; the API key table will be created if missing"
                    .to_string(),
            );
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.api_keys_table(), "wp_woocommerce_api_keys");
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unsafe_table_prefix() {
        let config = DatabaseConfig {
            table_prefix: "wp_; DROP TABLE x; --".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_connections() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bootstrap_warning() {
        let config = DatabaseConfig {
            bootstrap_schema: true,
            ..Default::default()
        };
        assert_eq!(config.warnings().len(), 1);
    }

    #[test]
    fn test_toml_roundtrip_keeps_prefix() {
        let config = DatabaseConfig {
            table_prefix: "shop_".to_string(),
            ..Default::default()
        };
        let serialized = toml::to_string(&config).unwrap();
        let parsed: DatabaseConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.api_keys_table(), "shop_woocommerce_api_keys");
    }
}
