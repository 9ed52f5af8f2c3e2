//! Telemetry configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Enable Prometheus metrics
    pub enable_metrics: bool,

    /// Address of the Prometheus scrape listener
    pub metrics_address: SocketAddr,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            enable_metrics: false,
            metrics_address: SocketAddr::from(([127, 0, 0, 1], 9090)),
        }
    }
}
