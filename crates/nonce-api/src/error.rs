//! Error types for the nonce API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::NoncegateError;
use serde_json::json;
use thiserror::Error;

/// Message returned for every failed authentication, whatever the cause
pub const UNAUTHORIZED_MESSAGE: &str = "Sorry, you are not allowed to do that.";

/// Main error type for the nonce API
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] common::ConfigurationError),

    /// Credential store error
    #[error("Credential store error: {0}")]
    Persistence(#[from] common::PersistenceError),

    /// Cryptographic failure
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] common::CryptoError),

    /// Authentication error
    #[error("{message}")]
    Authentication { message: String },

    /// Internal server error
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl NoncegateError for Error {}

impl Error {
    /// The single response for any rejected signed request
    pub fn unauthorized() -> Self {
        Error::Authentication {
            message: UNAUTHORIZED_MESSAGE.to_string(),
        }
    }

    /// Get error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config(_) => "NONCEGATE_CONFIG_ERROR",
            Error::Persistence(_) => "NONCEGATE_STORE_ERROR",
            Error::Crypto(_) => "NONCEGATE_CRYPTO_ERROR",
            Error::Authentication { .. } => "NONCEGATE_AUTH_ERROR",
            Error::Internal { .. } => "NONCEGATE_INTERNAL_ERROR",
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }

    /// Check if error is a client error
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Authentication { .. } => StatusCode::UNAUTHORIZED,
            Error::Config(_) | Error::Persistence(_) | Error::Crypto(_) | Error::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Server-side details stay in the logs
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        };

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": message,
                "timestamp": chrono::Utc::now(),
                "retryable": self.is_retryable(),
            }
        }));

        (status, body).into_response()
    }
}

/// Error response structure for API documentation
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetails,
}

/// Error details structure
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorDetails {
    /// Error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// ISO 8601 timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Whether the error is retryable
    pub retryable: bool,
}
