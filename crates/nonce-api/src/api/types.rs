//! API types for the nonce API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Nonce payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoncePayload {
    /// Nonce for the store API action
    pub nonce: String,
}

/// Response of the nonce endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NonceResponse {
    pub response: NoncePayload,
}

impl NonceResponse {
    pub fn new(nonce: impl Into<String>) -> Self {
        Self {
            response: NoncePayload {
                nonce: nonce.into(),
            },
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthCheckResponse {
    /// Service status ("healthy" or "degraded")
    pub status: String,

    /// Service version
    pub version: String,

    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Whether the credential store answered
    pub credential_store_reachable: bool,
}

/// Consumer that passed signature verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedConsumer {
    pub key_id: i64,
    pub user_id: i64,
    pub permissions: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_response_shape() {
        let json = serde_json::to_value(NonceResponse::new("0123456789")).unwrap();
        assert_eq!(json, serde_json::json!({"response": {"nonce": "0123456789"}}));
    }
}
