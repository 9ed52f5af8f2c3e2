//! Nonce issuing configuration

use serde::{Deserialize, Serialize};

use crate::nonce::STORE_API_ACTION;

/// Nonce generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceConfig {
    /// Action nonces are issued for
    pub action: String,

    /// Full nonce lifetime in seconds
    pub lifetime_secs: u64,

    /// HMAC secret; a random one is generated at startup when unset
    pub secret: Option<String>,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self {
            action: STORE_API_ACTION.to_string(),
            lifetime_secs: 86_400,
            secret: None,
        }
    }
}
