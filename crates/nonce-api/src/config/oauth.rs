//! Request signing configuration

use serde::{Deserialize, Serialize};

use crate::credentials::DEFAULT_KEY_HASH_SECRET;

/// How signed requests are canonicalized and keys looked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Path the site is mounted under; stripped before the URL is rebuilt
    pub base_path: String,

    /// Public site URL (`https://shop.example/blog/`). When set, its scheme,
    /// host and path replace what the request carries.
    pub site_url: Option<String>,

    /// Scheme assumed when the request does not say otherwise
    pub public_scheme: String,

    /// Honour `X-Forwarded-Proto` from a reverse proxy
    pub trust_forwarded_proto: bool,

    /// HMAC key used when hashing consumer keys for lookup
    pub key_hash_secret: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            site_url: None,
            public_scheme: "http".to_string(),
            trust_forwarded_proto: false,
            key_hash_secret: DEFAULT_KEY_HASH_SECRET.to_string(),
        }
    }
}
