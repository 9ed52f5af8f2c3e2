use std::sync::Arc;

use common::{keyed_hash_hex, CryptoError};
use tracing::debug;

use super::record::CredentialRecord;
use super::sanitize::sanitize_text_field;
use super::store::CredentialStore;
use crate::error::Result;

/// Key the platform uses when hashing consumer keys for storage
pub const DEFAULT_KEY_HASH_SECRET: &str = "wc-api";

/// One-way transform from a client-held key to its stored lookup value
pub trait KeyHasher: Send + Sync {
    fn hash(&self, consumer_key: &str) -> std::result::Result<String, CryptoError>;
}

/// HMAC-SHA256 keyed hash with lowercase hex output
#[derive(Clone)]
pub struct HmacKeyHasher {
    secret: String,
}

impl HmacKeyHasher {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Default for HmacKeyHasher {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_HASH_SECRET)
    }
}

impl KeyHasher for HmacKeyHasher {
    fn hash(&self, consumer_key: &str) -> std::result::Result<String, CryptoError> {
        keyed_hash_hex(&self.secret, consumer_key)
    }
}

/// Maps a raw `oauth_consumer_key` to its stored credential record
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn KeyHasher>,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn KeyHasher>) -> Self {
        Self { store, hasher }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Sanitize, hash and look up a consumer key
    ///
    /// `Ok(None)` means no such key. Store failures propagate.
    pub async fn resolve(&self, raw_consumer_key: &str) -> Result<Option<CredentialRecord>> {
        let sanitized = sanitize_text_field(raw_consumer_key);
        if sanitized.is_empty() {
            debug!("Consumer key is empty after sanitization");
            return Ok(None);
        }

        let hashed = self.hasher.hash(&sanitized)?;
        Ok(self.store.find_by_consumer_key(&hashed).await?)
    }
}
