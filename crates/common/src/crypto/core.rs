//! Cryptographic utilities for Noncegate
//!
//! # Security Considerations
//! - Keys and secrets are never logged
//! - Digest comparison is constant-time via `subtle`

use crate::error::CryptoError;
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Default size in bytes of generated secrets
pub const DEFAULT_SECRET_SIZE: usize = 32;

/// Hash function backing an HMAC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacAlgorithm {
    Sha1,
    Sha256,
}

impl MacAlgorithm {
    /// Name of the underlying hash, lowercase
    pub fn as_str(&self) -> &'static str {
        match self {
            MacAlgorithm::Sha1 => "sha1",
            MacAlgorithm::Sha256 => "sha256",
        }
    }
}

/// Compute the raw HMAC of `data` under `key`
///
/// # Arguments
/// * `algorithm` - Hash function to use
/// * `key` - MAC key bytes, any length
/// * `data` - Message bytes
///
/// # Returns
/// * Raw digest bytes (20 for SHA-1, 32 for SHA-256)
pub fn hmac_digest(
    algorithm: MacAlgorithm,
    key: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let invalid_key = |_| CryptoError::InvalidKey {
        algorithm: algorithm.as_str().to_string(),
    };

    let digest = match algorithm {
        MacAlgorithm::Sha1 => {
            let mut mac = HmacSha1::new_from_slice(key).map_err(invalid_key)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        MacAlgorithm::Sha256 => {
            let mut mac = HmacSha256::new_from_slice(key).map_err(invalid_key)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    };

    Ok(digest)
}

/// One-way keyed hash of an identifier, as lowercase hex
///
/// HMAC-SHA256 of `data` keyed with `key`. Used to turn public identifiers
/// into lookup keys that match what the key store persisted.
pub fn keyed_hash_hex(key: &str, data: &str) -> Result<String, CryptoError> {
    let digest = hmac_digest(MacAlgorithm::Sha256, key.as_bytes(), data.as_bytes())?;
    Ok(hex::encode(digest))
}

/// Constant-time equality of two byte slices
///
/// Execution time does not depend on the position of the first differing
/// byte. Slices of different lengths compare unequal.
pub fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Generate a cryptographically secure random key
pub fn generate_random_key(size: usize) -> Vec<u8> {
    let mut key = vec![0u8; size];
    OsRng.fill_bytes(&mut key);
    key
}
