//! Cryptographic utilities module for Noncegate
//!
//! This module provides the primitives used by request signing:
//! - HMAC-SHA1 / HMAC-SHA256 digests
//! - Keyed one-way hashing of lookup identifiers
//! - Constant-time comparison
//! - Random key generation

// Core cryptographic functions
mod core;

pub use core::{
    generate_random_key, hmac_digest, keyed_hash_hex, secure_compare, MacAlgorithm,
    DEFAULT_SECRET_SIZE,
};
