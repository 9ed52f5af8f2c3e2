//! Session nonce issuing
//!
//! Nonces are stateless: they are derived from a secret, the current time
//! window, the action and the user, so verification only recomputes them.

mod tick;

pub use tick::TickNonceGenerator;

use common::CryptoError;

/// Action the nonce endpoint issues nonces for
pub const STORE_API_ACTION: &str = "wc_store_api";

/// Which time window a verified nonce was issued in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceAge {
    /// Issued in the current half-lifetime window
    Fresh = 1,
    /// Issued in the previous window
    Aging = 2,
}

/// Creates and checks action-scoped nonces
pub trait NonceGenerator: Send + Sync {
    fn create(&self, action: &str, user_id: i64) -> Result<String, CryptoError>;

    fn verify(&self, nonce: &str, action: &str, user_id: i64) -> Option<NonceAge>;
}
