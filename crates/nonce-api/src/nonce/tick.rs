use std::fmt;

use common::{generate_random_key, keyed_hash_hex, secure_compare, CryptoError, DEFAULT_SECRET_SIZE};
use tracing::warn;

use super::{NonceAge, NonceGenerator};
use crate::config::NonceConfig;

const NONCE_LEN: usize = 10;
const NONCE_END_OFFSET: usize = 12;

/// Nonces bound to a time tick of half the configured lifetime
///
/// A nonce is valid in the tick it was issued in and the one after, so its
/// effective lifetime is between half and the full lifetime.
#[derive(Clone)]
pub struct TickNonceGenerator {
    secret: String,
    lifetime_secs: u64,
}

impl fmt::Debug for TickNonceGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickNonceGenerator")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl TickNonceGenerator {
    pub fn new(secret: impl Into<String>, lifetime_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Build from config, generating a process-local secret when none is set
    pub fn from_config(config: &NonceConfig) -> Self {
        let secret = match &config.secret {
            Some(secret) => secret.clone(),
            None => {
                warn!("No nonce secret configured; nonces will not survive a restart");
                hex::encode(generate_random_key(DEFAULT_SECRET_SIZE))
            }
        };

        Self::new(secret, config.lifetime_secs)
    }

    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    /// Window number for a unix timestamp, rounding up
    pub fn tick(&self, now: u64) -> u64 {
        let half = (self.lifetime_secs / 2).max(1);
        now.div_ceil(half)
    }

    pub fn create_at(&self, action: &str, user_id: i64, now: u64) -> Result<String, CryptoError> {
        self.nonce_for_tick(self.tick(now), action, user_id)
    }

    pub fn verify_at(&self, nonce: &str, action: &str, user_id: i64, now: u64) -> Option<NonceAge> {
        if nonce.is_empty() {
            return None;
        }

        let tick = self.tick(now);
        let candidates = [(tick, NonceAge::Fresh), (tick.saturating_sub(1), NonceAge::Aging)];

        candidates.into_iter().find_map(|(tick, age)| {
            let expected = self.nonce_for_tick(tick, action, user_id).ok()?;
            secure_compare(expected.as_bytes(), nonce.as_bytes()).then_some(age)
        })
    }

    fn nonce_for_tick(&self, tick: u64, action: &str, user_id: i64) -> Result<String, CryptoError> {
        // Trailing field is the session token, empty for key-authenticated callers
        let data = format!("{tick}|{action}|{user_id}|");
        let digest = keyed_hash_hex(&self.secret, &data)?;

        let end = digest.len() - NONCE_END_OFFSET;
        Ok(digest[end..end + NONCE_LEN].to_string())
    }
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

impl NonceGenerator for TickNonceGenerator {
    fn create(&self, action: &str, user_id: i64) -> Result<String, CryptoError> {
        self.create_at(action, user_id, unix_now())
    }

    fn verify(&self, nonce: &str, action: &str, user_id: i64) -> Option<NonceAge> {
        self.verify_at(nonce, action, user_id, unix_now())
    }
}
