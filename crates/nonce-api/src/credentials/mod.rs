//! Credential lookup for signed requests
//!
//! Consumer keys are stored as keyed hashes, so a lookup sanitizes and hashes
//! the key the caller sent before querying the store.

mod record;
mod resolver;
mod sanitize;
mod sqlite;
mod store;

pub use record::CredentialRecord;
pub use resolver::{CredentialResolver, HmacKeyHasher, KeyHasher, DEFAULT_KEY_HASH_SECRET};
pub use sanitize::sanitize_text_field;
pub use sqlite::SqliteCredentialStore;
pub use store::{CredentialStore, InMemoryCredentialStore};

#[cfg(test)]
pub use store::MockCredentialStore;
