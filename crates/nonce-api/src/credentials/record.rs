use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the API key table
///
/// `consumer_key` holds the keyed hash of the key handed to the client.
/// `consumer_secret` is only ever used as HMAC key material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CredentialRecord {
    pub key_id: i64,
    pub user_id: i64,
    pub permissions: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default)]
    pub nonces: Option<String>,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("key_id", &self.key_id)
            .field("user_id", &self.user_id)
            .field("permissions", &self.permissions)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let record = CredentialRecord {
            key_id: 1,
            user_id: 2,
            permissions: "read".to_string(),
            consumer_key: "hash".to_string(),
            consumer_secret: "cs_very_secret".to_string(),
            nonces: None,
        };

        let debug = format!("{record:?}");
        assert!(!debug.contains("cs_very_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize_without_nonces() {
        let record: CredentialRecord = serde_json::from_str(
            r#"{"key_id":1,"user_id":2,"permissions":"read_write","consumer_key":"h","consumer_secret":"s"}"#,
        )
        .unwrap();
        assert_eq!(record.nonces, None);
        assert_eq!(record.permissions, "read_write");
    }
}
