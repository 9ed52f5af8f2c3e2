use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use common::PersistenceError;
use tracing::info;

use super::record::CredentialRecord;

/// Read-only access to stored API credentials
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find the record whose stored (hashed) consumer key equals `hashed_key`
    async fn find_by_consumer_key(
        &self,
        hashed_key: &str,
    ) -> Result<Option<CredentialRecord>, PersistenceError>;

    /// Check the backing store is reachable
    async fn health_check(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Credentials held in memory, keyed by hashed consumer key
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    records: HashMap<String, CredentialRecord>,
}

impl InMemoryCredentialStore {
    pub fn new(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.consumer_key.clone(), record))
                .collect(),
        }
    }

    /// Load a JSON array of records
    pub fn from_json_file(path: &Path) -> Result<Self, PersistenceError> {
        let contents = std::fs::read_to_string(path).map_err(|e| PersistenceError::FileError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        let records: Vec<CredentialRecord> = serde_json::from_str(&contents).map_err(|e| {
            PersistenceError::DeserializationFailed {
                details: format!("{}: {e}", path.display()),
            }
        })?;

        info!(
            "Loaded {} credential records from {}",
            records.len(),
            path.display()
        );
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_consumer_key(
        &self,
        hashed_key: &str,
    ) -> Result<Option<CredentialRecord>, PersistenceError> {
        Ok(self.records.get(hashed_key).cloned())
    }
}
