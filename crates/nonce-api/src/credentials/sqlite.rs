use async_trait::async_trait;
use common::persistence::{DatabaseConnection, SqliteConnection};
use common::{DatabaseConfig, PersistenceError};
use tracing::{debug, info};

use super::record::CredentialRecord;
use super::store::CredentialStore;

/// Credentials read from the platform's API key table
#[derive(Clone)]
pub struct SqliteCredentialStore {
    connection: SqliteConnection,
    table: String,
}

impl SqliteCredentialStore {
    pub fn new(connection: SqliteConnection, config: &DatabaseConfig) -> Self {
        Self {
            connection,
            table: config.api_keys_table(),
        }
    }

    /// Open the database and, when configured, create the key table
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, PersistenceError> {
        let connection = SqliteConnection::new(config).await?;
        let store = Self::new(connection, config);

        if config.bootstrap_schema {
            store.ensure_schema().await?;
        }

        Ok(store)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the API key table if it is missing
    pub async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        info!("Ensuring table {} exists", self.table);

        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                key_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT NULL,
                permissions TEXT NOT NULL,
                consumer_key TEXT NOT NULL,
                consumer_secret TEXT NOT NULL,
                nonces TEXT NULL,
                truncated_key TEXT NULL,
                last_access TEXT NULL
            )
            "#,
            table = self.table
        );
        sqlx::query(&create_table)
            .execute(self.connection.pool())
            .await
            .map_err(|e| PersistenceError::query_failed("create api key table", e))?;

        let create_index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_consumer_key ON {table} (consumer_key)",
            table = self.table
        );
        sqlx::query(&create_index)
            .execute(self.connection.pool())
            .await
            .map_err(|e| PersistenceError::query_failed("create consumer key index", e))?;

        Ok(())
    }

    /// Store a record, returning the assigned key id
    pub async fn insert(&self, record: &CredentialRecord) -> Result<i64, PersistenceError> {
        let query = format!(
            "INSERT INTO {} (user_id, permissions, consumer_key, consumer_secret, nonces) VALUES (?, ?, ?, ?, ?)",
            self.table
        );

        let result = sqlx::query(&query)
            .bind(record.user_id)
            .bind(&record.permissions)
            .bind(&record.consumer_key)
            .bind(&record.consumer_secret)
            .bind(&record.nonces)
            .execute(self.connection.pool())
            .await
            .map_err(|e| PersistenceError::query_failed("insert api key", e))?;

        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_by_consumer_key(
        &self,
        hashed_key: &str,
    ) -> Result<Option<CredentialRecord>, PersistenceError> {
        debug!("Looking up API key in {}", self.table);

        let query = format!(
            "SELECT key_id, user_id, permissions, consumer_key, consumer_secret, nonces FROM {} WHERE consumer_key = ?",
            self.table
        );

        sqlx::query_as::<_, CredentialRecord>(&query)
            .bind(hashed_key)
            .fetch_optional(self.connection.pool())
            .await
            .map_err(|e| PersistenceError::query_failed("select api key by consumer key", e))
    }

    async fn health_check(&self) -> Result<(), PersistenceError> {
        self.connection.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store(dir: &tempfile::TempDir) -> SqliteCredentialStore {
        let config = DatabaseConfig {
            url: format!("sqlite:{}", dir.path().join("keys.db").display()),
            max_connections: 1,
            table_prefix: "shop_".to_string(),
            bootstrap_schema: true,
            ..Default::default()
        };
        SqliteCredentialStore::connect(&config).await.unwrap()
    }

    fn record(consumer_key: &str) -> CredentialRecord {
        CredentialRecord {
            key_id: 0,
            user_id: 42,
            permissions: "read_write".to_string(),
            consumer_key: consumer_key.to_string(),
            consumer_secret: "cs_secret".to_string(),
            nonces: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        assert_eq!(store.table(), "shop_woocommerce_api_keys");

        let key_id = store.insert(&record("hashed-key")).await.unwrap();
        let found = store
            .find_by_consumer_key("hashed-key")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.key_id, key_id);
        assert_eq!(found.user_id, 42);
        assert_eq!(found.consumer_secret, "cs_secret");
        assert_eq!(found.nonces, None);
    }

    #[tokio::test]
    async fn test_unknown_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        store.insert(&record("hashed-key")).await.unwrap();

        assert!(store.find_by_consumer_key("other").await.unwrap().is_none());
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();
    }
}
