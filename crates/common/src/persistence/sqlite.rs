//! SQLite connection pool wrapper
//!
//! The credential store only reads, so the wrapper keeps the pool small and
//! creates the database file only when schema bootstrapping is requested.

#[cfg(feature = "sqlite")]
mod sqlite_impl {
    use async_trait::async_trait;
    use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
    use tracing::{debug, info};

    use super::super::traits::DatabaseConnection;
    use crate::config::DatabaseConfig;
    use crate::error::PersistenceError;

    /// SQLite connection wrapper
    #[derive(Clone)]
    pub struct SqliteConnection {
        pool: SqlitePool,
    }

    impl SqliteConnection {
        /// Open a pool for the configured database URL
        pub async fn new(config: &DatabaseConfig) -> Result<Self, PersistenceError> {
            info!("Initializing SQLite connection pool");

            if config.bootstrap_schema
                && !Sqlite::database_exists(&config.url)
                    .await
                    .map_err(PersistenceError::connection_failed)?
            {
                info!("Creating new SQLite database");
                Sqlite::create_database(&config.url)
                    .await
                    .map_err(PersistenceError::connection_failed)?;
            }

            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.connect_timeout())
                .connect(&config.url)
                .await
                .map_err(PersistenceError::connection_failed)?;

            info!("SQLite connection established");
            Ok(Self { pool })
        }

        /// Get connection pool
        pub fn pool(&self) -> &SqlitePool {
            &self.pool
        }
    }

    #[async_trait]
    impl DatabaseConnection for SqliteConnection {
        async fn health_check(&self) -> Result<(), PersistenceError> {
            debug!("Running SQLite health check");
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(|e| PersistenceError::query_failed("SELECT 1", e))?;
            Ok(())
        }

        async fn close(&self) {
            info!("Closing SQLite connection pool");
            self.pool.close().await;
        }
    }

}

#[cfg(feature = "sqlite")]
pub use sqlite_impl::*;

#[cfg(not(feature = "sqlite"))]
mod fallback {
    /// Placeholder when SQLite feature is disabled
    pub struct SqliteConnection;
}

#[cfg(not(feature = "sqlite"))]
pub use fallback::*;
