//! # Persistence Traits
//!
//! Core traits for database connection management.

use async_trait::async_trait;

use crate::error::PersistenceError;

/// Database connection abstraction
#[async_trait]
pub trait DatabaseConnection {
    /// Execute a health check
    async fn health_check(&self) -> Result<(), PersistenceError>;

    /// Close the connection
    async fn close(&self);
}
