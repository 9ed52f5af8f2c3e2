//! # Persistence Abstractions
//!
//! Connection traits and the SQLite pool wrapper used by credential stores.

pub mod sqlite;
pub mod traits;

// Re-export commonly used types
pub use sqlite::*;
pub use traits::*;
