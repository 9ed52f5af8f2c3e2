//! # Configuration Abstractions
//!
//! Layered configuration loading and the database configuration shared by
//! Noncegate components.

pub mod loader;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use loader::*;
pub use traits::*;
pub use types::*;
