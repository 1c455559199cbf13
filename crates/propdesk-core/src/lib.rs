//! Propdesk Core Library
//!
//! This crate provides the domain models, error types, configuration, and validation
//! shared by the storage, database, upload, and CLI crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata};
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in the propdesk-storage crate
