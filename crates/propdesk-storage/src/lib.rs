//! Propdesk Storage Library
//!
//! This crate provides the blob store abstraction used by the upload flow, with
//! implementations for S3-compatible object storage and the local filesystem.
//!
//! # Storage path format
//!
//! Paths are chosen by the caller, e.g. `properties/harbour-view/1718000000000_lease.pdf`
//! or `root/1718000000000_photo.jpg`. Paths must not be empty, have a `..` component, or start
//! with `/`; the check lives in the `keys` module so every backend applies it.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use propdesk_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, UploadOptions};
