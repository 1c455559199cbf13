//! Propdesk database layer
//!
//! Repositories for the structured store: folder lookups and file metadata records.
//! Each repository implements a store trait so the upload flow can be exercised
//! without a database.

pub mod db;
pub mod pool;

pub use db::{FileRecordRepository, FileRecordStore, FolderRepository, FolderStore};
pub use pool::connect;
