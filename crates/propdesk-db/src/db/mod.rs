//! Database repositories for the data access layer

pub mod file_record;
pub mod folder;

pub use file_record::{FileRecordRepository, FileRecordStore};
pub use folder::{FolderRepository, FolderStore};
