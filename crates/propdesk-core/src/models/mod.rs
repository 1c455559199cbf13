//! Data models for the application
//!
//! Each sub-module represents one domain entity of the upload flow.

mod file_record;
mod folder;
mod selected_file;

pub use file_record::*;
pub use folder::*;
pub use selected_file::*;
