//! Validation modules

pub mod content_type;
pub mod names;
pub mod tags;

pub use content_type::guess_content_type;
pub use names::{validate_filename, validate_folder_name};
pub use tags::parse_tags;
