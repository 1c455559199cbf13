//! Test fixtures

use chrono::Utc;
use propdesk_core::models::{Folder, SelectedFile};
use uuid::Uuid;

/// Selected file with eight bytes of content
pub fn selected(name: &str, mime_type: &str) -> SelectedFile {
    SelectedFile::new(name, mime_type, &b"contents"[..])
}

/// Top-level folder stored at `path`
pub fn folder(path: &str) -> Folder {
    let now = Utc::now();
    Folder {
        id: Uuid::new_v4(),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        parent_id: None,
        created_at: now,
        updated_at: now,
    }
}
