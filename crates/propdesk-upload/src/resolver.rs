use crate::error::UploadError;
use propdesk_core::constants::ROOT_FOLDER_PATH;
use propdesk_db::FolderStore;
use uuid::Uuid;

/// Where a batch lands: a storage path prefix and the folder reference recorded
/// on each file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub path: String,
    pub folder_id: Option<Uuid>,
}

impl UploadTarget {
    /// Synthetic root target used when no folder is selected
    pub fn root() -> Self {
        Self {
            path: ROOT_FOLDER_PATH.to_string(),
            folder_id: None,
        }
    }

    /// Storage path for an object named `object_name` inside this target
    pub fn storage_path(&self, object_name: &str) -> String {
        format!("{}/{}", self.path.trim_end_matches('/'), object_name)
    }
}

/// Resolve the target for a batch.
///
/// No folder id means the root target. A lookup error or a missing folder is
/// returned as an error and the caller must not start any upload.
#[tracing::instrument(skip(folders))]
pub async fn resolve_target(
    folders: &dyn FolderStore,
    folder_id: Option<Uuid>,
) -> Result<UploadTarget, UploadError> {
    let Some(folder_id) = folder_id else {
        return Ok(UploadTarget::root());
    };

    let folder = folders
        .get_folder(folder_id)
        .await
        .map_err(UploadError::FolderLookup)?
        .ok_or(UploadError::FolderNotFound(folder_id))?;

    Ok(UploadTarget {
        path: folder.path,
        folder_id: Some(folder.id),
    })
}
