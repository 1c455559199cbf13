use propdesk_core::{AppError, ErrorMetadata};
use propdesk_storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

/// Upload flow failures.
///
/// `Display` renders the text shown to the user, so a failure can be handed to a
/// [`Notifier`](crate::Notifier) as-is. Structured store errors show their client
/// message only; [`UploadError::log_detail`] carries the full chain.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Structured store failed while looking up the target folder; aborts the batch
    #[error("Failed to load target folder: {}", .0.client_message())]
    FolderLookup(#[source] AppError),

    /// Target folder does not exist; aborts the batch
    #[error("Target folder {0} not found")]
    FolderNotFound(Uuid),

    /// File name cannot be used as a storage path segment
    #[error("Error uploading {filename}: {reason}")]
    InvalidFileName { filename: String, reason: String },

    /// File size does not fit the record's size column
    #[error("Error uploading {filename}: file is too large ({size} bytes)")]
    FileTooLarge { filename: String, size: u64 },

    /// Blob upload failed; no record was written for this file
    #[error("Error uploading {filename}: {source}")]
    BlobUpload {
        filename: String,
        #[source]
        source: StorageError,
    },

    /// Record insert failed after the blob was stored at `storage_path`
    #[error("Error saving {filename}: {}", .source.client_message())]
    RecordInsert {
        filename: String,
        storage_path: String,
        #[source]
        source: AppError,
    },

    /// Anything the batch did not anticipate, such as a panic inside a store
    #[error("Upload failed")]
    Unexpected(String),
}

impl UploadError {
    /// Full error text for logs, including structured store error chains
    pub fn log_detail(&self) -> String {
        match self {
            UploadError::FolderLookup(source) | UploadError::RecordInsert { source, .. } => {
                format!("[{}] {}", source.error_code(), source.detailed_message())
            }
            UploadError::Unexpected(detail) => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_file_messages_name_the_file() {
        let err = UploadError::BlobUpload {
            filename: "lease.pdf".to_string(),
            source: StorageError::AlreadyExists("root/1_lease.pdf".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Error uploading lease.pdf: Object already exists: root/1_lease.pdf"
        );
    }

    #[test]
    fn oversized_files_report_their_size() {
        let err = UploadError::FileTooLarge {
            filename: "scan.tiff".to_string(),
            size: u64::MAX,
        };
        assert_eq!(
            err.to_string(),
            format!("Error uploading scan.tiff: file is too large ({} bytes)", u64::MAX)
        );
    }

    #[test]
    fn store_errors_show_client_message() {
        let err = UploadError::RecordInsert {
            filename: "lease.pdf".to_string(),
            storage_path: "root/1_lease.pdf".to_string(),
            source: AppError::Internal("connection reset by peer".to_string()),
        };
        assert_eq!(err.to_string(), "Error saving lease.pdf: Internal error");
        assert_eq!(
            err.log_detail(),
            "[INTERNAL_ERROR] Internal error: connection reset by peer"
        );
    }

    #[test]
    fn unexpected_errors_hide_details() {
        let err = UploadError::Unexpected("store panicked".to_string());
        assert_eq!(err.to_string(), "Upload failed");
        assert_eq!(err.log_detail(), "store panicked");
    }
}
