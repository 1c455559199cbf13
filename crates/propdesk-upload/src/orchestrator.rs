use crate::error::UploadError;
use crate::notifier::Notifier;
use crate::progress::{ProgressReporter, ProgressTracker};
use crate::resolver::{resolve_target, UploadTarget};
use chrono::Utc;
use futures::future::join_all;
use propdesk_core::constants::DEFAULT_CACHE_CONTROL;
use propdesk_core::models::{
    FileCategory, FileMetadata, FileRecord, FileType, NewFileRecord, SelectedFile,
};
use propdesk_core::validation::{parse_tags, validate_filename};
use propdesk_core::{Config, ErrorMetadata};
use propdesk_db::{FileRecordStore, FolderStore};
use propdesk_storage::{Storage, UploadOptions};
use std::sync::Arc;
use uuid::Uuid;

/// Settings applied to every upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// `Cache-Control` max-age in seconds
    pub cache_control: String,
}

impl UploadSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache_control: config.upload_cache_control().to_string(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            cache_control: DEFAULT_CACHE_CONTROL.to_string(),
        }
    }
}

/// Form values shared by every file of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    pub folder_id: Option<Uuid>,
    /// Free text; blank means no description
    pub description: String,
    /// Comma-separated tags
    pub tags: String,
    /// Overrides the MIME-derived category when set
    pub category: Option<FileCategory>,
}

/// Result of one file's pipeline
#[derive(Debug)]
pub enum FileOutcome {
    Uploaded(FileRecord),
    Failed(UploadError),
}

/// Per-file outcomes of a settled batch, in selection order
#[derive(Debug)]
pub struct BatchReport {
    /// Milliseconds since the Unix epoch, shared by every object name in the batch
    pub timestamp: i64,
    pub target: UploadTarget,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn uploaded(&self) -> impl Iterator<Item = &FileRecord> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Uploaded(record) => Some(record),
            FileOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &UploadError> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed(err) => Some(err),
            FileOutcome::Uploaded(_) => None,
        })
    }

    pub fn succeeded_count(&self) -> usize {
        self.uploaded().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Values computed once per batch and shared by every pipeline
struct Batch {
    timestamp: i64,
    target: UploadTarget,
    description: Option<String>,
    tags: Vec<String>,
    category: Option<FileCategory>,
}

/// Runs one upload batch: resolve the folder, then upload and record every file
/// independently.
pub struct UploadOrchestrator {
    storage: Arc<dyn Storage>,
    folders: Arc<dyn FolderStore>,
    records: Arc<dyn FileRecordStore>,
    notifier: Arc<dyn Notifier>,
    progress: ProgressTracker,
    settings: UploadSettings,
}

impl UploadOrchestrator {
    pub fn new(
        storage: Arc<dyn Storage>,
        folders: Arc<dyn FolderStore>,
        records: Arc<dyn FileRecordStore>,
        notifier: Arc<dyn Notifier>,
        progress: Arc<dyn ProgressReporter>,
        settings: UploadSettings,
    ) -> Self {
        Self {
            storage,
            folders,
            records,
            notifier,
            progress: ProgressTracker::new(progress),
            settings,
        }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Upload `files` as one batch.
    ///
    /// Per-file failures are notified and recorded in the report; they never fail
    /// the batch. The only error returned is a failed folder resolution, which
    /// is notified once and happens before any upload starts.
    #[tracing::instrument(
        skip(self, files, request),
        fields(file_count = files.len(), folder_id = ?request.folder_id)
    )]
    pub async fn run(
        &self,
        files: Vec<SelectedFile>,
        request: &UploadRequest,
    ) -> Result<BatchReport, UploadError> {
        let start = std::time::Instant::now();
        self.progress.reset();

        let target = match resolve_target(self.folders.as_ref(), request.folder_id).await {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(error = %e.log_detail(), "Upload batch aborted");
                self.notifier.error(&e.to_string());
                return Err(e);
            }
        };

        let batch = Batch {
            timestamp: Utc::now().timestamp_millis(),
            target,
            description: Some(request.description.trim())
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            tags: parse_tags(&request.tags),
            category: request.category,
        };

        let outcomes = join_all(
            files
                .into_iter()
                .enumerate()
                .map(|(index, file)| self.upload_file(&batch, index, file)),
        )
        .await;

        let report = BatchReport {
            timestamp: batch.timestamp,
            target: batch.target,
            outcomes,
        };

        tracing::info!(
            path = %report.target.path,
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload batch settled"
        );

        Ok(report)
    }

    async fn upload_file(&self, batch: &Batch, index: usize, file: SelectedFile) -> FileOutcome {
        self.progress.update(index, &file.name, 0);

        match self.persist(batch, &file).await {
            Ok(record) => {
                self.notifier
                    .success(&format!("{} uploaded successfully", file.name));
                self.progress.update(index, &file.name, 100);
                FileOutcome::Uploaded(record)
            }
            Err(e) => {
                match &e {
                    UploadError::RecordInsert {
                        storage_path,
                        source,
                        ..
                    } => tracing::warn!(
                        error = %e.log_detail(),
                        recoverable = source.is_recoverable(),
                        filename = %file.name,
                        path = %storage_path,
                        "File record insert failed; blob left in place"
                    ),
                    _ => tracing::warn!(
                        error = %e.log_detail(),
                        filename = %file.name,
                        "File upload failed"
                    ),
                }
                self.notifier.error(&e.to_string());
                FileOutcome::Failed(e)
            }
        }
    }

    async fn persist(&self, batch: &Batch, file: &SelectedFile) -> Result<FileRecord, UploadError> {
        validate_filename(&file.name).map_err(|reason| UploadError::InvalidFileName {
            filename: file.name.clone(),
            reason,
        })?;
        let size = i64::try_from(file.size).map_err(|_| UploadError::FileTooLarge {
            filename: file.name.clone(),
            size: file.size,
        })?;

        let object_name = format!("{}_{}", batch.timestamp, file.name);
        let storage_path = batch.target.storage_path(&object_name);

        let mut options = UploadOptions::create_only(self.settings.cache_control.clone());
        if !file.mime_type.is_empty() {
            options = options.with_content_type(file.mime_type.clone());
        }

        self.storage
            .upload(&storage_path, file.bytes.clone(), &options)
            .await
            .map_err(|source| UploadError::BlobUpload {
                filename: file.name.clone(),
                source,
            })?;

        let file_type = FileType::from_mime(&file.mime_type);
        let record = NewFileRecord {
            filename: object_name,
            original_filename: file.name.clone(),
            description: batch.description.clone(),
            size,
            mime_type: file.mime_type.clone(),
            file_type,
            category: FileCategory::resolve(batch.category, file_type),
            storage_path: storage_path.clone(),
            folder_id: batch.target.folder_id,
            metadata: FileMetadata {
                tags: batch.tags.clone(),
            },
        };

        self.records
            .insert(record)
            .await
            .map_err(|source| UploadError::RecordInsert {
                filename: file.name.clone(),
                storage_path,
                source,
            })
    }
}
