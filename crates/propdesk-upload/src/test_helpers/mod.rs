//! Test helpers for upload flow tests
//!
//! In-memory blob and structured stores with failure injection, plus recording
//! notifier and progress reporter. No database or filesystem is needed.

pub mod fixtures;
pub mod mock_repositories;
pub mod mock_storage;
pub mod recorders;

pub use fixtures::*;
pub use mock_repositories::{MockFileRecordStore, MockFolderStore};
pub use mock_storage::{MockStorage, StoredUpload};
pub use recorders::{Notification, RecordingNotifier, RecordingProgress};

use crate::orchestrator::{UploadOrchestrator, UploadSettings};
use crate::uploader::FileUploader;
use std::sync::Arc;

/// One set of mock collaborators, shared with every orchestrator built from it
#[derive(Clone)]
pub struct TestStores {
    pub storage: Arc<MockStorage>,
    pub folders: Arc<MockFolderStore>,
    pub records: Arc<MockFileRecordStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub progress: Arc<RecordingProgress>,
}

impl TestStores {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(MockStorage::new()),
            folders: Arc::new(MockFolderStore::new()),
            records: Arc::new(MockFileRecordStore::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            progress: Arc::new(RecordingProgress::new()),
        }
    }

    pub fn orchestrator(&self) -> UploadOrchestrator {
        UploadOrchestrator::new(
            self.storage.clone(),
            self.folders.clone(),
            self.records.clone(),
            self.notifier.clone(),
            self.progress.clone(),
            UploadSettings::default(),
        )
    }

    pub fn uploader(&self) -> FileUploader {
        FileUploader::new(self.orchestrator())
    }
}

impl Default for TestStores {
    fn default() -> Self {
        Self::new()
    }
}
