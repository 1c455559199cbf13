//! Mock structured store implementations for testing

use async_trait::async_trait;
use chrono::Utc;
use propdesk_core::models::{FileRecord, Folder, NewFileRecord};
use propdesk_core::AppError;
use propdesk_db::{FileRecordStore, FolderStore};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Mock folder store
#[derive(Clone, Default)]
pub struct MockFolderStore {
    folders: Arc<Mutex<HashMap<Uuid, Folder>>>,
    fail: Arc<AtomicBool>,
    lookups: Arc<AtomicUsize>,
}

impl MockFolderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&self, folder: Folder) {
        self.folders.lock().unwrap().insert(folder.id, folder);
    }

    /// Make every lookup fail with a database-style error
    pub fn fail_lookups(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FolderStore for MockFolderStore {
    async fn get_folder(&self, id: Uuid) -> Result<Option<Folder>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected folder lookup failure".to_string()));
        }
        Ok(self.folders.lock().unwrap().get(&id).cloned())
    }
}

/// Mock file record store; inserts can fail by original file name
#[derive(Clone, Default)]
pub struct MockFileRecordStore {
    records: Arc<Mutex<Vec<FileRecord>>>,
    fail_names: Arc<Mutex<HashSet<String>>>,
    inserts: Arc<AtomicUsize>,
}

impl MockFileRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail inserts for records whose `original_filename` is `name`
    pub fn fail_on(&self, name: &str) {
        self.fail_names.lock().unwrap().insert(name.to_string());
    }

    pub fn records(&self) -> Vec<FileRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn record_named(&self, original_filename: &str) -> Option<FileRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.original_filename == original_filename)
            .cloned()
    }

    /// Insert calls, including failed ones
    pub fn insert_attempts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileRecordStore for MockFileRecordStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self
            .fail_names
            .lock()
            .unwrap()
            .contains(&record.original_filename)
        {
            return Err(AppError::Internal("injected insert failure".to_string()));
        }

        let record = record.into_record(Uuid::new_v4(), Utc::now());
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(
        &self,
        folder_id: Option<Option<Uuid>>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FileRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .filter(|r| folder_id.map_or(true, |fid| r.folder_id == fid))
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }
}
