//! Mock blob store for testing

use async_trait::async_trait;
use bytes::Bytes;
use propdesk_storage::{Storage, StorageBackend, StorageError, StorageResult, UploadOptions};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// A successful upload as seen by the store
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub path: String,
    pub data: Bytes,
    pub options: UploadOptions,
}

/// In-memory blob store.
///
/// Failures are injected by selected file name: the store matches paths ending
/// in `_<name>`, which is how the upload flow names objects. Every call yields
/// once so concurrent pipelines interleave.
#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
    uploads: Arc<Mutex<Vec<StoredUpload>>>,
    attempts: Arc<Mutex<usize>>,
    fail_names: Arc<Mutex<HashSet<String>>>,
    panic_names: Arc<Mutex<HashSet<String>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail uploads of the file selected as `name`
    pub fn fail_on(&self, name: &str) {
        self.fail_names.lock().unwrap().insert(name.to_string());
    }

    /// Panic while uploading the file selected as `name`
    pub fn panic_on(&self, name: &str) {
        self.panic_names.lock().unwrap().insert(name.to_string());
    }

    /// Successful uploads in completion order
    pub fn uploads(&self) -> Vec<StoredUpload> {
        self.uploads.lock().unwrap().clone()
    }

    /// Upload calls, including failed ones
    pub fn upload_attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }

    fn matches(names: &Mutex<HashSet<String>>, path: &str) -> bool {
        names
            .lock()
            .unwrap()
            .iter()
            .any(|name| path.ends_with(&format!("_{}", name)))
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<String> {
        *self.attempts.lock().unwrap() += 1;
        tokio::task::yield_now().await;

        if Self::matches(&self.panic_names, path) {
            panic!("mock storage panic for {}", path);
        }
        if Self::matches(&self.fail_names, path) {
            return Err(StorageError::UploadFailed("injected failure".to_string()));
        }

        let mut objects = self.objects.lock().unwrap();
        if !options.upsert && objects.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        objects.insert(path.to_string(), data.clone());
        drop(objects);

        self.uploads.lock().unwrap().push(StoredUpload {
            path: path.to_string(),
            data,
            options: options.clone(),
        });
        Ok(path.to_string())
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(storage_key)
            .map(|data| data.to_vec())
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.objects.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.contains(storage_key))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("mock://{}", storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
