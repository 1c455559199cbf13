use crate::error::UploadError;
use crate::orchestrator::{BatchReport, UploadOrchestrator, UploadRequest};
use futures::FutureExt;
use propdesk_core::constants::EMPTY_SELECTION_MESSAGE;
use propdesk_core::models::SelectedFile;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Invoked once after every file of a batch has settled
pub type UploadCompleteCallback = Arc<dyn Fn(&BatchReport) + Send + Sync>;

/// What a call to [`FileUploader::upload_files`] did
#[derive(Debug)]
pub enum UploadAttempt {
    /// Nothing was selected; a validation notice was shown
    NothingSelected,
    /// Another batch was still running; the call was ignored
    AlreadyUploading,
    /// The batch ran; per-file results are in the report
    Completed(BatchReport),
    /// The batch stopped before settling (folder resolution or an unexpected failure)
    Aborted(UploadError),
}

/// Clears the in-flight flag when dropped, including during unwinding
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Upload trigger: holds the current selection and starts at most one batch at a
/// time.
pub struct FileUploader {
    orchestrator: UploadOrchestrator,
    selection: Mutex<Vec<SelectedFile>>,
    is_uploading: AtomicBool,
    on_upload_complete: Option<UploadCompleteCallback>,
}

impl FileUploader {
    pub fn new(orchestrator: UploadOrchestrator) -> Self {
        Self {
            orchestrator,
            selection: Mutex::new(Vec::new()),
            is_uploading: AtomicBool::new(false),
            on_upload_complete: None,
        }
    }

    pub fn with_on_upload_complete(mut self, callback: UploadCompleteCallback) -> Self {
        self.on_upload_complete = Some(callback);
        self
    }

    /// Replace the current selection
    pub fn select_files(&self, files: Vec<SelectedFile>) {
        *self.lock_selection() = files;
    }

    pub fn selected(&self) -> Vec<SelectedFile> {
        self.lock_selection().clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading.load(Ordering::Acquire)
    }

    /// Upload the current selection as one batch.
    ///
    /// The selection is taken when the batch starts, so files selected while it
    /// runs are kept for the next batch. An aborted batch puts its files back
    /// unless something else was selected in the meantime.
    pub async fn upload_files(&self, request: &UploadRequest) -> UploadAttempt {
        let Some(_guard) = InFlightGuard::acquire(&self.is_uploading) else {
            tracing::debug!("Upload already in progress, ignoring trigger");
            return UploadAttempt::AlreadyUploading;
        };

        let files = std::mem::take(&mut *self.lock_selection());
        if files.is_empty() {
            self.orchestrator.notifier().error(EMPTY_SELECTION_MESSAGE);
            return UploadAttempt::NothingSelected;
        }

        let result = AssertUnwindSafe(self.orchestrator.run(files.clone(), request))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(report)) => {
                if let Some(callback) = &self.on_upload_complete {
                    callback(&report);
                }
                UploadAttempt::Completed(report)
            }
            // Already notified by the orchestrator
            Ok(Err(e)) => {
                self.restore_selection(files);
                UploadAttempt::Aborted(e)
            }
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                tracing::error!(error = %detail, "Upload batch panicked");
                self.restore_selection(files);
                let err = UploadError::Unexpected(detail);
                self.orchestrator.notifier().error(&err.to_string());
                UploadAttempt::Aborted(err)
            }
        }
    }

    fn lock_selection(&self) -> MutexGuard<'_, Vec<SelectedFile>> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn restore_selection(&self, files: Vec<SelectedFile>) {
        let mut selection = self.lock_selection();
        if selection.is_empty() {
            *selection = files;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive_and_releases_on_drop() {
        let flag = AtomicBool::new(false);

        let guard = InFlightGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(flag.load(Ordering::Acquire));
        assert!(InFlightGuard::acquire(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(InFlightGuard::acquire(&flag).is_some());
    }

    #[test]
    fn panic_payloads_are_readable() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(payload.as_ref()), "kaboom");

        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
