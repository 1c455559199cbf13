//! Propdesk Upload Library
//!
//! Bulk upload flow: resolves the target folder, uploads every selected file to
//! the blob store, and writes one metadata record per uploaded file.
//!
//! [`FileUploader`] is the entry point for interactive callers; it owns the
//! selection and the in-flight flag and delegates each batch to an
//! [`UploadOrchestrator`].

pub mod error;
pub mod notifier;
pub mod orchestrator;
pub mod progress;
pub mod resolver;
pub mod uploader;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::UploadError;
pub use notifier::Notifier;
pub use orchestrator::{BatchReport, FileOutcome, UploadOrchestrator, UploadRequest, UploadSettings};
pub use progress::{FileProgress, NoopProgress, ProgressMap, ProgressReporter, ProgressTracker};
pub use resolver::{resolve_target, UploadTarget};
pub use uploader::{FileUploader, UploadAttempt, UploadCompleteCallback};
