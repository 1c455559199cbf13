use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Progress of one selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProgress {
    pub filename: String,
    /// Percent, 0..=100
    pub percent: u8,
}

/// Upload progress keyed by position in the selection, so files sharing a
/// name keep separate entries
pub type ProgressMap = BTreeMap<usize, FileProgress>;

/// Receives progress snapshots for the current batch
pub trait ProgressReporter: Send + Sync {
    fn set_upload_progress(&self, progress: &ProgressMap);
}

/// Accumulates per-file progress for one batch and pushes a full snapshot to the
/// reporter on every change.
pub struct ProgressTracker {
    reporter: Arc<dyn ProgressReporter>,
    progress: Mutex<ProgressMap>,
}

impl ProgressTracker {
    pub fn new(reporter: Arc<dyn ProgressReporter>) -> Self {
        Self {
            reporter,
            progress: Mutex::new(ProgressMap::new()),
        }
    }

    /// Forget the previous batch. Does not notify the reporter.
    pub fn reset(&self) {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Record `percent` for the file at `index` and report the merged map
    pub fn update(&self, index: usize, filename: &str, percent: u8) {
        let snapshot = {
            let mut progress = self.progress.lock().unwrap_or_else(PoisonError::into_inner);
            progress.insert(
                index,
                FileProgress {
                    filename: filename.to_string(),
                    percent: percent.min(100),
                },
            );
            progress.clone()
        };

        self.reporter.set_upload_progress(&snapshot);
    }
}

/// Reporter that discards progress, for callers without a progress display
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn set_upload_progress(&self, _progress: &ProgressMap) {}
}
