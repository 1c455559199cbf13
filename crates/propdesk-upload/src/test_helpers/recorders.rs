//! Recording notifier and progress reporter

use crate::notifier::Notifier;
use crate::progress::{ProgressMap, ProgressReporter};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Notifier that keeps every message in order
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Success(message) => Some(message),
                Notification::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Error(message) => Some(message),
                Notification::Success(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Error(message.to_string()));
    }
}

/// Progress reporter that keeps every snapshot
#[derive(Default)]
pub struct RecordingProgress {
    snapshots: Mutex<Vec<ProgressMap>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<ProgressMap> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<ProgressMap> {
        self.snapshots.lock().unwrap().last().cloned()
    }
}

impl ProgressReporter for RecordingProgress {
    fn set_upload_progress(&self, progress: &ProgressMap) {
        self.snapshots.lock().unwrap().push(progress.clone());
    }
}
