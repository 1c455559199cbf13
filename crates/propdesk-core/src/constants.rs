//! Constants shared across crates

/// Path prefix used for files uploaded without a target folder
pub const ROOT_FOLDER_PATH: &str = "root";

/// Default `Cache-Control` max-age (seconds) attached to uploaded blobs
pub const DEFAULT_CACHE_CONTROL: &str = "3600";

/// Notification shown when the upload trigger fires with nothing selected
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select files to upload";
