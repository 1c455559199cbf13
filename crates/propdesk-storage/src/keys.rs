//! Shared storage path validation for storage backends.

use crate::traits::{StorageError, StorageResult};

/// Reject paths that could escape the bucket or storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.trim().is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.starts_with('/')
        || storage_key.contains('\\')
        || storage_key.split('/').any(|component| component == "..")
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_paths() {
        assert!(validate_key("root/1718000000000_photo.jpg").is_ok());
        assert!(validate_key("properties/harbour-view/1_lease.pdf").is_ok());
    }

    #[test]
    fn double_dots_only_rejected_as_a_whole_component() {
        assert!(validate_key("root/1718000000000_lease..final.pdf").is_ok());
        assert!(validate_key("root/..").is_err());
        assert!(validate_key("root/../secrets").is_err());
    }

    #[test]
    fn rejects_traversal_and_absolute_paths() {
        assert!(matches!(validate_key("../etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key("/etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
    }
}
