//! Filename and folder name checks
//!
//! Uploaded names end up verbatim in storage paths (`<folder>/<timestamp>_<name>`),
//! so anything that would change the directory structure is rejected.

use validator::ValidationError;

const MAX_FILENAME_LENGTH: usize = 255;

/// Validate a user-selected filename before it is used in a storage path.
pub fn validate_filename(filename: &str) -> Result<(), String> {
    if filename.trim().is_empty() {
        return Err("Filename must not be empty".to_string());
    }
    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(format!(
            "Filename exceeds maximum length of {} bytes",
            MAX_FILENAME_LENGTH
        ));
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err("Filename must not contain path separators".to_string());
    }
    if filename == "." || filename == ".." {
        return Err("Filename contains invalid path traversal".to_string());
    }
    Ok(())
}

/// `validator` hook for folder names: a folder name is one path segment.
pub fn validate_folder_name(name: &str) -> Result<(), ValidationError> {
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        let mut err = ValidationError::new("folder_name");
        err.message = Some("Folder name must be a single path segment".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_rejects_path_traversal() {
        assert!(validate_filename("../etc/passwd").is_err());
        assert!(validate_filename("a/b.txt").is_err());
        assert!(validate_filename("a\\b.txt").is_err());
        assert!(validate_filename("..").is_err());
    }

    #[test]
    fn filename_accepts_valid_names() {
        assert!(validate_filename("lease agreement (signed).pdf").is_ok());
        assert!(validate_filename("IMG_0042.JPG").is_ok());
    }

    #[test]
    fn filename_allows_double_dots_inside_a_name() {
        assert!(validate_filename("lease..final.pdf").is_ok());
        assert!(validate_filename("..hidden").is_ok());
        assert!(validate_filename("notes..").is_ok());
        assert!(validate_filename(".").is_err());
        assert!(validate_filename("..").is_err());
    }

    #[test]
    fn filename_rejects_blank_and_long_names() {
        assert!(validate_filename("  ").is_err());
        assert!(validate_filename(&"a".repeat(256)).is_err());
    }

    #[test]
    fn folder_name_is_single_segment() {
        assert!(validate_folder_name("invoices").is_ok());
        assert!(validate_folder_name("a/b").is_err());
        assert!(validate_folder_name("..").is_err());
        assert!(validate_folder_name(".").is_err());
        assert!(validate_folder_name("2024..2025").is_ok());
    }
}
