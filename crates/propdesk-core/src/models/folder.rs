use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Folder used to group uploaded files under a common storage path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    /// Storage path prefix, e.g. `properties/harbour-view`
    pub path: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Path for a child folder named `name` below `parent`, or a top-level path.
    pub fn child_path(parent: Option<&Folder>, name: &str) -> String {
        match parent {
            Some(parent) => format!("{}/{}", parent.path.trim_end_matches('/'), name),
            None => name.to_string(),
        }
    }
}

/// Request DTO for creating a new folder
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFolderRequest {
    #[validate(
        length(
            min = 1,
            max = 255,
            message = "Folder name must be between 1 and 255 characters"
        ),
        custom(function = "crate::validation::validate_folder_name")
    )]
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(path: &str) -> Folder {
        let now = Utc::now();
        Folder {
            id: Uuid::new_v4(),
            name: "x".to_string(),
            path: path.to_string(),
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn child_path_joins_parent() {
        let parent = folder("properties/");
        assert_eq!(
            Folder::child_path(Some(&parent), "harbour-view"),
            "properties/harbour-view"
        );
        assert_eq!(Folder::child_path(None, "jobs"), "jobs");
    }

    #[test]
    fn create_request_rejects_empty_and_slashes() {
        let empty = CreateFolderRequest {
            name: String::new(),
            parent_id: None,
        };
        assert!(empty.validate().is_err());

        let nested = CreateFolderRequest {
            name: "a/b".to_string(),
            parent_id: None,
        };
        assert!(nested.validate().is_err());

        let ok = CreateFolderRequest {
            name: "invoices".to_string(),
            parent_id: None,
        };
        assert!(ok.validate().is_ok());
    }
}
