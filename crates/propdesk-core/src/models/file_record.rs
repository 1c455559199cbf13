use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// Coarse file classification derived from the MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Document,
    Image,
    Pdf,
    Other,
}

/// MIME fragments that mark office-style documents
const DOCUMENT_MIME_MARKERS: &[&str] = &[
    "document",
    "spreadsheet",
    "presentation",
    "msword",
    "ms-excel",
    "ms-powerpoint",
];

impl FileType {
    /// Classify a MIME type. Parameters (`; charset=...`) and case are ignored.
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type
            .split(';')
            .next()
            .unwrap_or(mime_type)
            .trim()
            .to_ascii_lowercase();

        if mime.starts_with("image/") {
            FileType::Image
        } else if mime == "application/pdf" {
            FileType::Pdf
        } else if DOCUMENT_MIME_MARKERS.iter().any(|m| mime.contains(m)) {
            FileType::Document
        } else {
            FileType::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Document => "document",
            FileType::Image => "image",
            FileType::Pdf => "pdf",
            FileType::Other => "other",
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(FileType::Document),
            "image" => Ok(FileType::Image),
            "pdf" => Ok(FileType::Pdf),
            "other" => Ok(FileType::Other),
            _ => Err(anyhow::anyhow!("Invalid file type: {}", s)),
        }
    }
}

/// Business category of an uploaded file.
///
/// The first eight variants are the categories a user can request. `Image` and
/// `Pdf` only appear when no category was requested and the value falls back to
/// the MIME-derived [`FileType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    PropertyPhoto,
    JobPhoto,
    BeforePhoto,
    AfterPhoto,
    Document,
    Invoice,
    Contract,
    Other,
    Image,
    Pdf,
}

impl FileCategory {
    /// Categories a caller may explicitly request
    pub const REQUESTABLE: [FileCategory; 8] = [
        FileCategory::PropertyPhoto,
        FileCategory::JobPhoto,
        FileCategory::BeforePhoto,
        FileCategory::AfterPhoto,
        FileCategory::Document,
        FileCategory::Invoice,
        FileCategory::Contract,
        FileCategory::Other,
    ];

    /// Requested category if any, otherwise the MIME-derived one.
    pub fn resolve(requested: Option<FileCategory>, file_type: FileType) -> Self {
        requested.unwrap_or_else(|| file_type.into())
    }

    pub fn is_requestable(&self) -> bool {
        Self::REQUESTABLE.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::PropertyPhoto => "property_photo",
            FileCategory::JobPhoto => "job_photo",
            FileCategory::BeforePhoto => "before_photo",
            FileCategory::AfterPhoto => "after_photo",
            FileCategory::Document => "document",
            FileCategory::Invoice => "invoice",
            FileCategory::Contract => "contract",
            FileCategory::Other => "other",
            FileCategory::Image => "image",
            FileCategory::Pdf => "pdf",
        }
    }
}

impl From<FileType> for FileCategory {
    fn from(file_type: FileType) -> Self {
        match file_type {
            FileType::Document => FileCategory::Document,
            FileType::Image => FileCategory::Image,
            FileType::Pdf => FileCategory::Pdf,
            FileType::Other => FileCategory::Other,
        }
    }
}

impl Display for FileCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "property_photo" => Ok(FileCategory::PropertyPhoto),
            "job_photo" => Ok(FileCategory::JobPhoto),
            "before_photo" => Ok(FileCategory::BeforePhoto),
            "after_photo" => Ok(FileCategory::AfterPhoto),
            "document" => Ok(FileCategory::Document),
            "invoice" => Ok(FileCategory::Invoice),
            "contract" => Ok(FileCategory::Contract),
            "other" => Ok(FileCategory::Other),
            "image" => Ok(FileCategory::Image),
            "pdf" => Ok(FileCategory::Pdf),
            _ => Err(anyhow::anyhow!("Invalid file category: {}", s)),
        }
    }
}

/// Free-form metadata stored alongside a file record (JSONB `metadata` column)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Persisted metadata row describing one uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    /// Stored object name, `<timestamp>_<original_filename>`
    pub filename: String,
    pub original_filename: String,
    pub description: Option<String>,
    pub size: i64,
    pub mime_type: String,
    pub file_type: FileType,
    pub category: FileCategory,
    pub storage_path: String,
    pub folder_id: Option<Uuid>,
    pub metadata: FileMetadata,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a file record; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFileRecord {
    pub filename: String,
    pub original_filename: String,
    pub description: Option<String>,
    pub size: i64,
    pub mime_type: String,
    pub file_type: FileType,
    pub category: FileCategory,
    pub storage_path: String,
    pub folder_id: Option<Uuid>,
    pub metadata: FileMetadata,
}

impl NewFileRecord {
    /// Materialize the record with a store-assigned id and timestamp.
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id,
            filename: self.filename,
            original_filename: self.original_filename,
            description: self.description,
            size: self.size,
            mime_type: self.mime_type,
            file_type: self.file_type,
            category: self.category,
            storage_path: self.storage_path,
            folder_id: self.folder_id,
            metadata: self.metadata,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_from_mime() {
        assert_eq!(FileType::from_mime("image/png"), FileType::Image);
        assert_eq!(FileType::from_mime("IMAGE/JPEG"), FileType::Image);
        assert_eq!(FileType::from_mime("application/pdf"), FileType::Pdf);
        assert_eq!(FileType::from_mime("application/msword"), FileType::Document);
        assert_eq!(
            FileType::from_mime(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            FileType::Document
        );
        assert_eq!(
            FileType::from_mime("application/vnd.oasis.opendocument.text"),
            FileType::Document
        );
        assert_eq!(FileType::from_mime("text/plain"), FileType::Other);
        assert_eq!(FileType::from_mime(""), FileType::Other);
    }

    #[test]
    fn mime_parameters_are_ignored() {
        assert_eq!(
            FileType::from_mime("application/pdf; charset=binary"),
            FileType::Pdf
        );
    }

    #[test]
    fn requested_category_wins() {
        assert_eq!(
            FileCategory::resolve(Some(FileCategory::Invoice), FileType::Image),
            FileCategory::Invoice
        );
        assert_eq!(
            FileCategory::resolve(None, FileType::Image),
            FileCategory::Image
        );
        assert_eq!(FileCategory::resolve(None, FileType::Pdf), FileCategory::Pdf);
        assert_eq!(
            FileCategory::resolve(None, FileType::Other),
            FileCategory::Other
        );
    }

    #[test]
    fn category_parsing() {
        assert_eq!(
            "before_photo".parse::<FileCategory>().unwrap(),
            FileCategory::BeforePhoto
        );
        assert!("BeforePhoto".parse::<FileCategory>().is_err());
        assert!(!FileCategory::Image.is_requestable());
        assert!(FileCategory::JobPhoto.is_requestable());
    }

    #[test]
    fn metadata_serializes_tags() {
        let metadata = FileMetadata {
            tags: vec!["roof".to_string(), "leak".to_string()],
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json, serde_json::json!({ "tags": ["roof", "leak"] }));

        let parsed: FileMetadata = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.tags.is_empty());
    }
}
