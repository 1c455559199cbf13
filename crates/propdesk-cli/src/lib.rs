use anyhow::Context;
use propdesk_core::models::{FileCategory, FileRecord, SelectedFile};
use propdesk_core::validation::guess_content_type;
use propdesk_storage::Storage;
use propdesk_upload::Notifier;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Prints upload notifications to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("ok    {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("error {}", message);
    }
}

/// Read a file from disk into a selection entry; the MIME type comes from the extension.
pub async fn read_selected_file(path: &Path) -> anyhow::Result<SelectedFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?
        .to_string();

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mime_type = guess_content_type(&name);
    Ok(SelectedFile::new(name, mime_type, bytes))
}

/// clap value parser accepting only categories a user may request
pub fn parse_category(value: &str) -> Result<FileCategory, String> {
    let category: FileCategory = value.parse().map_err(|e: anyhow::Error| e.to_string())?;
    if !category.is_requestable() {
        let allowed: Vec<&str> = FileCategory::REQUESTABLE
            .iter()
            .map(FileCategory::as_str)
            .collect();
        return Err(format!(
            "Category '{}' cannot be requested; use one of: {}",
            value,
            allowed.join(", ")
        ));
    }
    Ok(category)
}

/// Uploaded record as printed by the CLI, with the URL the blob is served from
#[derive(Debug, Serialize)]
pub struct UploadedFile<'a> {
    #[serde(flatten)]
    pub record: &'a FileRecord,
    pub url: String,
}

pub fn with_public_urls<'a>(
    records: impl IntoIterator<Item = &'a FileRecord>,
    storage: &dyn Storage,
) -> Vec<UploadedFile<'a>> {
    records
        .into_iter()
        .map(|record| UploadedFile {
            url: storage.public_url(&record.storage_path),
            record,
        })
        .collect()
}

/// Delete the blob at `storage_path`. Returns `false` when it was already gone.
pub async fn delete_blob(storage: &dyn Storage, storage_path: &str) -> anyhow::Result<bool> {
    let existed = storage
        .exists(storage_path)
        .await
        .with_context(|| format!("Failed to check blob {}", storage_path))?;
    if existed {
        storage
            .delete(storage_path)
            .await
            .with_context(|| format!("Failed to delete blob {}", storage_path))?;
    }
    Ok(existed)
}

/// Copy the blob at `storage_path` to `output`, returning the number of bytes written
pub async fn download_blob(
    storage: &dyn Storage,
    storage_path: &str,
    output: &Path,
) -> anyhow::Result<usize> {
    let bytes = storage
        .download(storage_path)
        .await
        .with_context(|| format!("Failed to download blob {}", storage_path))?;
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(bytes.len())
}

/// Folder filter for listings: `--root` wins over `--folder`, neither means all.
pub fn folder_filter(folder: Option<Uuid>, root_only: bool) -> Option<Option<Uuid>> {
    if root_only {
        Some(None)
    } else {
        folder.map(Some)
    }
}
