//! Propdesk CLI: bulk upload files into the portal's blob store and manage
//! file records and folders.
//!
//! Configuration comes from the environment (or `.env`): DATABASE_URL,
//! STORAGE_BACKEND and the backend's settings.

use anyhow::Context;
use clap::{Parser, Subcommand};
use propdesk_cli::{
    delete_blob, download_blob, folder_filter, init_tracing, parse_category, read_selected_file,
    with_public_urls, ConsoleNotifier,
};
use propdesk_core::models::{CreateFolderRequest, FileCategory};
use propdesk_core::Config;
use propdesk_db::{FileRecordRepository, FileRecordStore, FolderRepository};
use propdesk_storage::create_storage;
use propdesk_upload::{
    FileUploader, NoopProgress, UploadAttempt, UploadOrchestrator, UploadRequest, UploadSettings,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Parser)]
#[command(name = "propdesk", about = "Propdesk file upload CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more files as a single batch
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,
        /// Target folder UUID (defaults to root)
        #[arg(long)]
        folder: Option<Uuid>,
        /// Description stored on every file
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        /// Category for every file; derived from the MIME type when omitted
        #[arg(long, value_parser = parse_category)]
        category: Option<FileCategory>,
    },
    /// List file records, newest first
    List {
        /// Only files in this folder
        #[arg(long)]
        folder: Option<Uuid>,
        /// Only files without a folder
        #[arg(long)]
        root: bool,
        /// Maximum number of items
        #[arg(long, default_value = "20")]
        limit: i64,
        /// Offset for pagination
        #[arg(long, default_value = "0")]
        offset: i64,
    },
    /// Delete a file record and its blob
    Delete {
        /// File record UUID
        id: Uuid,
    },
    /// Download a file's blob to a local path
    Download {
        /// File record UUID
        id: Uuid,
        /// Where to write the file; defaults to the original file name
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
    /// Folder operations
    Folders {
        #[command(subcommand)]
        sub: FolderCommands,
    },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// List folders
    List {
        /// Only children of this folder
        #[arg(long)]
        parent: Option<Uuid>,
    },
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder UUID
        #[arg(long)]
        parent: Option<Uuid>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = propdesk_db::connect(&config)
        .await
        .context("Failed to connect to database")?;

    let folders = Arc::new(FolderRepository::new(pool.clone()));
    let records = Arc::new(FileRecordRepository::new(pool));

    match cli.command {
        Commands::Upload {
            files,
            folder,
            description,
            tags,
            category,
        } => {
            let storage = create_storage(&config)
                .await
                .context("Failed to initialize storage")?;

            let mut selection = Vec::with_capacity(files.len());
            for path in &files {
                selection.push(read_selected_file(path).await?);
            }

            let orchestrator = UploadOrchestrator::new(
                storage.clone(),
                folders,
                records,
                Arc::new(ConsoleNotifier),
                Arc::new(NoopProgress),
                UploadSettings::from_config(&config),
            );
            tracing::info!(
                file_count = selection.len(),
                folder_id = ?folder,
                "Starting upload batch"
            );
            let uploader = FileUploader::new(orchestrator);
            uploader.select_files(selection);

            let request = UploadRequest {
                folder_id: folder,
                description,
                tags,
                category,
            };

            match uploader.upload_files(&request).await {
                UploadAttempt::Completed(report) => {
                    print_json(&with_public_urls(report.uploaded(), storage.as_ref()))?;
                    if !report.is_complete_success() {
                        anyhow::bail!(
                            "{} of {} files failed to upload",
                            report.failed_count(),
                            report.outcomes.len()
                        );
                    }
                }
                UploadAttempt::Aborted(e) => return Err(e.into()),
                UploadAttempt::NothingSelected | UploadAttempt::AlreadyUploading => {
                    anyhow::bail!("Nothing was uploaded")
                }
            }
        }
        Commands::List {
            folder,
            root,
            limit,
            offset,
        } => {
            let listed = records
                .list(folder_filter(folder, root), limit, offset)
                .await?;
            print_json(&listed)?;
        }
        Commands::Delete { id } => {
            let record = records
                .get(id)
                .await?
                .with_context(|| format!("File record {} not found", id))?;

            let storage = create_storage(&config)
                .await
                .context("Failed to initialize storage")?;
            if !delete_blob(storage.as_ref(), &record.storage_path).await? {
                tracing::warn!(
                    path = %record.storage_path,
                    "Blob already missing; deleting record only"
                );
            }
            records.delete(id).await?;

            print_json(&serde_json::json!({
                "success": true,
                "message": format!("File {} deleted", id),
            }))?;
        }
        Commands::Download { id, output } => {
            let record = records
                .get(id)
                .await?
                .with_context(|| format!("File record {} not found", id))?;

            let storage = create_storage(&config)
                .await
                .context("Failed to initialize storage")?;
            let output = output.unwrap_or_else(|| record.original_filename.clone().into());
            let written = download_blob(storage.as_ref(), &record.storage_path, &output).await?;

            print_json(&serde_json::json!({
                "success": true,
                "path": output.display().to_string(),
                "size": written,
            }))?;
        }
        Commands::Folders { sub } => match sub {
            FolderCommands::List { parent } => {
                let listed = folders.list_folders(parent.map(Some)).await?;
                print_json(&listed)?;
            }
            FolderCommands::Create { name, parent } => {
                let request = CreateFolderRequest {
                    name,
                    parent_id: parent,
                };
                request.validate().context("Invalid folder")?;
                let folder = folders
                    .create_folder(request.name, request.parent_id)
                    .await?;
                print_json(&folder)?;
            }
        },
    }

    Ok(())
}
