use async_trait::async_trait;
use propdesk_core::{models::Folder, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Folder lookups needed by the upload flow
#[async_trait]
pub trait FolderStore: Send + Sync {
    /// Get a folder by ID; `Ok(None)` when no such folder exists.
    async fn get_folder(&self, id: Uuid) -> Result<Option<Folder>, AppError>;
}

/// Repository for managing folders
#[derive(Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new folder; its path is derived from the parent's path
    #[tracing::instrument(skip(self), fields(db.table = "folders", db.operation = "insert"))]
    pub async fn create_folder(
        &self,
        name: String,
        parent_id: Option<Uuid>,
    ) -> Result<Folder, AppError> {
        let parent = match parent_id {
            Some(pid) => Some(
                self.get_folder(pid)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Parent folder not found".to_string()))?,
            ),
            None => None,
        };

        let path = Folder::child_path(parent.as_ref(), &name);

        let duplicate_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM folders WHERE path = $1)",
        )
        .bind(&path)
        .fetch_one(&self.pool)
        .await?;

        if duplicate_exists {
            return Err(AppError::Conflict(format!(
                "A folder already exists at path '{}'",
                path
            )));
        }

        let folder = sqlx::query_as::<Postgres, Folder>(
            r#"
            INSERT INTO folders (name, path, parent_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, path, parent_id, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&path)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(folder_id = %folder.id, path = %folder.path, "Folder created");

        Ok(folder)
    }

    /// List folders, optionally filtered by parent
    #[tracing::instrument(skip(self), fields(db.table = "folders", db.operation = "select"))]
    pub async fn list_folders(
        &self,
        parent_id: Option<Option<Uuid>>, // Option<Option> to distinguish None from Some(None)
    ) -> Result<Vec<Folder>, AppError> {
        let folders = match parent_id {
            None => {
                sqlx::query_as::<Postgres, Folder>(
                    "SELECT id, name, path, parent_id, created_at, updated_at FROM folders ORDER BY path ASC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            Some(None) => {
                sqlx::query_as::<Postgres, Folder>(
                    "SELECT id, name, path, parent_id, created_at, updated_at FROM folders WHERE parent_id IS NULL ORDER BY path ASC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            Some(Some(pid)) => {
                sqlx::query_as::<Postgres, Folder>(
                    "SELECT id, name, path, parent_id, created_at, updated_at FROM folders WHERE parent_id = $1 ORDER BY path ASC",
                )
                .bind(pid)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(folders)
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    #[tracing::instrument(skip(self), fields(db.table = "folders", db.operation = "select", db.record_id = %id))]
    async fn get_folder(&self, id: Uuid) -> Result<Option<Folder>, AppError> {
        let folder = sqlx::query_as::<Postgres, Folder>(
            "SELECT id, name, path, parent_id, created_at, updated_at FROM folders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(folder)
    }
}
