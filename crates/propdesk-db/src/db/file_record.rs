use async_trait::async_trait;
use chrono::{DateTime, Utc};
use propdesk_core::models::{FileMetadata, FileRecord, NewFileRecord};
use propdesk_core::AppError;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

/// Persistence for file metadata records
#[async_trait]
pub trait FileRecordStore: Send + Sync {
    /// Insert one record; the store assigns `id` and `created_at`.
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, AppError>;

    /// List records newest first. `folder_id`: `None` = all, `Some(None)` = root only.
    async fn list(
        &self,
        folder_id: Option<Option<Uuid>>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FileRecord>, AppError>;

    /// Delete a record; returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Raw `files` row; enum columns are stored as text.
#[derive(Debug, FromRow)]
struct FileRecordRow {
    id: Uuid,
    filename: String,
    original_filename: String,
    description: Option<String>,
    size: i64,
    mime_type: String,
    file_type: String,
    category: String,
    storage_path: String,
    folder_id: Option<Uuid>,
    metadata: Json<FileMetadata>,
    created_at: DateTime<Utc>,
}

impl TryFrom<FileRecordRow> for FileRecord {
    type Error = AppError;

    fn try_from(row: FileRecordRow) -> Result<Self, Self::Error> {
        Ok(FileRecord {
            id: row.id,
            filename: row.filename,
            original_filename: row.original_filename,
            description: row.description,
            size: row.size,
            mime_type: row.mime_type,
            file_type: row.file_type.parse()?,
            category: row.category.parse()?,
            storage_path: row.storage_path,
            folder_id: row.folder_id,
            metadata: row.metadata.0,
            created_at: row.created_at,
        })
    }
}

const FILE_COLUMNS: &str = "id, filename, original_filename, description, size, mime_type, \
     file_type, category, storage_path, folder_id, metadata, created_at";

/// Repository for file metadata records
#[derive(Clone)]
pub struct FileRecordRepository {
    pool: PgPool,
}

impl FileRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRecordStore for FileRecordRepository {
    #[tracing::instrument(
        skip(self, record),
        fields(db.table = "files", db.operation = "insert", storage_path = %record.storage_path)
    )]
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let query = format!(
            r#"
            INSERT INTO files (
                filename, original_filename, description, size, mime_type,
                file_type, category, storage_path, folder_id, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            FILE_COLUMNS
        );

        let row = sqlx::query_as::<Postgres, FileRecordRow>(&query)
            .bind(&record.filename)
            .bind(&record.original_filename)
            .bind(&record.description)
            .bind(record.size)
            .bind(&record.mime_type)
            .bind(record.file_type.as_str())
            .bind(record.category.as_str())
            .bind(&record.storage_path)
            .bind(record.folder_id)
            .bind(Json(&record.metadata))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    storage_path = %record.storage_path,
                    "Failed to insert file record"
                );
                AppError::Database(e)
            })?;

        row.try_into()
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let query = format!("SELECT {} FROM files WHERE id = $1", FILE_COLUMNS);
        let row = sqlx::query_as::<Postgres, FileRecordRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(FileRecord::try_from).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn list(
        &self,
        folder_id: Option<Option<Uuid>>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FileRecord>, AppError> {
        let rows = match folder_id {
            None => {
                let query = format!(
                    "SELECT {} FROM files ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                    FILE_COLUMNS
                );
                sqlx::query_as::<Postgres, FileRecordRow>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(None) => {
                let query = format!(
                    "SELECT {} FROM files WHERE folder_id IS NULL ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                    FILE_COLUMNS
                );
                sqlx::query_as::<Postgres, FileRecordRow>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(Some(fid)) => {
                let query = format!(
                    "SELECT {} FROM files WHERE folder_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                    FILE_COLUMNS
                );
                sqlx::query_as::<Postgres, FileRecordRow>(&query)
                    .bind(fid)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(FileRecord::try_from).collect()
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
