//! File record and file version repository implementation.

use sqlx::PgPool;

use filenest_core::error::{AppError, ErrorKind};
use filenest_core::result::AppResult;
use filenest_core::types::{BlobId, FileId, FolderId, ReadScope, VersionId};
use filenest_entity::file::{FileRecord, FileVersion, NewFileRecord, NewFileVersion};

use super::scope_predicate;

/// Repository for file record and version CRUD.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file record by ID (any deletion state, purged excluded).
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = $1 AND NOT is_purged")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Find a file record by folder and name, scoped by deletion state.
    ///
    /// More than one structural match is a consistency fault: the
    /// uniqueness invariant on `(parent_id, name)` has been violated.
    pub async fn find_by_name(
        &self,
        parent_id: FolderId,
        name: &str,
        scope: ReadScope,
    ) -> AppResult<Option<FileRecord>> {
        let sql = format!(
            "SELECT * FROM files WHERE parent_id = $1 AND name = $2 {}",
            scope_predicate(scope)
        );
        let mut records = sqlx::query_as::<_, FileRecord>(&sql)
            .bind(parent_id)
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file by name", e)
            })?;

        if records.len() > 1 {
            return Err(AppError::general(format!(
                "Multiple file records named '{name}' under folder {parent_id}"
            )));
        }
        Ok(records.pop())
    }

    /// List direct child files of a folder, scoped by deletion state.
    pub async fn find_children(
        &self,
        parent_id: FolderId,
        scope: ReadScope,
    ) -> AppResult<Vec<FileRecord>> {
        let sql = format!(
            "SELECT * FROM files WHERE parent_id = $1 {} ORDER BY name ASC",
            scope_predicate(scope)
        );
        sqlx::query_as::<_, FileRecord>(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// Insert a new file record.
    pub async fn create(&self, data: &NewFileRecord) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "INSERT INTO files (parent_id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(data.parent_id)
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("files_active_name_key") =>
            {
                AppError::file_exists(format!("File '{}' already exists", data.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    /// Update a file record in full.
    pub async fn update(&self, file: &FileRecord) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET parent_id = $2, name = $3, is_deleted = $4, \
             is_purged = $5, modified_at = $6 \
             WHERE id = $1 RETURNING *",
        )
        .bind(file.id)
        .bind(file.parent_id)
        .bind(&file.name)
        .bind(file.is_deleted)
        .bind(file.is_purged)
        .bind(file.modified_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?
        .ok_or_else(|| AppError::file_not_found(format!("File {} not found", file.id)))
    }

    /// Physically delete a file record row. Returns `true` if removed.
    pub async fn remove(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove file", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Find the current, non-deleted version of a file.
    pub async fn current_version(&self, file_id: FileId) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 AND is_current AND NOT is_deleted",
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find current version", e)
        })
    }

    /// List all versions of a file, newest first.
    pub async fn find_versions(&self, file_id: FileId) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 ORDER BY version_number DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    /// Insert a new version row.
    pub async fn create_version(&self, data: &NewFileVersion) -> AppResult<FileVersion> {
        sqlx::query_as::<_, FileVersion>(
            "INSERT INTO file_versions (file_id, version_number, is_current, blob_id, size_bytes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.file_id)
        .bind(data.version_number)
        .bind(data.is_current)
        .bind(data.blob_id)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create version", e))
    }

    /// Flip the `is_current` flag on a version.
    pub async fn set_version_current(&self, id: VersionId, current: bool) -> AppResult<()> {
        sqlx::query("UPDATE file_versions SET is_current = $2 WHERE id = $1")
            .bind(id)
            .bind(current)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update version flag", e)
            })?;
        Ok(())
    }

    /// Physically delete all version rows of a file. Returns the count.
    pub async fn remove_versions(&self, file_id: FileId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM file_versions WHERE file_id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove versions", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Count the version rows still referencing a blob.
    pub async fn blob_reference_count(&self, blob_id: BlobId) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM file_versions WHERE blob_id = $1")
                .bind(blob_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count blob references", e)
                })?;
        Ok(count as u64)
    }
}
