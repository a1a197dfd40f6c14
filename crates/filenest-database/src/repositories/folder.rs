//! Folder repository implementation.

use sqlx::PgPool;

use filenest_core::error::{AppError, ErrorKind};
use filenest_core::result::AppResult;
use filenest_core::types::{FolderId, ReadScope};
use filenest_entity::folder::{Folder, NewFolder};

use super::scope_predicate;

/// Repository for folder row CRUD and path queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID (any deletion state, purged excluded).
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1 AND NOT is_purged")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find a folder by exact materialized path, scoped by deletion state.
    pub async fn find_by_path(&self, path: &str, scope: ReadScope) -> AppResult<Option<Folder>> {
        let sql = format!(
            "SELECT * FROM folders WHERE full_path = $1 {} ORDER BY id ASC LIMIT 1",
            scope_predicate(scope)
        );
        sqlx::query_as::<_, Folder>(&sql)
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folder by path", e)
            })
    }

    /// List direct children of a folder, scoped by deletion state.
    pub async fn find_children(
        &self,
        parent_id: FolderId,
        scope: ReadScope,
    ) -> AppResult<Vec<Folder>> {
        let sql = format!(
            "SELECT * FROM folders WHERE parent_id = $1 {} ORDER BY name ASC",
            scope_predicate(scope)
        );
        sqlx::query_as::<_, Folder>(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// List every folder whose path starts with the given prefix, the
    /// prefix owner included, deleted rows included.
    pub async fn find_with_prefix(&self, prefix: &str) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE starts_with(full_path, $1) AND NOT is_purged \
             ORDER BY full_path ASC",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list folders by prefix", e)
        })
    }

    /// Insert a new folder row.
    pub async fn create(&self, data: &NewFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (parent_id, name, full_path) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(&data.full_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("folders_active_path_key") =>
            {
                AppError::folder_exists(format!("Folder path '{}' already exists", data.full_path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    /// Update a folder row in full.
    pub async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2, name = $3, full_path = $4, \
             is_deleted = $5, is_purged = $6, modified_at = $7 \
             WHERE id = $1 RETURNING *",
        )
        .bind(folder.id)
        .bind(folder.parent_id)
        .bind(&folder.name)
        .bind(&folder.full_path)
        .bind(folder.is_deleted)
        .bind(folder.is_purged)
        .bind(folder.modified_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update folder", e))?
        .ok_or_else(|| AppError::folder_not_found(format!("Folder {} not found", folder.id)))
    }

    /// Physically delete a folder row. Returns `true` if a row was removed.
    pub async fn remove(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
