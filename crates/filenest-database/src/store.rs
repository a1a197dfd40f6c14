//! The metadata-store capability trait and its PostgreSQL implementation.
//!
//! The namespace manager owns all business invariants but performs no
//! persistence itself: it is handed a [`MetadataStore`] and issues point
//! lookups, scoped listings, inserts, and row updates through it. The
//! store owns rows, not rules.

use async_trait::async_trait;
use sqlx::PgPool;

use filenest_core::result::AppResult;
use filenest_core::types::{BlobId, FileId, FolderId, ReadScope, VersionId};
use filenest_entity::file::{FileRecord, FileVersion, NewFileRecord, NewFileVersion};
use filenest_entity::folder::{Folder, NewFolder};

use crate::repositories::{FileRepository, FolderRepository};

/// Persistence boundary for folder, file, and version rows.
#[async_trait]
pub trait MetadataStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by ID. Purged rows are never returned.
    async fn folder_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find a folder by exact materialized path, scoped by deletion state.
    async fn folder_by_path(&self, path: &str, scope: ReadScope) -> AppResult<Option<Folder>>;

    /// List direct child folders, scoped by deletion state.
    async fn child_folders(&self, parent: FolderId, scope: ReadScope) -> AppResult<Vec<Folder>>;

    /// List every folder whose path starts with the given prefix,
    /// the prefix owner included, deleted rows included.
    async fn folders_with_prefix(&self, prefix: &str) -> AppResult<Vec<Folder>>;

    /// Insert a new folder row with creation timestamps.
    async fn insert_folder(&self, data: &NewFolder) -> AppResult<Folder>;

    /// Update a folder row in full.
    async fn update_folder(&self, folder: &Folder) -> AppResult<Folder>;

    /// Physically delete a folder row. Returns `true` if a row was removed.
    async fn remove_folder(&self, id: FolderId) -> AppResult<bool>;

    /// Find a file record by ID. Purged rows are never returned.
    async fn file_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>>;

    /// Find a file record by folder and name, scoped by deletion state.
    /// More than one match is a consistency fault.
    async fn file_by_name(
        &self,
        parent: FolderId,
        name: &str,
        scope: ReadScope,
    ) -> AppResult<Option<FileRecord>>;

    /// List direct child files, scoped by deletion state.
    async fn child_files(&self, parent: FolderId, scope: ReadScope) -> AppResult<Vec<FileRecord>>;

    /// Insert a new file record with creation timestamps.
    async fn insert_file(&self, data: &NewFileRecord) -> AppResult<FileRecord>;

    /// Update a file record in full.
    async fn update_file(&self, file: &FileRecord) -> AppResult<FileRecord>;

    /// Physically delete a file record row. Returns `true` if removed.
    async fn remove_file(&self, id: FileId) -> AppResult<bool>;

    /// Find the current, non-deleted version of a file.
    async fn current_version(&self, file: FileId) -> AppResult<Option<FileVersion>>;

    /// List all versions of a file, newest first.
    async fn versions_of(&self, file: FileId) -> AppResult<Vec<FileVersion>>;

    /// Insert a new version row.
    async fn insert_version(&self, data: &NewFileVersion) -> AppResult<FileVersion>;

    /// Flip the `is_current` flag on a version.
    async fn set_version_current(&self, id: VersionId, current: bool) -> AppResult<()>;

    /// Physically delete all version rows of a file. Returns the count.
    async fn remove_versions(&self, file: FileId) -> AppResult<u64>;

    /// Count the version rows still referencing a blob.
    async fn blob_reference_count(&self, blob: BlobId) -> AppResult<u64>;
}

/// PostgreSQL-backed metadata store composed from the per-entity
/// repositories.
#[derive(Debug, Clone)]
pub struct PgMetadataStore {
    folders: FolderRepository,
    files: FileRepository,
}

impl PgMetadataStore {
    /// Create a new store over an open connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            folders: FolderRepository::new(pool.clone()),
            files: FileRepository::new(pool),
        }
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn folder_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.folders.find_by_id(id).await
    }

    async fn folder_by_path(&self, path: &str, scope: ReadScope) -> AppResult<Option<Folder>> {
        self.folders.find_by_path(path, scope).await
    }

    async fn child_folders(&self, parent: FolderId, scope: ReadScope) -> AppResult<Vec<Folder>> {
        self.folders.find_children(parent, scope).await
    }

    async fn folders_with_prefix(&self, prefix: &str) -> AppResult<Vec<Folder>> {
        self.folders.find_with_prefix(prefix).await
    }

    async fn insert_folder(&self, data: &NewFolder) -> AppResult<Folder> {
        self.folders.create(data).await
    }

    async fn update_folder(&self, folder: &Folder) -> AppResult<Folder> {
        self.folders.update(folder).await
    }

    async fn remove_folder(&self, id: FolderId) -> AppResult<bool> {
        self.folders.remove(id).await
    }

    async fn file_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        self.files.find_by_id(id).await
    }

    async fn file_by_name(
        &self,
        parent: FolderId,
        name: &str,
        scope: ReadScope,
    ) -> AppResult<Option<FileRecord>> {
        self.files.find_by_name(parent, name, scope).await
    }

    async fn child_files(&self, parent: FolderId, scope: ReadScope) -> AppResult<Vec<FileRecord>> {
        self.files.find_children(parent, scope).await
    }

    async fn insert_file(&self, data: &NewFileRecord) -> AppResult<FileRecord> {
        self.files.create(data).await
    }

    async fn update_file(&self, file: &FileRecord) -> AppResult<FileRecord> {
        self.files.update(file).await
    }

    async fn remove_file(&self, id: FileId) -> AppResult<bool> {
        self.files.remove(id).await
    }

    async fn current_version(&self, file: FileId) -> AppResult<Option<FileVersion>> {
        self.files.current_version(file).await
    }

    async fn versions_of(&self, file: FileId) -> AppResult<Vec<FileVersion>> {
        self.files.find_versions(file).await
    }

    async fn insert_version(&self, data: &NewFileVersion) -> AppResult<FileVersion> {
        self.files.create_version(data).await
    }

    async fn set_version_current(&self, id: VersionId, current: bool) -> AppResult<()> {
        self.files.set_version_current(id, current).await
    }

    async fn remove_versions(&self, file: FileId) -> AppResult<u64> {
        self.files.remove_versions(file).await
    }

    async fn blob_reference_count(&self, blob: BlobId) -> AppResult<u64> {
        self.files.blob_reference_count(blob).await
    }
}
