//! In-memory metadata store.
//!
//! Implements [`MetadataStore`] over plain maps behind a mutex. Used by the
//! manager test suites and by embedded callers that do not want a database;
//! it enforces the same uniqueness constraints the PostgreSQL schema does
//! so that both implementations fail identically.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use filenest_core::error::AppError;
use filenest_core::result::AppResult;
use filenest_core::types::{BlobId, FileId, FolderId, ReadScope, VersionId};
use filenest_entity::file::{FileRecord, FileVersion, NewFileRecord, NewFileVersion};
use filenest_entity::folder::{Folder, NewFolder};

use crate::store::MetadataStore;

#[derive(Debug, Default)]
struct Inner {
    folders: BTreeMap<i64, Folder>,
    files: BTreeMap<i64, FileRecord>,
    versions: BTreeMap<i64, FileVersion>,
    next_folder_id: i64,
    next_file_id: i64,
    next_version_id: i64,
}

/// Metadata store keeping all rows in process memory.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    inner: Mutex<Inner>,
}

impl MemoryMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens if a holder panicked; propagating the
        // inner state is still safe for these plain maps.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn visible(scope: ReadScope, is_deleted: bool, is_purged: bool) -> bool {
    !is_purged && scope.matches(is_deleted)
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn folder_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        let inner = self.lock();
        Ok(inner
            .folders
            .get(&id.as_i64())
            .filter(|f| !f.is_purged)
            .cloned())
    }

    async fn folder_by_path(&self, path: &str, scope: ReadScope) -> AppResult<Option<Folder>> {
        let inner = self.lock();
        Ok(inner
            .folders
            .values()
            .filter(|f| visible(scope, f.is_deleted, f.is_purged))
            .find(|f| f.full_path == path)
            .cloned())
    }

    async fn child_folders(&self, parent: FolderId, scope: ReadScope) -> AppResult<Vec<Folder>> {
        let inner = self.lock();
        let mut children: Vec<Folder> = inner
            .folders
            .values()
            .filter(|f| f.parent_id == Some(parent) && visible(scope, f.is_deleted, f.is_purged))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn folders_with_prefix(&self, prefix: &str) -> AppResult<Vec<Folder>> {
        let inner = self.lock();
        let mut folders: Vec<Folder> = inner
            .folders
            .values()
            .filter(|f| !f.is_purged && f.full_path.starts_with(prefix))
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        Ok(folders)
    }

    async fn insert_folder(&self, data: &NewFolder) -> AppResult<Folder> {
        let mut inner = self.lock();
        let conflict = inner
            .folders
            .values()
            .any(|f| !f.is_deleted && !f.is_purged && f.full_path == data.full_path);
        if conflict {
            return Err(AppError::folder_exists(format!(
                "Folder path '{}' already exists",
                data.full_path
            )));
        }

        inner.next_folder_id += 1;
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::from_i64(inner.next_folder_id),
            parent_id: data.parent_id,
            name: data.name.clone(),
            full_path: data.full_path.clone(),
            is_deleted: false,
            is_purged: false,
            created_at: now,
            modified_at: now,
        };
        inner.folders.insert(folder.id.as_i64(), folder.clone());
        Ok(folder)
    }

    async fn update_folder(&self, folder: &Folder) -> AppResult<Folder> {
        let mut inner = self.lock();
        let slot = inner
            .folders
            .get_mut(&folder.id.as_i64())
            .ok_or_else(|| AppError::folder_not_found(format!("Folder {} not found", folder.id)))?;
        *slot = folder.clone();
        Ok(folder.clone())
    }

    async fn remove_folder(&self, id: FolderId) -> AppResult<bool> {
        let mut inner = self.lock();
        Ok(inner.folders.remove(&id.as_i64()).is_some())
    }

    async fn file_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        let inner = self.lock();
        Ok(inner
            .files
            .get(&id.as_i64())
            .filter(|f| !f.is_purged)
            .cloned())
    }

    async fn file_by_name(
        &self,
        parent: FolderId,
        name: &str,
        scope: ReadScope,
    ) -> AppResult<Option<FileRecord>> {
        let inner = self.lock();
        let mut matches: Vec<FileRecord> = inner
            .files
            .values()
            .filter(|f| {
                f.parent_id == parent
                    && f.name == name
                    && visible(scope, f.is_deleted, f.is_purged)
            })
            .cloned()
            .collect();

        if matches.len() > 1 {
            return Err(AppError::general(format!(
                "Multiple file records named '{name}' under folder {parent}"
            )));
        }
        Ok(matches.pop())
    }

    async fn child_files(&self, parent: FolderId, scope: ReadScope) -> AppResult<Vec<FileRecord>> {
        let inner = self.lock();
        let mut files: Vec<FileRecord> = inner
            .files
            .values()
            .filter(|f| f.parent_id == parent && visible(scope, f.is_deleted, f.is_purged))
            .cloned()
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn insert_file(&self, data: &NewFileRecord) -> AppResult<FileRecord> {
        let mut inner = self.lock();
        let conflict = inner.files.values().any(|f| {
            !f.is_deleted && !f.is_purged && f.parent_id == data.parent_id && f.name == data.name
        });
        if conflict {
            return Err(AppError::file_exists(format!(
                "File '{}' already exists",
                data.name
            )));
        }

        inner.next_file_id += 1;
        let now = Utc::now();
        let file = FileRecord {
            id: FileId::from_i64(inner.next_file_id),
            parent_id: data.parent_id,
            name: data.name.clone(),
            is_deleted: false,
            is_purged: false,
            created_at: now,
            modified_at: now,
        };
        inner.files.insert(file.id.as_i64(), file.clone());
        Ok(file)
    }

    async fn update_file(&self, file: &FileRecord) -> AppResult<FileRecord> {
        let mut inner = self.lock();
        let slot = inner
            .files
            .get_mut(&file.id.as_i64())
            .ok_or_else(|| AppError::file_not_found(format!("File {} not found", file.id)))?;
        *slot = file.clone();
        Ok(file.clone())
    }

    async fn remove_file(&self, id: FileId) -> AppResult<bool> {
        let mut inner = self.lock();
        Ok(inner.files.remove(&id.as_i64()).is_some())
    }

    async fn current_version(&self, file: FileId) -> AppResult<Option<FileVersion>> {
        let inner = self.lock();
        Ok(inner
            .versions
            .values()
            .find(|v| v.file_id == file && v.is_current && !v.is_deleted)
            .cloned())
    }

    async fn versions_of(&self, file: FileId) -> AppResult<Vec<FileVersion>> {
        let inner = self.lock();
        let mut versions: Vec<FileVersion> = inner
            .versions
            .values()
            .filter(|v| v.file_id == file)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions)
    }

    async fn insert_version(&self, data: &NewFileVersion) -> AppResult<FileVersion> {
        let mut inner = self.lock();
        inner.next_version_id += 1;
        let version = FileVersion {
            id: VersionId::from_i64(inner.next_version_id),
            file_id: data.file_id,
            version_number: data.version_number,
            is_current: data.is_current,
            blob_id: data.blob_id,
            size_bytes: data.size_bytes,
            is_deleted: false,
            created_at: Utc::now(),
        };
        inner.versions.insert(version.id.as_i64(), version.clone());
        Ok(version)
    }

    async fn set_version_current(&self, id: VersionId, current: bool) -> AppResult<()> {
        let mut inner = self.lock();
        let version = inner
            .versions
            .get_mut(&id.as_i64())
            .ok_or_else(|| AppError::general(format!("Version {id} not found")))?;
        version.is_current = current;
        Ok(())
    }

    async fn remove_versions(&self, file: FileId) -> AppResult<u64> {
        let mut inner = self.lock();
        let before = inner.versions.len();
        inner.versions.retain(|_, v| v.file_id != file);
        Ok((before - inner.versions.len()) as u64)
    }

    async fn blob_reference_count(&self, blob: BlobId) -> AppResult<u64> {
        let inner = self.lock();
        Ok(inner.versions.values().filter(|v| v.blob_id == blob).count() as u64)
    }
}
