//! The namespace manager: resolution, listing, and shared state checks.
//!
//! Folder lifecycle lives in [`folders`](self::folders)-side impl blocks,
//! file lifecycle in [`files`](self::files). All of them are methods on
//! [`NamespaceManager`] so callers see one surface.

mod files;
mod folders;

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info};

use filenest_core::error::AppError;
use filenest_core::result::AppResult;
use filenest_core::traits::blob::BlobStore;
use filenest_core::types::{DescendantKind, ReadScope};
use filenest_database::MetadataStore;
use filenest_entity::file::File;
use filenest_entity::folder::{Folder, NewFolder};

use crate::paths;

/// Root folder path.
pub const ROOT_PATH: &str = "/";

/// Hierarchy engine over a metadata store and a blob store.
///
/// Construction auto-provisions the root folder `/` if the metadata store
/// does not hold one yet.
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    pub(crate) meta: Arc<dyn MetadataStore>,
    pub(crate) blobs: Arc<dyn BlobStore>,
}

impl NamespaceManager {
    /// Create a manager over the given stores, provisioning the root
    /// folder if it is missing.
    pub async fn new(meta: Arc<dyn MetadataStore>, blobs: Arc<dyn BlobStore>) -> AppResult<Self> {
        let manager = Self { meta, blobs };

        if manager
            .meta
            .folder_by_path(ROOT_PATH, ReadScope::ActiveOnly)
            .await?
            .is_none()
        {
            manager
                .meta
                .insert_folder(&NewFolder {
                    parent_id: None,
                    name: String::new(),
                    full_path: ROOT_PATH.to_string(),
                })
                .await?;
            info!("Provisioned root folder");
        }

        Ok(manager)
    }

    /// The root folder.
    pub async fn root(&self) -> AppResult<Folder> {
        self.meta
            .folder_by_path(ROOT_PATH, ReadScope::ActiveOnly)
            .await?
            .ok_or_else(|| AppError::general("Root folder is missing"))
    }

    /// Resolve a folder by its full path.
    ///
    /// In the active scope a folder inside a deleted subtree does not
    /// resolve even when its own row carries no delete flag.
    pub async fn resolve_folder(&self, path: &str, scope: ReadScope) -> AppResult<Folder> {
        paths::validate(path)?;

        let folder = self
            .meta
            .folder_by_path(path, scope)
            .await?
            .ok_or_else(|| AppError::folder_not_found(format!("Folder not found: {path}")))?;

        if scope == ReadScope::ActiveOnly && self.has_deleted_ancestor(&folder).await? {
            return Err(AppError::folder_not_found(format!(
                "Folder not found: {path}"
            )));
        }

        debug!(path, "Resolved folder");
        Ok(folder)
    }

    /// Resolve a file by name inside a folder, joined with its current
    /// version. Returns `None` when no record matches the scope.
    pub async fn resolve_file(
        &self,
        folder: &Folder,
        name: &str,
        scope: ReadScope,
    ) -> AppResult<Option<File>> {
        let Some(record) = self.meta.file_by_name(folder.id, name, scope).await? else {
            return Ok(None);
        };

        let version = self
            .meta
            .current_version(record.id)
            .await?
            .ok_or_else(|| {
                AppError::general(format!("File '{}' has no current version", record.name))
            })?;

        Ok(Some(File::project(&record, &version, &folder.full_path)))
    }

    /// List the immediate children of a folder: subfolders and files.
    pub async fn children_of(
        &self,
        folder: &Folder,
        scope: ReadScope,
    ) -> AppResult<(Vec<Folder>, Vec<File>)> {
        let subfolders = self.meta.child_folders(folder.id, scope).await?;
        let files = self.project_child_files(folder, scope).await?;
        Ok((subfolders, files))
    }

    /// Walk a folder's subtree breadth-first and collect active
    /// descendants. Within each folder, files come before subfolders.
    pub async fn descendants_of(
        &self,
        folder: &Folder,
        kind: DescendantKind,
    ) -> AppResult<(Vec<Folder>, Vec<File>)> {
        let mut folders = Vec::new();
        let mut files = Vec::new();
        let mut worklist = VecDeque::from([folder.clone()]);

        while let Some(current) = worklist.pop_front() {
            if kind.includes_files() {
                files.extend(
                    self.project_child_files(&current, ReadScope::ActiveOnly)
                        .await?,
                );
            }
            let subfolders = self
                .meta
                .child_folders(current.id, ReadScope::ActiveOnly)
                .await?;
            for sub in subfolders {
                if kind.includes_folders() {
                    folders.push(sub.clone());
                }
                worklist.push_back(sub);
            }
        }

        Ok((folders, files))
    }

    async fn project_child_files(&self, folder: &Folder, scope: ReadScope) -> AppResult<Vec<File>> {
        let records = self.meta.child_files(folder.id, scope).await?;
        let mut files = Vec::with_capacity(records.len());
        for record in records {
            let version = self
                .meta
                .current_version(record.id)
                .await?
                .ok_or_else(|| {
                    AppError::general(format!("File '{}' has no current version", record.name))
                })?;
            files.push(File::project(&record, &version, &folder.full_path));
        }
        Ok(files)
    }

    /// Whether any ancestor of the folder carries the delete flag.
    pub(crate) async fn has_deleted_ancestor(&self, folder: &Folder) -> AppResult<bool> {
        let mut parent_id = folder.parent_id;
        while let Some(id) = parent_id {
            let parent = self
                .meta
                .folder_by_id(id)
                .await?
                .ok_or_else(|| AppError::folder_not_found(format!("Folder {id} not found")))?;
            if parent.is_deleted {
                return Ok(true);
            }
            parent_id = parent.parent_id;
        }
        Ok(false)
    }

    /// Reject mutations targeting a folder that is deleted itself or sits
    /// inside a deleted subtree.
    ///
    /// The caller's `Folder` may be a stale snapshot, so the delete flag is
    /// read from the current row, not from the handle.
    pub(crate) async fn ensure_active(&self, folder: &Folder) -> AppResult<()> {
        let row = self.require_folder(folder.id).await?;
        if row.is_deleted || self.has_deleted_ancestor(&row).await? {
            return Err(AppError::deleted_item(format!(
                "Folder '{}' is deleted",
                row.full_path
            )));
        }
        Ok(())
    }
}
