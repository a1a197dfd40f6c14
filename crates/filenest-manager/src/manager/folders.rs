//! Folder lifecycle: create, copy, move, rename, delete, restore, purge.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use tracing::info;

use filenest_core::error::AppError;
use filenest_core::result::AppResult;
use filenest_core::types::{ConflictPolicy, FolderId, ReadScope};
use filenest_entity::folder::{Folder, NewFolder};

use crate::{naming, paths};

use super::NamespaceManager;

impl NamespaceManager {
    /// Create a folder under `parent`.
    ///
    /// Under the copy policy a clashing name is retried with ` - Copy`
    /// markers until a free path is found.
    pub async fn create_folder(
        &self,
        parent: &Folder,
        name: &str,
        policy: ConflictPolicy,
    ) -> AppResult<Folder> {
        paths::validate_name(name)?;
        self.ensure_active(parent).await?;

        let mut candidate = name.to_string();
        let full_path = loop {
            let path = paths::join(&parent.full_path, &candidate);
            if self
                .meta
                .folder_by_path(&path, ReadScope::ActiveOnly)
                .await?
                .is_none()
            {
                break path;
            }
            if policy == ConflictPolicy::RaiseConflict {
                return Err(AppError::folder_exists(format!(
                    "Folder already exists: {path}"
                )));
            }
            candidate = naming::folder_copy_name(&candidate);
        };

        let folder = self
            .meta
            .insert_folder(&NewFolder {
                parent_id: Some(parent.id),
                name: candidate,
                full_path,
            })
            .await?;

        info!(path = %folder.full_path, "Created folder");
        Ok(folder)
    }

    /// Recursively copy `source` into `target` as a new subtree.
    ///
    /// File contents are not duplicated: each copied file gets a fresh
    /// version-1 row pointing at the source's current blob.
    pub async fn copy_folder(
        &self,
        source: &Folder,
        target: &Folder,
        policy: ConflictPolicy,
    ) -> AppResult<Folder> {
        self.ensure_active(source).await?;
        self.ensure_active(target).await?;

        if paths::starts_with_ci(&target.full_path, &source.full_path) {
            return Err(AppError::target_is_child(format!(
                "Cannot copy '{}' into its own subtree '{}'",
                source.full_path, target.full_path
            )));
        }

        let dest = self.create_folder(target, &source.name, policy).await?;

        let mut worklist = VecDeque::from([(source.clone(), dest.clone())]);
        while let Some((src, dst)) = worklist.pop_front() {
            let files = self
                .meta
                .child_files(src.id, ReadScope::ActiveOnly)
                .await?;
            for record in files {
                let version = self
                    .meta
                    .current_version(record.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::general(format!("File '{}' has no current version", record.name))
                    })?;
                self.copy_file_record(&dst, record.name.clone(), version.blob_id, version.size_bytes)
                    .await?;
            }

            let subfolders = self
                .meta
                .child_folders(src.id, ReadScope::ActiveOnly)
                .await?;
            for sub in subfolders {
                let sub_dest = self
                    .create_folder(&dst, &sub.name, ConflictPolicy::RaiseConflict)
                    .await?;
                worklist.push_back((sub, sub_dest));
            }
        }

        info!(source = %source.full_path, dest = %dest.full_path, "Copied folder");
        Ok(dest)
    }

    /// Move `source` so it becomes a child of `target`, rewriting the
    /// paths of every descendant.
    pub async fn move_folder(
        &self,
        source: &Folder,
        target: &Folder,
        policy: ConflictPolicy,
    ) -> AppResult<Folder> {
        self.ensure_active(source).await?;
        let moved = self
            .move_folder_inner(source, target, &source.name, policy, false)
            .await?;
        info!(source = %source.full_path, dest = %moved.full_path, "Moved folder");
        Ok(moved)
    }

    /// Rename a folder in place. Always raises on a name clash.
    pub async fn rename_folder(&self, folder: &Folder, new_name: &str) -> AppResult<Folder> {
        paths::validate_name(new_name)?;
        self.ensure_active(folder).await?;

        let Some(parent_id) = folder.parent_id else {
            return Err(AppError::validation("Cannot rename the root folder"));
        };
        let parent = self.require_folder(parent_id).await?;

        let renamed = self
            .move_folder_inner(folder, &parent, new_name, ConflictPolicy::RaiseConflict, false)
            .await?;
        info!(from = %folder.full_path, to = %renamed.full_path, "Renamed folder");
        Ok(renamed)
    }

    /// Soft-delete a folder. Descendants keep their own flags and become
    /// unreachable through the active scope.
    pub async fn delete_folder(&self, folder: &Folder) -> AppResult<Folder> {
        if folder.is_root() {
            return Err(AppError::validation("Cannot delete the root folder"));
        }
        if folder.is_deleted {
            return Err(AppError::deleted_item(format!(
                "Folder '{}' is already deleted",
                folder.full_path
            )));
        }

        let mut row = self.require_folder(folder.id).await?;
        row.is_deleted = true;
        row.modified_at = Utc::now();
        let row = self.meta.update_folder(&row).await?;

        info!(path = %row.full_path, "Deleted folder");
        Ok(row)
    }

    /// Bring a soft-deleted folder back.
    ///
    /// If the old path has since been taken by an active folder, the
    /// restored folder is moved back under its former parent with a
    /// ` - Copy` name.
    pub async fn restore_folder(&self, folder: &Folder) -> AppResult<Folder> {
        if !folder.is_deleted {
            return Err(AppError::folder_not_deleted(format!(
                "Folder '{}' is not deleted",
                folder.full_path
            )));
        }

        let conflict = self
            .meta
            .folder_by_path(&folder.full_path, ReadScope::ActiveOnly)
            .await?;

        let restored = match conflict {
            None => {
                let mut row = self.require_folder(folder.id).await?;
                row.is_deleted = false;
                row.modified_at = Utc::now();
                self.meta.update_folder(&row).await?
            }
            Some(_) => {
                let Some(parent_id) = folder.parent_id else {
                    return Err(AppError::validation("Cannot restore the root folder"));
                };
                let parent = self.require_folder(parent_id).await?;
                self.move_folder_inner(folder, &parent, &folder.name, ConflictPolicy::Copy, true)
                    .await?
            }
        };

        info!(path = %restored.full_path, "Restored folder");
        Ok(restored)
    }

    /// Permanently remove a soft-deleted folder, its whole subtree, all
    /// file versions inside it, and any blobs left unreferenced.
    ///
    /// Rows are flagged purged before physical removal, so a partial
    /// failure leaves them invisible rather than resurrected.
    pub async fn purge_folder(&self, folder: &Folder) -> AppResult<()> {
        if !folder.is_deleted {
            return Err(AppError::folder_not_deleted(format!(
                "Folder '{}' is not deleted",
                folder.full_path
            )));
        }

        let mut rows = self.subtree_rows(folder).await?;
        // Children before parents.
        rows.sort_by(|a, b| b.full_path.len().cmp(&a.full_path.len()));

        for row in rows {
            let files = self.meta.child_files(row.id, ReadScope::All).await?;
            for record in files {
                self.purge_file_record(record.id).await?;
            }

            let mut marked = row.clone();
            marked.is_purged = true;
            self.meta.update_folder(&marked).await?;

            if !self.meta.remove_folder(row.id).await? {
                return Err(AppError::general(format!(
                    "Failed to remove folder row: {}",
                    row.full_path
                )));
            }
        }

        info!(path = %folder.full_path, "Purged folder");
        Ok(())
    }

    /// Move `source` under `target` as `desired_name`, resolving name
    /// clashes per `policy` and rewriting descendant paths. With
    /// `restore` set the source's delete flag is cleared as part of the
    /// move.
    pub(crate) async fn move_folder_inner(
        &self,
        source: &Folder,
        target: &Folder,
        desired_name: &str,
        policy: ConflictPolicy,
        restore: bool,
    ) -> AppResult<Folder> {
        if source.is_root() {
            return Err(AppError::validation("Cannot move the root folder"));
        }
        self.ensure_active(target).await?;

        if paths::starts_with_ci(&target.full_path, &source.full_path) {
            return Err(AppError::target_is_child(format!(
                "Cannot move '{}' into its own subtree '{}'",
                source.full_path, target.full_path
            )));
        }

        let mut candidate = desired_name.to_string();
        let new_prefix = loop {
            let path = paths::join(&target.full_path, &candidate);
            match self
                .meta
                .folder_by_path(&path, ReadScope::ActiveOnly)
                .await?
            {
                None => break path,
                Some(existing) if existing.id == source.id => break path,
                Some(_) => {
                    if policy == ConflictPolicy::RaiseConflict {
                        return Err(AppError::folder_exists(format!(
                            "Folder already exists: {path}"
                        )));
                    }
                    candidate = naming::folder_copy_name(&candidate);
                }
            }
        };

        let old_prefix = source.full_path.clone();
        let now = Utc::now();
        let mut moved = None;

        for mut row in self.subtree_rows(source).await? {
            row.full_path = paths::replace_prefix_ci(&row.full_path, &old_prefix, &new_prefix);
            row.modified_at = now;
            if row.id == source.id {
                row.parent_id = Some(target.id);
                row.name = candidate.clone();
                if restore {
                    row.is_deleted = false;
                }
            }
            let updated = self.meta.update_folder(&row).await?;
            if updated.id == source.id {
                moved = Some(updated);
            }
        }

        moved.ok_or_else(|| {
            AppError::general(format!("Folder row vanished during move: {old_prefix}"))
        })
    }

    /// All rows of `source`'s subtree, including soft-deleted ones.
    ///
    /// The prefix query may return unrelated rows that reuse a deleted
    /// folder's path, so matches are filtered down to rows whose parent
    /// chain actually reaches `source`.
    async fn subtree_rows(&self, source: &Folder) -> AppResult<Vec<Folder>> {
        let rows = self.meta.folders_with_prefix(&source.full_path).await?;
        let parents: HashMap<FolderId, Option<FolderId>> =
            rows.iter().map(|r| (r.id, r.parent_id)).collect();

        let is_member = |row: &Folder| {
            if row.id == source.id {
                return true;
            }
            let mut current = row.parent_id;
            while let Some(id) = current {
                if id == source.id {
                    return true;
                }
                match parents.get(&id) {
                    Some(next) => current = *next,
                    None => return false,
                }
            }
            false
        };

        Ok(rows.into_iter().filter(is_member).collect())
    }

    pub(crate) async fn require_folder(&self, id: FolderId) -> AppResult<Folder> {
        self.meta
            .folder_by_id(id)
            .await?
            .ok_or_else(|| AppError::folder_not_found(format!("Folder {id} not found")))
    }
}
