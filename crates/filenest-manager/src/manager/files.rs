//! File lifecycle: write, read, copy, move, rename, delete, restore,
//! purge.

use chrono::Utc;
use tracing::info;

use filenest_core::error::AppError;
use filenest_core::result::AppResult;
use filenest_core::traits::blob::ByteStream;
use filenest_core::types::{BlobId, ConflictPolicy, FileId, ReadScope};
use filenest_entity::file::{File, FileRecord, NewFileRecord, NewFileVersion};
use filenest_entity::folder::Folder;

use crate::{naming, paths};

use super::NamespaceManager;

impl NamespaceManager {
    /// Write file content under `folder`.
    ///
    /// A fresh blob is written first. If an active file of that name
    /// already exists the write becomes its next version; otherwise a new
    /// record is created at version 1.
    pub async fn create_or_update_file(
        &self,
        folder: &Folder,
        name: &str,
        content: ByteStream,
    ) -> AppResult<File> {
        paths::validate_name(name)?;
        self.ensure_active(folder).await?;

        let (blob_id, size) = self.blobs.put_stream(content).await?;

        let existing = self
            .meta
            .file_by_name(folder.id, name, ReadScope::ActiveOnly)
            .await?;

        let (record, version) = match existing {
            Some(mut record) => {
                let next_number = match self.meta.current_version(record.id).await? {
                    Some(current) => {
                        self.meta.set_version_current(current.id, false).await?;
                        current.version_number + 1
                    }
                    None => 1,
                };
                let version = self
                    .meta
                    .insert_version(&NewFileVersion {
                        file_id: record.id,
                        version_number: next_number,
                        is_current: true,
                        blob_id,
                        size_bytes: size as i64,
                    })
                    .await?;
                record.modified_at = Utc::now();
                let record = self.meta.update_file(&record).await?;
                (record, version)
            }
            None => {
                let record = self
                    .meta
                    .insert_file(&NewFileRecord {
                        parent_id: folder.id,
                        name: name.to_string(),
                    })
                    .await?;
                let version = self
                    .meta
                    .insert_version(&NewFileVersion {
                        file_id: record.id,
                        version_number: 1,
                        is_current: true,
                        blob_id,
                        size_bytes: size as i64,
                    })
                    .await?;
                (record, version)
            }
        };

        info!(
            path = %format!("{}{}", folder.full_path, record.name),
            version = version.version_number,
            bytes = version.size_bytes,
            "Wrote file"
        );
        Ok(File::project(&record, &version, &folder.full_path))
    }

    /// Open a file's current content as a byte stream.
    pub async fn read_file(&self, file: &File) -> AppResult<ByteStream> {
        self.blobs.open(file.blob_id).await
    }

    /// Copy a file into `target`, optionally under a new name.
    ///
    /// The copy starts its own version history at 1 but shares the
    /// source's blob; bytes are only reclaimed once no version of any
    /// file references them.
    pub async fn copy_file(
        &self,
        source: &File,
        target: &Folder,
        new_name: Option<&str>,
        policy: ConflictPolicy,
    ) -> AppResult<File> {
        let desired = match new_name {
            Some(name) => {
                paths::validate_name(name)?;
                name
            }
            None => source.name.as_str(),
        };
        self.ensure_file_active(source).await?;
        self.ensure_active(target).await?;

        let name = self.free_file_name(target, desired, None, policy).await?;
        let copied = self
            .copy_file_record(target, name, source.blob_id, source.size_bytes)
            .await?;

        info!(source = %source.full_path, dest = %copied.full_path, "Copied file");
        Ok(copied)
    }

    /// Move a file into `target`, optionally under a new name, keeping
    /// its version history.
    pub async fn move_file(
        &self,
        source: &File,
        target: &Folder,
        new_name: Option<&str>,
        policy: ConflictPolicy,
    ) -> AppResult<File> {
        let desired = match new_name {
            Some(name) => {
                paths::validate_name(name)?;
                name
            }
            None => source.name.as_str(),
        };
        self.ensure_file_active(source).await?;
        let moved = self
            .move_file_inner(source, target, desired, policy, false)
            .await?;
        info!(source = %source.full_path, dest = %moved.full_path, "Moved file");
        Ok(moved)
    }

    /// Rename a file in place. Always raises on a name clash.
    pub async fn rename_file(&self, source: &File, new_name: &str) -> AppResult<File> {
        paths::validate_name(new_name)?;
        self.ensure_file_active(source).await?;

        let parent = self.require_folder(source.parent_id).await?;
        let renamed = self
            .move_file_inner(source, &parent, new_name, ConflictPolicy::RaiseConflict, false)
            .await?;
        info!(from = %source.full_path, to = %renamed.full_path, "Renamed file");
        Ok(renamed)
    }

    /// Soft-delete a file.
    pub async fn delete_file(&self, file: &File) -> AppResult<File> {
        if file.is_deleted {
            return Err(AppError::deleted_item(format!(
                "File '{}' is already deleted",
                file.full_path
            )));
        }

        let mut record = self.require_file(file.id).await?;
        record.is_deleted = true;
        record.modified_at = Utc::now();
        let record = self.meta.update_file(&record).await?;

        info!(path = %file.full_path, "Deleted file");
        self.project_record(&record).await
    }

    /// Bring a soft-deleted file back.
    ///
    /// If an active file has since taken the name, the restored file
    /// comes back under a ` - Copy` name.
    pub async fn restore_file(&self, file: &File) -> AppResult<File> {
        if !file.is_deleted {
            return Err(AppError::file_not_deleted(format!(
                "File '{}' is not deleted",
                file.full_path
            )));
        }

        let parent = self.require_folder(file.parent_id).await?;
        let restored = self
            .move_file_inner(file, &parent, &file.name, ConflictPolicy::Copy, true)
            .await?;

        info!(path = %restored.full_path, "Restored file");
        Ok(restored)
    }

    /// Permanently remove a soft-deleted file, its versions, and any
    /// blobs left unreferenced.
    pub async fn purge_file(&self, file: &File) -> AppResult<()> {
        if !file.is_deleted {
            return Err(AppError::file_not_deleted(format!(
                "File '{}' is not deleted",
                file.full_path
            )));
        }

        self.purge_file_record(file.id).await?;
        info!(path = %file.full_path, "Purged file");
        Ok(())
    }

    /// Insert a new record plus a version-1 row pointing at an existing
    /// blob. Shared by file copy and recursive folder copy.
    pub(crate) async fn copy_file_record(
        &self,
        target: &Folder,
        name: String,
        blob_id: BlobId,
        size_bytes: i64,
    ) -> AppResult<File> {
        let record = self
            .meta
            .insert_file(&NewFileRecord {
                parent_id: target.id,
                name,
            })
            .await?;
        let version = self
            .meta
            .insert_version(&NewFileVersion {
                file_id: record.id,
                version_number: 1,
                is_current: true,
                blob_id,
                size_bytes,
            })
            .await?;
        Ok(File::project(&record, &version, &target.full_path))
    }

    /// Remove a record's version rows, release blobs nothing references
    /// anymore, and drop the record itself.
    pub(crate) async fn purge_file_record(&self, id: FileId) -> AppResult<()> {
        let mut record = self.require_file(id).await?;

        record.is_purged = true;
        self.meta.update_file(&record).await?;

        let versions = self.meta.versions_of(id).await?;
        self.meta.remove_versions(id).await?;

        let mut released: Vec<BlobId> = Vec::new();
        for version in versions {
            if released.contains(&version.blob_id) {
                continue;
            }
            if self.meta.blob_reference_count(version.blob_id).await? == 0 {
                self.blobs.delete(version.blob_id).await?;
                released.push(version.blob_id);
            }
        }

        if !self.meta.remove_file(id).await? {
            return Err(AppError::general(format!(
                "Failed to remove file record: {}",
                record.name
            )));
        }
        Ok(())
    }

    async fn move_file_inner(
        &self,
        source: &File,
        target: &Folder,
        desired_name: &str,
        policy: ConflictPolicy,
        restore: bool,
    ) -> AppResult<File> {
        self.ensure_active(target).await?;

        let name = self
            .free_file_name(target, desired_name, Some(source.id), policy)
            .await?;

        let mut record = self.require_file(source.id).await?;
        record.parent_id = target.id;
        record.name = name;
        record.modified_at = Utc::now();
        if restore {
            record.is_deleted = false;
        }
        let record = self.meta.update_file(&record).await?;

        let version = self
            .meta
            .current_version(record.id)
            .await?
            .ok_or_else(|| {
                AppError::general(format!("File '{}' has no current version", record.name))
            })?;
        Ok(File::project(&record, &version, &target.full_path))
    }

    /// Find a free name in `target` per the conflict policy. A match on
    /// `moving` itself is not a conflict.
    async fn free_file_name(
        &self,
        target: &Folder,
        desired_name: &str,
        moving: Option<FileId>,
        policy: ConflictPolicy,
    ) -> AppResult<String> {
        let mut candidate = desired_name.to_string();
        loop {
            match self
                .meta
                .file_by_name(target.id, &candidate, ReadScope::ActiveOnly)
                .await?
            {
                None => return Ok(candidate),
                Some(existing) if Some(existing.id) == moving => return Ok(candidate),
                Some(_) => {
                    if policy == ConflictPolicy::RaiseConflict {
                        return Err(AppError::file_exists(format!(
                            "File already exists: {}{candidate}",
                            target.full_path
                        )));
                    }
                    candidate = naming::file_copy_name(&candidate);
                }
            }
        }
    }

    async fn project_record(&self, record: &FileRecord) -> AppResult<File> {
        let parent = self.require_folder(record.parent_id).await?;
        let version = self
            .meta
            .current_version(record.id)
            .await?
            .ok_or_else(|| {
                AppError::general(format!("File '{}' has no current version", record.name))
            })?;
        Ok(File::project(record, &version, &parent.full_path))
    }

    async fn require_file(&self, id: FileId) -> AppResult<FileRecord> {
        self.meta
            .file_by_id(id)
            .await?
            .ok_or_else(|| AppError::file_not_found(format!("File {id} not found")))
    }

    /// Reject mutations on a deleted file or one inside a deleted
    /// subtree. Re-reads the record so a stale handle cannot bypass the
    /// check.
    async fn ensure_file_active(&self, file: &File) -> AppResult<()> {
        let record = self.require_file(file.id).await?;
        if record.is_deleted {
            return Err(AppError::deleted_item(format!(
                "File '{}' is deleted",
                file.full_path
            )));
        }
        let parent = self.require_folder(record.parent_id).await?;
        self.ensure_active(&parent).await
    }
}
