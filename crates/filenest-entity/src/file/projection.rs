//! The joined file view exposed to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filenest_core::types::{BlobId, FileId, FolderId};

use super::model::FileRecord;
use super::version::FileVersion;

/// A read-only join of a [`FileRecord`] and its current [`FileVersion`].
///
/// Never persisted directly; built per request from the two rows plus the
/// parent folder's path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    /// The underlying file record id.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// The folder containing this file.
    pub parent_id: FolderId,
    /// Full path: parent folder path plus name.
    pub full_path: String,
    /// Soft-delete marker of the record.
    pub is_deleted: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last modified.
    pub modified_at: DateTime<Utc>,
    /// The blob holding the current content.
    pub blob_id: BlobId,
    /// Current content size in bytes.
    pub size_bytes: i64,
    /// Current version number.
    pub current_version: i32,
}

impl File {
    /// Join a record with its current version under the given parent path.
    pub fn project(record: &FileRecord, version: &FileVersion, parent_path: &str) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            parent_id: record.parent_id,
            full_path: format!("{parent_path}{}", record.name),
            is_deleted: record.is_deleted,
            created_at: record.created_at,
            modified_at: record.modified_at,
            blob_id: version.blob_id,
            size_bytes: version.size_bytes,
            current_version: version.version_number,
        }
    }
}
