//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filenest_core::types::{FileId, FolderId};

/// The stable identity of a file: name and location, no content.
///
/// `(parent_id, name)` is unique among non-deleted records in a folder.
/// Content lives in [`super::FileVersion`] rows referencing blob objects.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: FileId,
    /// The folder containing this file.
    pub parent_id: FolderId,
    /// The file name (including extension).
    pub name: String,
    /// Soft-delete marker; versions are untouched by it.
    pub is_deleted: bool,
    /// Hard-delete marker (terminal).
    pub is_purged: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last modified.
    pub modified_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileRecord {
    /// The folder to place the file in.
    pub parent_id: FolderId,
    /// The file name.
    pub name: String,
}
