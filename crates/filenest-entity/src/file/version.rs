//! File version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filenest_core::types::{BlobId, FileId, VersionId};

/// One content revision of a file.
///
/// Version numbers start at 1 and increment per file; exactly one
/// non-deleted version per active file has `is_current = true`. A version
/// is never mutated after creation except for the `is_current` and
/// `is_deleted` flags. Several versions may reference the same blob
/// (shallow copies), so blob lifetime is the union of all referencing
/// versions' lifetimes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Unique version identifier.
    pub id: VersionId,
    /// The file this version belongs to.
    pub file_id: FileId,
    /// Sequential version number (per file, starting at 1).
    pub version_number: i32,
    /// Whether this version determines the file's visible content.
    pub is_current: bool,
    /// The blob holding this version's content bytes.
    pub blob_id: BlobId,
    /// Content size in bytes.
    pub size_bytes: i64,
    /// Soft-delete marker.
    pub is_deleted: bool,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new file version row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileVersion {
    /// The owning file.
    pub file_id: FileId,
    /// Sequential version number.
    pub version_number: i32,
    /// Whether the new version becomes current.
    pub is_current: bool,
    /// The referenced blob.
    pub blob_id: BlobId,
    /// Content size in bytes.
    pub size_bytes: i64,
}
