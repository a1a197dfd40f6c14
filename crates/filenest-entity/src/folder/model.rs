//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filenest_core::types::FolderId;

/// A folder in the namespace hierarchy.
///
/// `full_path` is the materialized path: it always begins and ends with
/// `/` (root is `"/"`), and for a non-root folder it equals
/// `parent.full_path + name + "/"`. The `parent_id` chain is the
/// normalized source of truth; the path is a derived cache rewritten on
/// every structural change and the two must never disagree.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Parent folder ID (None only for the root folder).
    pub parent_id: Option<FolderId>,
    /// Folder name: the last path segment (empty for root).
    pub name: String,
    /// Full materialized path (e.g., `/documents/reports/`).
    pub full_path: String,
    /// Soft-delete marker; the row stays until purged.
    pub is_deleted: bool,
    /// Hard-delete marker (terminal).
    pub is_purged: bool,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last modified.
    pub modified_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is the root folder.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Full materialized path.
    pub full_path: String,
}
