//! Read scoping for namespace queries.

use serde::{Deserialize, Serialize};

/// Deletion-state filter applied to lookups and child listings.
///
/// A plain three-way variant, not a flag set: the scopes are mutually
/// exclusive and `All` already covers the combined case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadScope {
    /// Only items that are not soft-deleted (the default view).
    #[default]
    ActiveOnly,
    /// Only soft-deleted items (the "trash" view).
    DeletedOnly,
    /// Both active and soft-deleted items.
    All,
}

impl ReadScope {
    /// Whether an item with the given deletion flag is visible in this scope.
    pub fn matches(self, is_deleted: bool) -> bool {
        match self {
            Self::ActiveOnly => !is_deleted,
            Self::DeletedOnly => is_deleted,
            Self::All => true,
        }
    }
}

/// Which kinds of descendants a recursive walk should collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescendantKind {
    /// Only descendant folders.
    Folders,
    /// Only descendant files.
    Files,
    /// Both folders and files.
    Both,
}

impl DescendantKind {
    /// Whether folders are included in the walk result.
    pub fn includes_folders(self) -> bool {
        matches!(self, Self::Folders | Self::Both)
    }

    /// Whether files are included in the walk result.
    pub fn includes_files(self) -> bool {
        matches!(self, Self::Files | Self::Both)
    }
}
