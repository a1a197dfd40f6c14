//! Concrete PostgreSQL repository implementations.

pub mod file;
pub mod folder;

pub use file::FileRepository;
pub use folder::FolderRepository;

use filenest_core::types::ReadScope;

/// SQL fragment applying a [`ReadScope`] to a soft-deletable table.
///
/// Purged rows are never visible through any scope.
pub(crate) fn scope_predicate(scope: ReadScope) -> &'static str {
    match scope {
        ReadScope::ActiveOnly => "AND NOT is_deleted AND NOT is_purged",
        ReadScope::DeletedOnly => "AND is_deleted AND NOT is_purged",
        ReadScope::All => "AND NOT is_purged",
    }
}
