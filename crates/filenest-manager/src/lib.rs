//! The FileNest namespace manager.
//!
//! [`NamespaceManager`] is the single entry point for folder and file
//! lifecycle operations. It owns no state beyond two handles: a metadata
//! store for the versioned hierarchy and a blob store for content bytes.
//! All hierarchy rules (path validation, naming conflicts, soft delete,
//! restore, purge) live here; the stores stay dumb.

pub mod manager;
pub mod naming;
pub mod paths;

pub use manager::NamespaceManager;
