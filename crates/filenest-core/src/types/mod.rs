//! Shared vocabulary types used across FileNest crates.

pub mod conflict;
pub mod id;
pub mod scope;

pub use conflict::ConflictPolicy;
pub use id::{BlobId, FileId, FolderId, VersionId};
pub use scope::{DescendantKind, ReadScope};
