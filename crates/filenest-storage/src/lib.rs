//! Filesystem-backed blob storage for FileNest.
//!
//! Blobs live as flat files under a single root directory, named by their
//! [`BlobId`](filenest_core::types::BlobId). The namespace hierarchy is
//! never mirrored on disk; all structure lives in the metadata store.

pub mod local;

pub use local::LocalBlobStore;
