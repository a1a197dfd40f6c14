//! Capability trait definitions.
//!
//! Traits are defined here in `filenest-core` and implemented in the
//! infrastructure crates (`filenest-storage`, `filenest-database`).

pub mod blob;

pub use blob::{BlobStore, ByteStream, bytes_stream};
