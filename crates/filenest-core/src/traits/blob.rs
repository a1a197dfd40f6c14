//! Blob store trait for content-byte persistence.
//!
//! The blob store has no knowledge of names, folders, or versions: it
//! writes an incoming byte stream to a uniquely identified object and
//! opens objects for reading by identifier. Metadata rows reference blobs
//! by [`BlobId`]; one blob may be referenced by several file versions.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;
use crate::types::BlobId;

/// A byte stream type used for reading and writing blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Wrap an in-memory buffer as a [`ByteStream`].
pub fn bytes_stream(data: Bytes) -> ByteStream {
    Box::pin(futures::stream::once(async move { Ok(data) }))
}

/// Trait for blob storage backends.
///
/// A fresh [`BlobId`] is generated on every write, so retried writes never
/// collide with an earlier attempt; abandoned blobs are reclaimed by the
/// purge path once no version references them.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write a byte stream to a new blob. Returns its id and byte size.
    async fn put_stream(&self, stream: ByteStream) -> AppResult<(BlobId, u64)>;

    /// Write an in-memory buffer to a new blob. Returns its id and byte size.
    async fn put_bytes(&self, data: Bytes) -> AppResult<(BlobId, u64)>;

    /// Open a blob for reading as a byte stream.
    async fn open(&self, id: BlobId) -> AppResult<ByteStream>;

    /// Read a blob fully into memory.
    async fn read_bytes(&self, id: BlobId) -> AppResult<Bytes>;

    /// Check whether a blob object exists.
    async fn exists(&self, id: BlobId) -> AppResult<bool>;

    /// Physically remove a blob object. Removing a missing blob is a no-op.
    async fn delete(&self, id: BlobId) -> AppResult<()>;
}
