//! Shared test helpers for integration tests.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;

use filenest_core::traits::blob::{ByteStream, bytes_stream};
use filenest_database::MemoryMetadataStore;
use filenest_manager::NamespaceManager;
use filenest_storage::LocalBlobStore;

/// Test environment: a manager over an in-memory metadata store and a
/// blob store in a temp directory.
pub struct TestEnv {
    pub manager: NamespaceManager,
    pub blobs: Arc<LocalBlobStore>,
    _blob_dir: tempfile::TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        let blob_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let blobs = Arc::new(
            LocalBlobStore::new(blob_dir.path().to_str().unwrap())
                .await
                .expect("Failed to init blob store"),
        );
        let manager = NamespaceManager::new(Arc::new(MemoryMetadataStore::new()), blobs.clone())
            .await
            .expect("Failed to init manager");

        Self {
            manager,
            blobs,
            _blob_dir: blob_dir,
        }
    }
}

/// Wrap a string literal as file content.
pub fn content(data: &str) -> ByteStream {
    bytes_stream(Bytes::from(data.to_string()))
}

/// Drain a byte stream into memory.
pub async fn read_all(mut stream: ByteStream) -> Vec<u8> {
    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.expect("Stream read failed"));
    }
    collected
}
