//! Local filesystem blob store.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use filenest_core::config::StorageConfig;
use filenest_core::error::{AppError, ErrorKind};
use filenest_core::result::AppResult;
use filenest_core::traits::blob::{BlobStore, ByteStream, bytes_stream};
use filenest_core::types::BlobId;

/// Blob store writing each blob as one flat file under a root directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all blob objects.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Cannot create blob root {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Create a blob store from configuration.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        Self::new(&config.root_dir).await
    }

    fn resolve(&self, id: BlobId) -> PathBuf {
        self.root.join(id.to_string())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put_stream(&self, mut stream: ByteStream) -> AppResult<(BlobId, u64)> {
        let id = BlobId::new();
        let full_path = self.resolve(id);

        let mut file = fs::File::create(&full_path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to create blob {id}"), e)
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Upload stream yielded an error", e))?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Short write on blob {id}"), e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, format!("Flush failed for blob {id}"), e))?;

        debug!(blob = %id, bytes = total_bytes, "Wrote blob");
        Ok((id, total_bytes))
    }

    async fn put_bytes(&self, data: Bytes) -> AppResult<(BlobId, u64)> {
        self.put_stream(bytes_stream(data)).await
    }

    async fn open(&self, id: BlobId) -> AppResult<ByteStream> {
        let full_path = self.resolve(id);
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::blob_missing(format!("Blob not found: {id}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to open blob {id}"), e)
            }
        })?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream.map(|r| r.map(|b| b.into()))))
    }

    async fn read_bytes(&self, id: BlobId) -> AppResult<Bytes> {
        let full_path = self.resolve(id);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::blob_missing(format!("Blob not found: {id}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to read blob {id}"), e)
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn exists(&self, id: BlobId) -> AppResult<bool> {
        Ok(self.resolve(id).exists())
    }

    async fn delete(&self, id: BlobId) -> AppResult<()> {
        let full_path = self.resolve(id);
        if full_path.exists() {
            fs::remove_file(&full_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete blob {id}"),
                    e,
                )
            })?;
            debug!(blob = %id, "Deleted blob");
        }
        Ok(())
    }
}
