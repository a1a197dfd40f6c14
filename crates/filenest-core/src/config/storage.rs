//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Blob store configuration.
///
/// Blobs are stored as flat files under the root directory, one per blob
/// identifier, with no extension or folder nesting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all stored blob objects. Created if absent.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    /// Maximum accepted content size in bytes (default 5 GB).
    #[serde(default = "default_max_content_size")]
    pub max_content_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            max_content_size_bytes: default_max_content_size(),
        }
    }
}

fn default_root_dir() -> String {
    "data/blobs".to_string()
}

fn default_max_content_size() -> u64 {
    5 * 1024 * 1024 * 1024
}
