//! Blob store port - durable storage for uploaded files.

use async_trait::async_trait;
use bytes::Bytes;

/// Location of a stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Path relative to the public upload prefix, e.g. `uploads/1700000000-42-poster.png`.
    pub relative_path: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `body` under a collision-resistant name derived from `original_name`.
    async fn put(&self, original_name: &str, body: Bytes) -> Result<StoredBlob, BlobError>;

    /// Remove a previously stored blob. Missing blobs are not an error.
    async fn remove(&self, blob: &StoredBlob) -> Result<(), BlobError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("I/O error: {0}")]
    Io(String),
}
