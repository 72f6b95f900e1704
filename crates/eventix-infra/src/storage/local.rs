//! Local-disk blob store for uploaded event images.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use rand::Rng;

use eventix_core::ports::{BlobError, BlobStore, StoredBlob};
use eventix_core::upload::stored_file_name;

/// Writes blobs into one directory and reports paths relative to its public prefix.
pub struct LocalBlobStore {
    dir: PathBuf,
    public_prefix: String,
}

impl LocalBlobStore {
    /// Create the store, making `dir` if it does not exist.
    pub async fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Result<Self, BlobError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| BlobError::Io(format!("create {}: {e}", dir.display())))?;

        Ok(Self {
            dir,
            public_prefix: public_prefix.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name_of<'a>(&self, blob: &'a StoredBlob) -> Option<&'a str> {
        blob.relative_path
            .strip_prefix(self.public_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && *name != ".." && !name.contains(['/', '\\']))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, original_name: &str, body: Bytes) -> Result<StoredBlob, BlobError> {
        let nonce = rand::thread_rng().gen_range(0..1_000_000_000);
        let file_name = stored_file_name(original_name, Utc::now().timestamp_millis(), nonce);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, &body)
            .await
            .map_err(|e| BlobError::Io(format!("write {}: {e}", path.display())))?;

        tracing::debug!(file = %file_name, bytes = body.len(), "Stored upload");

        Ok(StoredBlob {
            relative_path: format!("{}/{}", self.public_prefix, file_name),
        })
    }

    async fn remove(&self, blob: &StoredBlob) -> Result<(), BlobError> {
        let Some(file_name) = self.file_name_of(blob) else {
            return Ok(());
        };

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_sanitized_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(tmp.path().join("uploads"), "uploads")
            .await
            .unwrap();

        let blob = store
            .put("../evil poster.png", Bytes::from_static(b"png-bytes"))
            .await
            .unwrap();

        assert!(blob.relative_path.starts_with("uploads/"));
        assert!(blob.relative_path.ends_with("-.._evil_poster.png"));

        let name = blob.relative_path.trim_start_matches("uploads/");
        let written = tokio::fs::read(store.dir().join(name)).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn test_same_name_does_not_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(tmp.path(), "uploads").await.unwrap();

        let a = store.put("a.png", Bytes::from_static(b"1")).await.unwrap();
        let b = store.put("a.png", Bytes::from_static(b"2")).await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(tmp.path(), "uploads").await.unwrap();

        let blob = store.put("a.png", Bytes::from_static(b"1")).await.unwrap();
        store.remove(&blob).await.unwrap();
        store.remove(&blob).await.unwrap();

        let name = blob.relative_path.trim_start_matches("uploads/");
        assert!(!store.dir().join(name).exists());
    }
}
