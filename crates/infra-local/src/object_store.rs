// Filesystem ObjectStore Implementation
//
// Objects land under a root directory; the returned URL joins the configured
// public base with the object key, so whatever serves that directory
// (reverse proxy, file:// for local setups) makes artifacts retrievable.

use async_trait::async_trait;
use std::path::PathBuf;
use tasklist_core::error::{AppError, Result};
use tasklist_core::port::ObjectStore;
use tracing::info;

pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String> {
        let path = self.root.join(key);
        let parent = path.parent().ok_or_else(|| {
            AppError::Storage(format!("object key '{}' has no parent directory", key))
        })?;

        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Storage(format!("cannot create {}: {}", parent.display(), e)))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("cannot write {}: {}", path.display(), e)))?;

        info!(
            key = %key,
            content_type = %content_type,
            size_bytes = bytes.len(),
            "Object stored"
        );

        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path(), "https://objects.test/");

        let url = store
            .put("reports/export-L1-123.csv", b"header\n", "text/csv")
            .await
            .unwrap();

        assert_eq!(url, "https://objects.test/reports/export-L1-123.csv");
        let written = std::fs::read(dir.path().join("reports/export-L1-123.csv")).unwrap();
        assert_eq!(written, b"header\n");
    }

    #[tokio::test]
    async fn test_put_failure_is_retryable() {
        // Root is a file, so creating the key's parent directory must fail
        let file = tempfile::NamedTempFile::new().unwrap();
        let store = FsObjectStore::new(file.path(), "https://objects.test");

        let err = store.put("reports/x.csv", b"x", "text/csv").await.unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert!(!err.is_permanent());
    }
}
