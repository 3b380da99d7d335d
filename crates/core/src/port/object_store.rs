// Object Store Port (Interface)

use crate::error::Result;
use async_trait::async_trait;

/// Store interface for published artifacts
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object and return a stable, retrievable absolute URL.
    /// Failures propagate as retryable errors.
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct StoredObject {
        pub key: String,
        pub bytes: Vec<u8>,
        pub content_type: String,
    }

    /// Records every put; partial side effects stay observable even when a
    /// later pipeline stage fails.
    pub struct RecordingObjectStore {
        base_url: String,
        puts: Mutex<Vec<StoredObject>>,
    }

    impl RecordingObjectStore {
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                base_url: base_url.into(),
                puts: Mutex::new(Vec::new()),
            }
        }

        pub fn stored(&self) -> Vec<StoredObject> {
            self.puts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStore for RecordingObjectStore {
        async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String> {
            self.puts.lock().unwrap().push(StoredObject {
                key: key.to_string(),
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            });
            Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
        }
    }
}
