//! In-memory blob store for tests

use std::sync::Mutex;

use async_trait::async_trait;

use super::{BlobStore, DEFAULT_BLOB_NAME, StoreError};

#[derive(Default)]
pub struct MemoryBlobStore {
    blob: Mutex<Option<Vec<u8>>>,
    fail_writes: bool,
    fail_reads: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(bytes: Vec<u8>) -> Self {
        Self {
            blob: Mutex::new(Some(bytes)),
            ..Self::default()
        }
    }

    /// Every `put` fails with a status error
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Every `get` fails with a status error
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.blob.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn blob_name(&self) -> &str {
        DEFAULT_BLOB_NAME
    }

    async fn put(&self, bytes: Vec<u8>) -> Result<String, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Status {
                status: 403,
                body: "AuthorizationFailure".to_string(),
            });
        }
        *self.blob.lock().unwrap() = Some(bytes);
        Ok(format!("memory://{}", DEFAULT_BLOB_NAME))
    }

    async fn get(&self) -> Result<Vec<u8>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Status {
                status: 500,
                body: "InternalError".to_string(),
            });
        }
        self.blob
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| StoreError::NotFound {
                name: DEFAULT_BLOB_NAME.to_string(),
            })
    }
}
