//! Directory-backed blob store

use std::path::PathBuf;

use async_trait::async_trait;

use super::{BlobStore, StoreError, validate_blob_name};

#[derive(Debug, Clone)]
pub struct LocalStoreConfig {
    /// Directory holding the blob; created on first write
    pub root: PathBuf,
    pub blob_name: String,
}

/// Stores the master file as `<root>/<blob_name>`
#[derive(Debug)]
pub struct LocalBlobStore {
    config: LocalStoreConfig,
}

impl LocalBlobStore {
    pub fn new(config: LocalStoreConfig) -> Result<Self, StoreError> {
        validate_blob_name(&config.blob_name)?;
        Ok(Self { config })
    }

    pub fn path(&self) -> PathBuf {
        self.config.root.join(&self.config.blob_name)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn blob_name(&self) -> &str {
        &self.config.blob_name
    }

    async fn put(&self, bytes: Vec<u8>) -> Result<String, StoreError> {
        tokio::fs::create_dir_all(&self.config.root)
            .await
            .map_err(|source| StoreError::Io {
                path: self.config.root.clone(),
                source,
            })?;

        let path = self.path();
        let size = bytes.len();
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        log::info!("Stored {} bytes at {}", size, path.display());
        Ok(format!("file://{}", path.display()))
    }

    async fn get(&self) -> Result<Vec<u8>, StoreError> {
        let path = self.path();
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                log::debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                name: self.config.blob_name.clone(),
            }),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}
