//! Blob storage for the master roster file
//!
//! The master lives under a single fixed blob name: `put` overwrites it and
//! `get` reads it back. Backends are chosen from configuration; see
//! [`crate::config::StorageSettings::build_store`].

mod azure;
mod local;
#[cfg(test)]
pub mod memory;

pub use azure::{AzureBlobStore, AzureStoreConfig};
pub use local::{LocalBlobStore, LocalStoreConfig};

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Blob name the master file is stored under
pub const DEFAULT_BLOB_NAME: &str = "uploaded_file.xlsx";

/// Content type for the structured workbook
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Blob '{name}' not found")]
    NotFound { name: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Blob service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid storage configuration: {0}")]
    Config(String),
}

/// Byte store keyed by one fixed blob name
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Name of the blob this store reads and writes
    fn blob_name(&self) -> &str;

    /// Overwrite the blob and return a URL for it
    async fn put(&self, bytes: Vec<u8>) -> Result<String, StoreError>;

    /// Read the blob; `StoreError::NotFound` if nothing has been stored yet
    async fn get(&self) -> Result<Vec<u8>, StoreError>;
}

/// Reject blob names that would escape the container or directory
pub(crate) fn validate_blob_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Config("blob name cannot be empty".to_string()));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(StoreError::Config(format!(
            "blob name '{}' must be a plain file name",
            name
        )));
    }
    Ok(())
}
