//! Azure Blob Storage backend using a container URL and a SAS token

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header};

use super::{BlobStore, StoreError, XLSX_CONTENT_TYPE, validate_blob_name};

/// Blob service REST version sent with every request
const API_VERSION: &str = "2021-08-06";

#[derive(Debug, Clone)]
pub struct AzureStoreConfig {
    /// e.g. `https://account.blob.core.windows.net/rosters`
    pub container_url: String,
    /// Shared access signature query string, with or without the leading `?`
    pub sas_token: String,
    pub blob_name: String,
    pub timeout: Duration,
}

pub struct AzureBlobStore {
    client: Client,
    blob_url: String,
    sas_token: String,
    blob_name: String,
}

impl AzureBlobStore {
    pub fn new(config: AzureStoreConfig) -> Result<Self, StoreError> {
        validate_blob_name(&config.blob_name)?;

        let container_url = config.container_url.trim().trim_end_matches('/');
        if !(container_url.starts_with("https://") || container_url.starts_with("http://")) {
            return Err(StoreError::Config(format!(
                "container URL '{}' must start with https://",
                container_url
            )));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        let blob_url = format!(
            "{}/{}",
            container_url,
            urlencoding::encode(&config.blob_name)
        );

        Ok(Self {
            client,
            blob_url,
            sas_token: config.sas_token.trim().trim_start_matches('?').to_string(),
            blob_name: config.blob_name,
        })
    }

    /// Public URL of the blob (without the SAS token)
    pub fn blob_url(&self) -> &str {
        &self.blob_url
    }

    fn signed_url(&self) -> String {
        if self.sas_token.is_empty() {
            self.blob_url.clone()
        } else {
            format!("{}?{}", self.blob_url, self.sas_token)
        }
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    fn blob_name(&self) -> &str {
        &self.blob_name
    }

    async fn put(&self, bytes: Vec<u8>) -> Result<String, StoreError> {
        let size = bytes.len();
        let response = self
            .client
            .put(self.signed_url())
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-version", API_VERSION)
            .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await?;

        check_status(response).await?;

        log::info!("Uploaded {} bytes to {}", size, self.blob_url());
        Ok(self.blob_url().to_string())
    }

    async fn get(&self) -> Result<Vec<u8>, StoreError> {
        let response = self
            .client
            .get(self.signed_url())
            .header("x-ms-version", API_VERSION)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                name: self.blob_name.clone(),
            });
        }

        let response = check_status(response).await?;
        let bytes = response.bytes().await?;

        log::debug!("Downloaded {} bytes from {}", bytes.len(), self.blob_url);
        Ok(bytes.to_vec())
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(container_url: &str, sas_token: &str) -> AzureStoreConfig {
        AzureStoreConfig {
            container_url: container_url.to_string(),
            sas_token: sas_token.to_string(),
            blob_name: "uploaded file.xlsx".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_blob_url_encodes_name_and_hides_token() {
        let store = AzureBlobStore::new(config(
            "https://acct.blob.core.windows.net/rosters/",
            "?sv=2021&sig=abc",
        ))
        .unwrap();

        assert_eq!(
            store.blob_url(),
            "https://acct.blob.core.windows.net/rosters/uploaded%20file.xlsx"
        );
        assert_eq!(
            store.signed_url(),
            "https://acct.blob.core.windows.net/rosters/uploaded%20file.xlsx?sv=2021&sig=abc"
        );
    }

    #[test]
    fn test_empty_token_means_unsigned_url() {
        let store =
            AzureBlobStore::new(config("https://acct.blob.core.windows.net/rosters", "")).unwrap();
        assert_eq!(store.signed_url(), store.blob_url());
    }

    #[test]
    fn test_rejects_non_http_container() {
        let result = AzureBlobStore::new(config("acct/rosters", "sig=1"));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
