//! Configuration loading
//!
//! Settings come from a TOML file (`--config PATH`, or
//! `~/.config/roster-cli/config.toml` when present), then environment
//! variables override individual values. A `.env` file in the working
//! directory is loaded first.
//!
//! ```toml
//! [storage]
//! backend = "azure"
//! container_url = "https://account.blob.core.windows.net/rosters"
//! sas_token = "sv=...&sig=..."
//! blob_name = "uploaded_file.xlsx"
//! timeout_secs = 60
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::storage::{
    AzureBlobStore, AzureStoreConfig, BlobStore, DEFAULT_BLOB_NAME, LocalBlobStore,
    LocalStoreConfig, StoreError,
};

pub const ENV_BACKEND: &str = "ROSTER_STORAGE_BACKEND";
pub const ENV_ROOT: &str = "ROSTER_STORAGE_ROOT";
pub const ENV_BLOB_NAME: &str = "ROSTER_BLOB_NAME";
pub const ENV_CONTAINER_URL: &str = "AZURE_STORAGE_CONTAINER_URL";
pub const ENV_SAS_TOKEN: &str = "AZURE_STORAGE_SAS_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Directory for the local backend
    pub root: Option<PathBuf>,
    pub container_url: Option<String>,
    pub sas_token: Option<String>,
    pub blob_name: String,
    pub timeout_secs: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            root: None,
            container_url: None,
            sas_token: None,
            blob_name: DEFAULT_BLOB_NAME.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load `.env`, the config file and environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", env_file.display());
        }

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Override settings from variables returned by `lookup`; empty values are ignored
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let storage = &mut self.storage;

        if let Some(url) = get(ENV_CONTAINER_URL) {
            storage.container_url = Some(url);
            storage.backend = StorageBackend::Azure;
        }
        if let Some(token) = get(ENV_SAS_TOKEN) {
            storage.sas_token = Some(token);
        }
        if let Some(root) = get(ENV_ROOT) {
            storage.root = Some(PathBuf::from(root));
        }
        if let Some(name) = get(ENV_BLOB_NAME) {
            storage.blob_name = name;
        }

        // An explicit backend wins over the one implied by a container URL
        if let Some(backend) = get(ENV_BACKEND) {
            storage.backend = match backend.trim().to_lowercase().as_str() {
                "local" => StorageBackend::Local,
                "azure" => StorageBackend::Azure,
                other => bail!(
                    "Invalid {} '{}': expected 'local' or 'azure'",
                    ENV_BACKEND,
                    other
                ),
            };
        }

        Ok(())
    }
}

impl StorageSettings {
    /// Build the configured blob store
    pub fn build_store(&self) -> Result<Box<dyn BlobStore>, StoreError> {
        match self.backend {
            StorageBackend::Local => {
                let root = self.root.clone().unwrap_or_else(default_storage_root);
                log::debug!("Using local blob store at {}", root.display());

                let store = LocalBlobStore::new(LocalStoreConfig {
                    root,
                    blob_name: self.blob_name.clone(),
                })?;
                Ok(Box::new(store))
            }
            StorageBackend::Azure => {
                let container_url = self.container_url.clone().ok_or_else(|| {
                    StoreError::Config(format!(
                        "azure backend requires storage.container_url or {}",
                        ENV_CONTAINER_URL
                    ))
                })?;
                log::debug!("Using Azure blob store at {}", container_url);

                let store = AzureBlobStore::new(AzureStoreConfig {
                    container_url,
                    sas_token: self.sas_token.clone().unwrap_or_default(),
                    blob_name: self.blob_name.clone(),
                    timeout: Duration::from_secs(self.timeout_secs),
                })?;
                Ok(Box::new(store))
            }
        }
    }
}

/// `~/.config/roster-cli/config.toml` (platform equivalent)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("roster-cli").join("config.toml"))
}

/// `~/.local/share/roster-cli/blobs` (platform equivalent)
fn default_storage_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roster-cli")
        .join("blobs")
}
