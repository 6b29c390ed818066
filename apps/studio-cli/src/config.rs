//! Studio configuration.
//!
//! Optional `config.json` in the data directory, overridden by command-line
//! options:
//!
//! ```json
//! { "endpoint": "https://generativelanguage.googleapis.com/v1beta/models",
//!   "shareBaseUrl": "http://localhost:3000/" }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use cardstudio_imagegen::DEFAULT_ENDPOINT;
use cardstudio_storage::StorageError;

/// File name of the optional config inside the data directory.
const CONFIG_FILE: &str = "config.json";

/// Page a share link points at when none is configured.
pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:3000/";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    endpoint: String,
    #[serde(default)]
    share_base_url: String,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// Directory holding the stored deck and settings.
    pub data_dir: PathBuf,
    /// Models endpoint of the image API.
    pub endpoint: String,
    /// Page that share links point at.
    pub share_base_url: String,
}

impl StudioConfig {
    /// Loads the config for `data_dir`, or the default data directory.
    pub fn load(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => cardstudio_storage::file::default_location()
                .ok_or(StorageError::NoStorageDir)
                .context("pass --data-dir")?,
        };
        Self::load_from(&data_dir)
    }

    fn load_from(data_dir: &Path) -> anyhow::Result<Self> {
        let mut config = StudioConfig {
            data_dir: data_dir.to_path_buf(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
        };

        let path = data_dir.join(CONFIG_FILE);
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            match serde_json::from_str::<ConfigFile>(&content) {
                Ok(file) => {
                    if !file.endpoint.is_empty() {
                        config.endpoint = file.endpoint;
                    }
                    if !file.share_base_url.is_empty() {
                        config.share_base_url = file.share_base_url;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse studio config, using defaults"
                    );
                }
            }
        }

        Ok(config)
    }

    /// Applies a command-line endpoint override.
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }
}
