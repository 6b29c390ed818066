//! File-backed store.
//!
//! Each key is a `<key>.json` file under the store directory, by default
//! `~/.config/card-studio/`. Writes go to a temp file in the same directory
//! which is then renamed over the target, so a crash never leaves a torn
//! snapshot behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::store::{KeyValueStore, entry_cost};

/// Application directory name under the platform config directory.
const APP_DIR: &str = "card-studio";

/// Extension of every entry file.
const ENTRY_EXT: &str = "json";

/// Default quota, matching the usual browser local-storage allowance.
pub const DEFAULT_QUOTA: usize = 5_000_000;

/// Key-value store persisted as one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    /// Opens a store in `dir` with the [`DEFAULT_QUOTA`], creating the
    /// directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            quota: Some(DEFAULT_QUOTA),
        })
    }

    /// Replaces the quota; `None` disables it.
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    /// Store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{ENTRY_EXT}"))
    }

    /// Characters used by every entry except `skip_key`.
    fn usage_excluding(&self, skip_key: &str) -> Result<usize, StorageError> {
        let mut used = 0;
        for entry in std::fs::read_dir(&self.dir)?.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != ENTRY_EXT) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if key == skip_key {
                continue;
            }
            let value = std::fs::read_to_string(&path)?;
            used += entry_cost(key, &value);
        }
        Ok(used)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.entry_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.usage_excluding(key)? + entry_cost(key, value);
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        let path = self.entry_path(key);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(key, bytes = value.len(), "wrote {:?}", path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Returns the default store directory.
pub fn default_location() -> Option<PathBuf> {
    config_dir().map(|d| d.join(APP_DIR))
}

/// Returns the platform config directory.
fn config_dir() -> Option<PathBuf> {
    resolve_config_dir(|name| std::env::var(name).ok())
}

/// `%APPDATA%` on Windows and `$XDG_CONFIG_HOME` elsewhere, falling back to
/// `~/.config`. Empty variables count as unset.
fn resolve_config_dir(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let var = |name: &str| lookup(name).filter(|value| !value.is_empty());
    let platform_var = if cfg!(windows) {
        "APPDATA"
    } else {
        "XDG_CONFIG_HOME"
    };
    var(platform_var)
        .map(PathBuf::from)
        .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".config")))
}
