//! Desktop platform implementations
//!
//! File-backed settings storage and the system clock.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::config::StorageConfig;
use crate::ports::outbound::{ClockPort, ConfirmationPort, StorageProvider};
use crate::state::Platform;

/// System clock - uses real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Desktop storage provider with file-based persistence
///
/// Stores key-value pairs in a JSON file at:
/// - Linux: ~/.config/textquest/player/settings.json
/// - macOS: ~/Library/Application Support/io.textquest.player/settings.json
/// - Windows: C:\Users\<User>\AppData\Roaming\textquest\player\config\settings.json
#[derive(Clone)]
pub struct DesktopStorageProvider {
    storage_path: PathBuf,
    /// In-memory cache of stored values
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for DesktopStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopStorageProvider {
    /// Storage in the platform config directory
    pub fn new() -> Self {
        let storage_path = match ProjectDirs::from("io", "textquest", "player") {
            Some(dirs) => dirs.config_dir().join("settings.json"),
            // Fallback to current directory if project dirs unavailable
            None => PathBuf::from("textquest_settings.json"),
        };
        Self::with_path(storage_path)
    }

    /// Storage at an explicit file path. Existing data is loaded eagerly.
    pub fn with_path(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();
        let cache = read_storage_file(&storage_path);

        tracing::debug!(path = %storage_path.display(), entries = cache.len(), "Desktop storage initialized");

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Persist the cache to disk
    fn persist(&self) {
        if let Some(parent) = self.storage_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::error!(error = %e, "Failed to create storage directory");
                return;
            }
        }

        let data = match self.cache.read() {
            Ok(guard) => serde_json::to_string_pretty(&*guard),
            Err(e) => {
                tracing::error!(error = %e, "Failed to acquire read lock for storage");
                return;
            }
        };

        match data {
            Ok(data) => {
                if let Err(e) = fs::write(&self.storage_path, data) {
                    tracing::error!(error = %e, path = %self.storage_path.display(), "Failed to write storage file");
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to serialize storage data"),
        }
    }
}

fn read_storage_file(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse storage file, starting empty");
                HashMap::new()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read storage file, starting empty");
            HashMap::new()
        }
    }
}

impl StorageProvider for DesktopStorageProvider {
    fn save(&self, key: &str, value: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                if guard.get(key).map(String::as_str) == Some(value) {
                    return;
                }
                guard.insert(key.to_string(), value.to_string());
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => tracing::error!(error = %e, "Failed to acquire write lock for storage"),
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to acquire read lock for storage");
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                if guard.remove(key).is_none() {
                    return;
                }
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => tracing::error!(error = %e, "Failed to acquire write lock for storage"),
        }
    }
}

/// Create the desktop platform: file storage, system clock and the given
/// confirmation prompt.
pub fn create_platform<P>(storage: &StorageConfig, confirmation: P) -> Platform
where
    P: ConfirmationPort + 'static,
{
    let provider = match &storage.path {
        Some(path) => DesktopStorageProvider::with_path(path.clone()),
        None => DesktopStorageProvider::new(),
    };
    Platform::new(provider, SystemClock, confirmation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_a_new_provider_on_the_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let storage = DesktopStorageProvider::with_path(&path);
        storage.save("textquest_master_volume", "55");
        storage.save("textquest_session_id", "42");
        storage.remove("textquest_session_id");

        let reopened = DesktopStorageProvider::with_path(&path);
        assert_eq!(
            reopened.load("textquest_master_volume").as_deref(),
            Some("55")
        );
        assert_eq!(reopened.load("textquest_session_id"), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let storage = DesktopStorageProvider::with_path(&path);
        assert_eq!(storage.load("anything"), None);

        storage.save("key", "value");
        let reopened = DesktopStorageProvider::with_path(&path);
        assert_eq!(reopened.load("key").as_deref(), Some("value"));
    }
}
