//! Preference storage.
//!
//! The controller never touches ambient storage directly; it is handed a
//! [`PreferenceStore`] at construction. Two implementations ship here:
//!
//! - [`MemoryStore`]: process-local map, used by tests and embedders.
//! - [`FileStore`]: a small JSON object on disk, by default in the
//!   platform data directory (see [`crate::config::StorageConfig`]).
//!
//! Reads never fail. Missing or unreadable data is reported as absent so
//! the caller falls back to its default.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::errors::{GenError, GenResult};

/// Key-value capability for durable user preferences.
pub trait PreferenceStore: Send + Sync {
    /// Read a value. `None` when the key is absent or storage is unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> GenResult<()>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> GenResult<()> {
        (**self).set(key, value)
    }
}

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> GenResult<()> {
        let mut values = self.values.write().map_err(|_| {
            GenError::StorageError(std::io::Error::other("preference map lock poisoned"))
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file preference store.
///
/// The whole file is rewritten on every `set`; it only ever holds a
/// handful of keys.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured (or platform default) location.
    pub fn from_config(config: &crate::config::StorageConfig) -> GenResult<Self> {
        config.resolve_path().map(Self::new).ok_or_else(|| {
            GenError::StorageError(std::io::Error::new(
                ErrorKind::NotFound,
                "Could not determine app data directory",
            ))
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> Option<BTreeMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "preference file unreadable");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(map) => Some(map),
            Err(e) => {
                debug!(
                    path = %self.path.display(),
                    error = %e,
                    "preference file corrupt, ignoring"
                );
                None
            }
        }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load_map()?.remove(key)
    }

    fn set(&self, key: &str, value: &str) -> GenResult<()> {
        let mut map = self.load_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let raw = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), key, "preference saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("pref-lang"), None);

        store.set("pref-lang", "en").expect("set should succeed");
        assert_eq!(store.get("pref-lang").as_deref(), Some("en"));

        store.set("pref-lang", "zh").expect("overwrite should succeed");
        assert_eq!(store.get("pref-lang").as_deref(), Some("zh"));
    }

    #[test]
    fn seeded_memory_store() {
        let store = MemoryStore::with_entry("pref-lang", "garbage");
        assert_eq!(store.get("pref-lang").as_deref(), Some("garbage"));
        assert_eq!(store.get("other"), None);
    }

    #[test]
    fn poisoned_memory_store_reports_storage_error() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let poisoner = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.values.write().expect("fresh lock");
            panic!("poison the preference map");
        })
        .join();

        let err = store.set("pref-lang", "en").expect_err("poisoned lock");
        match err {
            GenError::StorageError(io) => {
                assert_eq!(io.kind(), ErrorKind::Other);
                assert_eq!(io.to_string(), "preference map lock poisoned");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_reads_as_absent() {
        let store = FileStore::new("/nonexistent/mxtgen/prefs.json");
        assert_eq!(store.get("pref-lang"), None);
    }
}
