//! JSON key-value persistence with failure containment
//!
//! [`Storage`] wraps any [`KeyValueStore`] and never lets a store failure reach
//! the caller: writes report `false`, reads fall back to the caller's default,
//! and the cause is logged.
//!
//! # Stores
//!
//! - [`MemoryStore`] - in-process map with an optional byte quota
//! - [`FileStore`] - a single JSON object file, written atomically

use crate::core::error::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A string-keyed store of text values
///
/// Methods take `&self`; stores synchronise internally.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store, optionally bounded by a byte quota
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    disabled: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys plus values exceed `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota_bytes: Some(bytes),
            ..Self::default()
        }
    }

    /// Makes every subsequent operation fail, like a browser with storage turned off
    pub fn disable(&self) {
        self.disabled
            .store(true, std::sync::atomic::Ordering::Relaxed);
    }

    fn check_enabled(&self) -> Result<(), StoreError> {
        if self.disabled.load(std::sync::atomic::Ordering::Relaxed) {
            Err(StoreError::Disabled)
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_enabled()?;
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_enabled()?;
        let mut items = self.lock();
        if let Some(limit) = self.quota_bytes {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.check_enabled()?;
        self.lock().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.check_enabled()?;
        self.lock().clear();
        Ok(())
    }
}

/// File-backed store holding every entry in one JSON object
///
/// Each write rewrites the whole file through a temporary file in the same
/// directory followed by a rename, so readers never see a partial file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at `<data dir>/<file_name>`, if the data directory is known
    pub fn in_data_dir(file_name: &str) -> Option<Self> {
        crate::utils::get_data_dir().map(|mut dir| {
            dir.push(file_name);
            Self::new(dir)
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(items)?;
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::StorageFull {
                StoreError::QuotaExceeded {
                    needed: json.len(),
                    limit: 0,
                }
            } else {
                StoreError::Io(e.error)
            }
        })?;
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut items = self.read_all()?;
        f(&mut items);
        self.write_all(&items)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.update(|items| {
            items.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(BTreeMap::clear)
    }
}

/// JSON encode/decode wrapper that contains every store failure
#[derive(Debug)]
pub struct Storage<S> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serializes `value` under `key`. Returns `false` if anything failed.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set_item(key, &json));
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error saving to storage (key {}): {}", key, e);
                false
            }
        }
    }

    /// Reads `key`, returning `default` when it is missing, empty or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_opt(key).unwrap_or(default)
    }

    /// Reads `key`, or `None` when there is no usable value
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.store.get_item(key) {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => return None,
            Err(e) => {
                tracing::error!("Error reading from storage (key {}): {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Error reading from storage (key {}): {}", key, e);
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.store.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error removing from storage (key {}): {}", key, e);
                false
            }
        }
    }

    pub fn clear(&self) -> bool {
        match self.store.clear() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error clearing storage: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_object() {
        let storage = Storage::new(MemoryStore::new());
        assert!(storage.set("k", &json!({"a": 1})));
        let value: Option<serde_json::Value> = storage.get("k", None);
        assert_eq!(value, Some(json!({"a": 1})));
    }

    #[test]
    fn test_missing_key_returns_default() {
        let storage = Storage::new(MemoryStore::new());
        assert_eq!(storage.get("missing", 42), 42);
        assert_eq!(storage.get_opt::<i32>("missing"), None);
    }

    #[test]
    fn test_corrupt_value_returns_default() {
        let store = MemoryStore::new();
        store.set_item("bad", "{not json").unwrap();
        let storage = Storage::new(store);
        assert_eq!(storage.get("bad", "fallback".to_string()), "fallback");
    }

    #[test]
    fn test_empty_text_returns_default() {
        let store = MemoryStore::new();
        store.set_item("empty", "").unwrap();
        let storage = Storage::new(store);
        assert_eq!(storage.get("empty", 7), 7);
    }

    #[test]
    fn test_quota_exceeded_fails_silently() {
        let storage = Storage::new(MemoryStore::with_quota(16));
        assert!(storage.set("a", &1));
        assert!(!storage.set("big", &"x".repeat(64)));
        assert_eq!(storage.get::<Option<String>>("big", None), None);
        // Overwriting an existing key only counts the new value
        assert!(storage.set("a", &2));
        assert_eq!(storage.get("a", 0), 2);
    }

    #[test]
    fn test_disabled_store_contained() {
        let storage = Storage::new(MemoryStore::new());
        assert!(storage.set("k", &true));
        storage.store().disable();
        assert!(!storage.set("k", &false));
        assert!(!storage.get("k", false));
        assert!(!storage.remove("k"));
        assert!(!storage.clear());
    }

    #[test]
    fn test_remove_and_clear() {
        let storage = Storage::new(MemoryStore::new());
        storage.set("a", &1);
        storage.set("b", &2);
        assert!(storage.remove("a"));
        assert_eq!(storage.get_opt::<i32>("a"), None);
        assert!(storage.clear());
        assert_eq!(storage.get_opt::<i32>("b"), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        let storage = Storage::new(FileStore::new(&path));

        assert!(storage.set("filters", &vec!["tools", "paint"]));
        assert!(storage.set("page_size", &20));
        assert!(path.exists());

        // A fresh store over the same file sees the data
        let reopened = Storage::new(FileStore::new(&path));
        let filters: Vec<String> = reopened.get("filters", Vec::new());
        assert_eq!(filters, vec!["tools", "paint"]);
        assert_eq!(reopened.get("page_size", 0), 20);

        assert!(reopened.remove("filters"));
        assert_eq!(reopened.get_opt::<Vec<String>>("filters"), None);
        assert!(reopened.clear());
        assert_eq!(reopened.get_opt::<i32>("page_size"), None);
    }

    #[test]
    fn test_file_store_corrupt_file_contained() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let storage = Storage::new(FileStore::new(&path));
        assert_eq!(storage.get("k", -1), -1);
        assert!(!storage.set("k", &1));
    }
}
