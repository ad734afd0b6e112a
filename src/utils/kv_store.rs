use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Minimal string key-value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Stores all keys in a single JSON object file.
pub struct FileKvStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileKvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Read the whole map; a missing or corrupt file reads as empty
    fn read_all(&self) -> HashMap<String, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "State file missing, starting empty");
                return HashMap::new();
            }
            Err(e) => {
                warn!(path = ?self.path, ?e, "Failed to read state file");
                return HashMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = ?self.path, ?e, "State file is not valid JSON, ignoring it");
                HashMap::new()
            }
        }
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut map = self.read_all();
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&map)?;
        debug!(path = ?self.path, key, content_size = content.len(), "Writing state file");
        fs::write(&self.path, content)
    }
}

/// Process-local store, used in tests and when no state file is wanted.
#[derive(Default)]
pub struct MemoryKvStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut map = self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = FileKvStore::new(&path);
        assert_eq!(store.get("page"), None);
        store.set("page", "research").unwrap();
        store.set("other", "value").unwrap();

        let reopened = FileKvStore::new(&path);
        assert_eq!(reopened.get("page").as_deref(), Some("research"));
        assert_eq!(reopened.get("other").as_deref(), Some("value"));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        let store = FileKvStore::new(&path);
        assert_eq!(store.get("page"), None);

        store.set("page", "about").unwrap();
        assert_eq!(store.get("page").as_deref(), Some("about"));
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryKvStore::new();
        store.set("page", "home").unwrap();
        store.set("page", "contact").unwrap();
        assert_eq!(store.get("page").as_deref(), Some("contact"));
    }
}
