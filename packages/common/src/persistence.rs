use crate::{CommonError, CommonResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Storage abstraction for loading and saving JSON documents
///
/// The editor never touches the disk directly. Pages and projects are
/// serialized to JSON objects and handed to an implementation of this trait.
pub trait Persistence: Send + Sync {
    /// Load the JSON object stored at `path`
    fn load(&self, path: &Path) -> CommonResult<Value>;

    /// Store `value` at `path`, replacing any previous content
    fn save(&self, path: &Path, value: &Value) -> CommonResult<()>;

    /// Check if something is stored at `path`
    fn exists(&self, path: &Path) -> bool;
}

/// Pretty-printed JSON files rooted at a directory
pub struct JsonFilePersistence {
    root: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self, path: &Path) -> CommonResult<Value> {
        let full = self.resolve(path);
        if !full.exists() {
            return Err(CommonError::NotFound(full));
        }

        debug!(path = %full.display(), "Loading JSON document");
        let content = std::fs::read_to_string(&full)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, path: &Path, value: &Value) -> CommonResult<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!(path = %full.display(), "Saving JSON document");
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(&full, content)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }
}

/// In-memory persistence for testing
#[derive(Default)]
pub struct MemoryPersistence {
    files: Mutex<HashMap<PathBuf, Value>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, value: Value) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), value);
        }
    }

    pub fn get(&self, path: &Path) -> Option<Value> {
        self.files.lock().ok()?.get(path).cloned()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self, path: &Path) -> CommonResult<Value> {
        self.get(path)
            .ok_or_else(|| CommonError::NotFound(path.to_path_buf()))
    }

    fn save(&self, path: &Path, value: &Value) -> CommonResult<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| CommonError::Generic("memory persistence poisoned".to_string()))?;
        files.insert(path.to_path_buf(), value.clone());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryPersistence::new();
        let path = Path::new("pages/home.json");

        assert!(!store.exists(path));
        store.save(path, &json!({ "id": "home" })).unwrap();
        assert!(store.exists(path));
        assert_eq!(store.load(path).unwrap(), json!({ "id": "home" }));
    }

    #[test]
    fn test_memory_missing_file() {
        let store = MemoryPersistence::new();
        let err = store.load(Path::new("missing.json")).unwrap_err();
        assert!(matches!(err, CommonError::NotFound(_)));
    }

    #[test]
    fn test_json_files_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePersistence::new(dir.path());
        let path = Path::new("nested/page.json");

        store.save(path, &json!({ "name": "Page" })).unwrap();

        assert!(dir.path().join("nested/page.json").exists());
        assert_eq!(store.load(path).unwrap()["name"], "Page");
    }
}
