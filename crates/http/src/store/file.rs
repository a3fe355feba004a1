//! JSON file token store, the native counterpart of browser local storage

use super::{StoreError, TokenStore};
use directories::ProjectDirs;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name used inside the platform data directory
const STORAGE_FILE: &str = "storage.json";

/// Token store persisted as a flat JSON object of string values
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Open a store at an explicit path. The file is not touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store in the platform data directory
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    /// Platform-specific location of the storage file
    pub fn default_path() -> PathBuf {
        match ProjectDirs::from("", "", "porter") {
            Some(dirs) => dirs.data_dir().join(STORAGE_FILE),
            None => {
                warn!("Failed to determine platform data directory, using current directory");
                PathBuf::from(".").join(STORAGE_FILE)
            }
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `value` under `key`, creating the file if needed
    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.persist(&entries)
    }

    /// Remove `key`, returning the previous value
    pub fn remove(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.load()?;
        let previous = match entries.remove(key) {
            Some(value) => Some(into_string(key, value)?),
            None => return Ok(None),
        };
        self.persist(&entries)?;
        Ok(previous)
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(StoreError::Corrupted(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(StoreError::Corrupted(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }

    fn persist(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;

        // Replace atomically
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.load()?.remove(key) {
            Some(value) => into_string(key, value).map(Some),
            None => Ok(None),
        }
    }
}

fn into_string(key: &str, value: Value) -> Result<String, StoreError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(StoreError::Corrupted(format!(
            "value for '{key}' is not a string: {other}"
        ))),
    }
}
