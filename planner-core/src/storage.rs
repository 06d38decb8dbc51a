//! Key/value storage the event store persists through.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{PlannerError, PlannerResult};

pub trait Storage: Send + Sync {
    /// Stored value for `key`, or `None` if nothing was ever written.
    fn get(&self, key: &str) -> PlannerResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> PlannerResult<()>;
}

/// Volatile storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Storage pre-seeded with one value.
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = MemoryStorage::new();
        if let Ok(mut values) = storage.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> PlannerResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| PlannerError::Storage(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PlannerResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| PlannerError::Storage(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> PlannerResult<Option<String>> {
        let path = self.path_for(key);

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temp file and rename, so a crash never leaves a
    /// half-written value behind.
    fn set(&self, key: &str, value: &str) -> PlannerResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let temp = self.dir.join(format!("{}.json.tmp", key));

        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}
