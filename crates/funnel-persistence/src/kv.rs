//! Admin session flag stores
//!
//! The flag is a single boolean persisted under a fixed key, mirroring the
//! browser-local store the admin panel originally leaned on. Two backends:
//! an in-memory map for tests and default runs, and a JSON file that
//! survives restarts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use funnel_core::{AdminSessionStore, Result};

use crate::PersistenceError;

/// In-memory flag store (default)
pub struct MemoryAdminSessionStore {
    key: String,
    values: RwLock<HashMap<String, String>>,
}

impl MemoryAdminSessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AdminSessionStore for MemoryAdminSessionStore {
    async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.values.read().get(&self.key).map(String::as_str) == Some("true"))
    }

    async fn set_authenticated(&self) -> Result<()> {
        self.values
            .write()
            .insert(self.key.clone(), "true".to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.values.write().remove(&self.key);
        Ok(())
    }
}

/// JSON-file flag store
///
/// The whole map is rewritten on every change; the file holds a handful of
/// keys at most, so durability wins over write amplification here.
pub struct FileAdminSessionStore {
    key: String,
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileAdminSessionStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| PersistenceError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            serde_json::from_str(&content)
                .map_err(|e| PersistenceError::Serialization(e.to_string()))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            key: key.into(),
            path,
            values: RwLock::new(values),
        })
    }

    fn flush(&self) -> Result<()> {
        let snapshot = self.values.read().clone();
        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| PersistenceError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[async_trait]
impl AdminSessionStore for FileAdminSessionStore {
    async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.values.read().get(&self.key).map(String::as_str) == Some("true"))
    }

    async fn set_authenticated(&self) -> Result<()> {
        self.values
            .write()
            .insert(self.key.clone(), "true".to_string());
        self.flush()
    }

    async fn clear(&self) -> Result<()> {
        self.values.write().remove(&self.key);
        self.flush()
    }
}
