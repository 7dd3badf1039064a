//! Key-value persistence tiers
//!
//! All application state lives in flat key-value stores holding JSON strings,
//! mirroring the two storage tiers the app is written against:
//! - [`FileStore`]: durable, one JSON object per file, write-through on set
//! - [`MemoryStore`]: ephemeral, gone when the process ends
//!
//! A corrupted store file is recovered by treating it as empty rather than
//! failing to open; a value that no longer deserializes behaves as absent.

use crate::storage::error::StorageResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Well-known keys in the persisted layout
pub mod keys {
    /// Full list of user records
    pub const USERS: &str = "users";
    /// Session record for the active login
    pub const SESSION: &str = "session";
    /// Legacy mirror of the logged-in user, kept in sync by the ledger
    pub const CURRENT_USER: &str = "current_user";
}

/// The storage seam all components are written against
pub trait KvStore: Send {
    /// Get the raw string value for a key
    fn get(&self, key: &str) -> Option<String>;
    /// Set a key, overwriting any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Remove a key (no-op if absent)
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// Shared handle to a storage tier
pub type StoreHandle = Arc<Mutex<dyn KvStore>>;

/// Wrap a store in a shareable handle
pub fn handle(store: impl KvStore + 'static) -> StoreHandle {
    Arc::new(Mutex::new(store))
}

/// Get and deserialize a value; a missing or unparseable value is absent
pub fn get_json<T: DeserializeOwned>(store: &StoreHandle, key: &str) -> Option<T> {
    let guard = lock(store);
    let raw = guard.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Discarding unparseable value for key {:?}: {}", key, e);
            None
        }
    }
}

/// Serialize and set a value
pub fn set_json<T: Serialize>(store: &StoreHandle, key: &str, value: &T) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    lock(store).set(key, &raw)
}

/// Remove a key from a tier
pub fn remove(store: &StoreHandle, key: &str) -> StorageResult<()> {
    lock(store).remove(key)
}

fn lock(store: &StoreHandle) -> std::sync::MutexGuard<'_, dyn KvStore + 'static> {
    // Single logical writer; a poisoned lock just means a panic elsewhere,
    // the data itself is still usable.
    store.lock().unwrap_or_else(|e| e.into_inner())
}

/// In-memory tier (the per-process "session storage")
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Durable tier backed by a single JSON file
///
/// The whole map is loaded on open and rewritten on every mutation. That is
/// the contract the rest of the app is built on: storage is local, small,
/// and has exactly one writer.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileStore {
    /// Open a store file, creating parent directories as needed
    ///
    /// A file that exists but does not parse is logged and treated as empty;
    /// corruption is never fatal to the application.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(
                        "Store file {:?} is unreadable ({}), starting empty",
                        path,
                        e
                    );
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Ok(Self { path, values })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
