//! Persistence backends for the stats record.
//!
//! Two storage protocols sit underneath the store:
//! - `KeyValueStore`: async, holds structured JSON values (the primary)
//! - `LocalStorage`: synchronous, holds strings (the fallback)
//!
//! Both are adapted to the single `StatsBackend` interface the store uses,
//! so either slot can be filled with any backend, including failing ones.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use super::UserStats;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid stored record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Durable async key-value store holding structured values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Synchronous string store.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// What the stats store persists through.
#[async_trait]
pub trait StatsBackend: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &'static str;
    async fn load(&self, key: &str) -> Result<Option<UserStats>, StoreError>;
    async fn save(&self, key: &str, stats: &UserStats) -> Result<(), StoreError>;
}

// ============================================================================
// Adapters
// ============================================================================

/// Stores the record as a structured value.
pub struct KeyValueBackend<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueBackend<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: KeyValueStore> StatsBackend for KeyValueBackend<S> {
    fn name(&self) -> &'static str {
        "key-value"
    }

    async fn load(&self, key: &str) -> Result<Option<UserStats>, StoreError> {
        match self.store.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, stats: &UserStats) -> Result<(), StoreError> {
        let value = serde_json::to_value(stats)?;
        self.store.set(key, value).await
    }
}

/// Stores the record as JSON text.
pub struct LocalStorageBackend<L> {
    storage: L,
}

impl<L: LocalStorage> LocalStorageBackend<L> {
    pub fn new(storage: L) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<L: LocalStorage> StatsBackend for LocalStorageBackend<L> {
    fn name(&self) -> &'static str {
        "local-storage"
    }

    async fn load(&self, key: &str) -> Result<Option<UserStats>, StoreError> {
        match self.storage.get_item(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, stats: &UserStats) -> Result<(), StoreError> {
        let text = serde_json::to_string(stats)?;
        self.storage.set_item(key, &text)
    }
}

// ============================================================================
// Concrete stores
// ============================================================================

/// Keys become file names, so keep them to a safe alphabet.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// One JSON document per key under a directory.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path(key)?;
        match tokio::fs::read(&path).await {
            Ok(contents) => Ok(Some(serde_json::from_slice(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let contents = serde_json::to_vec_pretty(&value)?;
        let temp = path.with_extension("json.tmp");
        tokio::fs::write(&temp, contents).await?;
        tokio::fs::rename(&temp, &path).await?;
        Ok(())
    }
}

/// One text file per key under a directory.
pub struct FileLocalStorage {
    dir: PathBuf,
}

impl FileLocalStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl LocalStorage for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path(key)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, value)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryLocalStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self
            .items
            .lock()
            .map_err(|_| StoreError::Unavailable("local storage lock poisoned".into()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| StoreError::Unavailable("local storage lock poisoned".into()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
