//! Durable, per-browser key/value storage behind the session store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "userRole";
pub const USER_ID_KEY: &str = "userId";

#[derive(Debug, Error)]
#[error("session storage failed: {0}")]
pub struct StorageError(String);

#[async_trait]
pub trait DurableStorage: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// The browser's server-side session record, addressed by its session cookie.
#[async_trait]
impl DurableStorage for tower_sessions::Session {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get::<String>(key)
            .await
            .map_err(|e| StorageError(e.to_string()))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.insert(key, value)
            .await
            .map_err(|e| StorageError(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        tower_sessions::Session::remove::<String>(self, key)
            .await
            .map(|_| ())
            .map_err(|e| StorageError(e.to_string()))
    }
}

/// In-process storage. Clones share the same map, like two tabs of one browser.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let storage = Self::new();
        if let Ok(mut map) = storage.entries.lock() {
            map.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        storage
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map(|map| map.is_empty()).unwrap_or(true)
    }
}

#[async_trait]
impl DurableStorage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .entries
            .lock()
            .map_err(|_| StorageError("memory storage poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| StorageError("memory storage poisoned".into()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| StorageError("memory storage poisoned".into()))?;
        map.remove(key);
        Ok(())
    }
}
