//! Progress and settings storage
//!
//! Features:
//! - String key/value backends (in-memory, browser LocalStorage)
//! - JSON progress record under a fixed key
//! - Failures are logged and swallowed at this boundary; the game keeps
//!   running with whatever it has in memory

use std::collections::HashMap;

use thiserror::Error;

use crate::sim::ProgressState;

/// Storage key for the progress record
pub const PROGRESS_KEY: &str = "apple_knight_progress";

/// Storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend is unavailable")]
    Unavailable,
    #[error("failed to encode or decode record: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
}

/// A string key/value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Volatile backend for tests and the native build
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// `window.localStorage` backend
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// None when the browser has storage disabled
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|_| StorageError::Unavailable)
    }
}

/// Typed access to the progress record
pub trait ProgressStore {
    fn save(&mut self, progress: &ProgressState) -> Result<(), StorageError>;
    fn load(&self) -> Result<Option<ProgressState>, StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

impl<S: KeyValueStore> ProgressStore for S {
    fn save(&mut self, progress: &ProgressState) -> Result<(), StorageError> {
        let json = serde_json::to_string(progress)?;
        self.set(PROGRESS_KEY, &json)
    }

    fn load(&self) -> Result<Option<ProgressState>, StorageError> {
        match self.get(PROGRESS_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.remove(PROGRESS_KEY)
    }
}

/// Logging wrapper that never lets a storage error reach the game
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
    high_score: u64,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            high_score: 0,
        }
    }

    /// Best score seen by this store so far
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Write the record; the stored high score only ever goes up.
    /// Returns false if the write failed.
    pub fn save(&mut self, progress: &ProgressState) -> bool {
        let mut record = progress.clone();
        record.record_high_score();
        record.high_score = record.high_score.max(self.high_score);
        self.high_score = record.high_score;

        match ProgressStore::save(&mut self.store, &record) {
            Ok(()) => {
                log::info!(
                    "Progress saved: level {}, score {}, {} collected",
                    record.level_index + 1,
                    record.score,
                    record.collected.len()
                );
                true
            }
            Err(e) => {
                log::error!("Failed to save progress: {}", e);
                false
            }
        }
    }

    /// Read the record; a missing or unreadable record is `None`
    pub fn load(&mut self) -> Option<ProgressState> {
        match ProgressStore::load(&self.store) {
            Ok(Some(progress)) => {
                log::info!(
                    "Loaded progress: level {}, score {}",
                    progress.level_index + 1,
                    progress.score
                );
                self.high_score = self.high_score.max(progress.high_score);
                Some(progress)
            }
            Ok(None) => {
                log::info!("No saved progress");
                None
            }
            Err(e) => {
                log::warn!("Ignoring unreadable progress: {}", e);
                None
            }
        }
    }

    /// Drop the stored record
    pub fn clear(&mut self) -> bool {
        match ProgressStore::clear(&mut self.store) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to clear progress: {}", e);
                false
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
