//! Key-value persistence for session progress and preferences.
//!
//! The front end supplies a [`KeyValueStore`]. [`ProgressStore`] wraps it
//! with best-effort semantics: failures are logged and never returned.

use crate::error::StoreError;
use crate::session::{codec, SessionState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key holding the session snapshot.
pub const PROGRESS_KEY: &str = "progress_v1";

/// Key holding the post-answer popup preference (`"true"` / `"false"`).
pub const POPUP_KEY: &str = "showPopup";

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory store (for testing and as a fallback).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Best-effort progress persistence on top of a [`KeyValueStore`].
pub struct ProgressStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Write a snapshot. Errors are logged and dropped.
    pub fn save(&self, state: &SessionState, dataset_size: usize) {
        let raw = match codec::encode(state, dataset_size) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "could not encode progress");
                return;
            }
        };
        if let Err(err) = self.store.set(PROGRESS_KEY, &raw) {
            tracing::warn!(%err, "could not save progress");
        }
    }

    /// Read a compatible snapshot, or `None` when absent, corrupt or stale.
    pub fn load(&self, dataset_size: usize) -> Option<SessionState> {
        let raw = match self.store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(%err, "could not read progress");
                return None;
            }
        };

        match codec::decode(&raw, dataset_size) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::info!(%err, "discarding saved progress");
                None
            }
        }
    }

    /// Remove the snapshot. Errors are logged and dropped.
    pub fn clear(&self) {
        if let Err(err) = self.store.remove(PROGRESS_KEY) {
            tracing::warn!(%err, "could not clear progress");
        }
    }

    /// Whether the post-answer popup is enabled. Defaults to on.
    pub fn popup_enabled(&self) -> bool {
        match self.store.get(POPUP_KEY) {
            Ok(Some(value)) => match value.as_str() {
                "true" => true,
                "false" => false,
                _ => true,
            },
            Ok(None) => true,
            Err(err) => {
                tracing::warn!(%err, "could not read popup preference");
                true
            }
        }
    }

    pub fn set_popup_enabled(&self, enabled: bool) {
        if let Err(err) = self.store.set(POPUP_KEY, if enabled { "true" } else { "false" }) {
            tracing::warn!(%err, "could not save popup preference");
        }
    }
}
