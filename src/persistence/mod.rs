//! Key-value persistence
//!
//! The game stores two things: the high score and the settings blob. Both go
//! through [`KeyValueStore`] so native builds and tests can use memory while
//! the browser build uses LocalStorage.

use std::collections::HashMap;

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

/// A write that did not land
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("write to {key} rejected: {reason}")]
    Rejected { key: String, reason: String },
}

/// Minimal string store keyed by a fixed namespace
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store; contents vanish with the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrites() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("2"));
    }
}
