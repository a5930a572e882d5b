//! Browser LocalStorage backend

use super::{KeyValueStore, StorageError};

/// LocalStorage handle; absent storage (private mode, sandboxed iframe)
/// reads as empty and rejects writes
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress will not persist");
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}
