//! Durable key/value storage for the persisted auth session.
//!
//! The auth store is the only writer. Backends are picked from
//! [`StorageBackend`](crate::config::StorageBackend) at startup.

pub mod encrypted_file;
pub mod keychain;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::ApiError;

pub use encrypted_file::EncryptedFileStorage;
pub use keychain::KeyringStorage;

pub trait DurableStorage: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written or was removed
    fn get(&self, key: &str) -> Result<Option<String>, ApiError>;

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), ApiError>;
}

/// Process-lifetime storage, used for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, ApiError> {
        self.entries
            .lock()
            .map_err(|e| ApiError::Storage(format!("storage lock poisoned: {}", e)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().map(|entries| entries.contains_key(key)).unwrap_or(false)
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
