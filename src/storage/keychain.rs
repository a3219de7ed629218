use keyring::Entry;

use super::DurableStorage;
use crate::api::ApiError;

const SERVICE_NAME: &str = "trade-journal-client";

/// One keychain item per session key, all under a single service name.
/// Which vault backs it is up to the `keyring` crate for the current OS.
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, ApiError> {
        Entry::new(&self.service, key)
            .map_err(|e| ApiError::Storage(format!("Failed to create keyring entry: {}", e)))
    }
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DurableStorage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
