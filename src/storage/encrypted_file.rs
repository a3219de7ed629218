use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use argon2::Argon2;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use log::warn;
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::DurableStorage;
use crate::api::ApiError;

const STORE_VERSION: u8 = 1;
const STORE_FILE: &str = "session.enc";

#[derive(Serialize, Deserialize, Clone)]
struct EncryptedValue {
    nonce: String,      // base64
    ciphertext: String, // base64
}

#[derive(Serialize, Deserialize)]
struct SessionFile {
    version: u8,
    salt: String, // base64, persisted so the derived key survives restarts
    entries: HashMap<String, EncryptedValue>,
}

impl SessionFile {
    fn empty(salt: String) -> Self {
        Self {
            version: STORE_VERSION,
            salt,
            entries: HashMap::new(),
        }
    }
}

/// JSON file whose values are AES-256-GCM encrypted with a machine-bound key.
///
/// A file that no longer parses, or whose salt is unusable, is replaced by
/// an empty one on open: the session it held is lost, the app still starts.
pub struct EncryptedFileStorage {
    path: PathBuf,
    salt: String,
    key: [u8; 32],
    // serialises read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl EncryptedFileStorage {
    /// Open (or create) the session file inside `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self, ApiError> {
        Self::open_with_secret(data_dir, &machine_secret())
    }

    /// Same as [`open`](Self::open) but with an explicit key secret
    pub fn open_with_secret(data_dir: &Path, secret: &str) -> Result<Self, ApiError> {
        let path = data_dir.join(STORE_FILE);

        let existing = read_session_file(&path)?
            .and_then(|file| match derive_key(secret, &file.salt) {
                Ok(key) => Some((file.salt, key)),
                Err(e) => {
                    warn!("Session file {} has an unusable salt ({}), starting over", path.display(), e);
                    None
                }
            });

        let (salt, key) = match existing {
            Some(found) => found,
            None => {
                // The salt must hit disk before any value is encrypted with its key
                let salt = BASE64.encode(random_bytes::<16>());
                let key = derive_key(secret, &salt)?;
                write_session_file(&path, &SessionFile::empty(salt.clone()))?;
                (salt, key)
            }
        };

        Ok(Self {
            path,
            salt,
            key,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cipher(&self) -> Result<Aes256Gcm, ApiError> {
        Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| ApiError::Storage(format!("Failed to create cipher: {}", e)))
    }

    fn encrypt(&self, value: &str) -> Result<EncryptedValue, ApiError> {
        let nonce_bytes = random_bytes::<12>();

        let ciphertext = self
            .cipher()?
            .encrypt(Nonce::from_slice(&nonce_bytes), value.as_bytes())?;

        Ok(EncryptedValue {
            nonce: BASE64.encode(nonce_bytes),
            ciphertext: BASE64.encode(ciphertext),
        })
    }

    fn decrypt(&self, value: &EncryptedValue) -> Result<String, ApiError> {
        let nonce_bytes = BASE64
            .decode(&value.nonce)
            .map_err(|e| ApiError::Storage(format!("Invalid nonce: {}", e)))?;
        if nonce_bytes.len() != 12 {
            return Err(ApiError::Storage("Invalid nonce length".to_string()));
        }
        let ciphertext = BASE64
            .decode(&value.ciphertext)
            .map_err(|e| ApiError::Storage(format!("Invalid ciphertext: {}", e)))?;

        let plaintext = self
            .cipher()?
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())?;

        String::from_utf8(plaintext).map_err(|e| ApiError::Storage(format!("Invalid UTF-8: {}", e)))
    }

    fn update<F>(&self, edit: F) -> Result<(), ApiError>
    where
        F: FnOnce(&mut SessionFile),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| ApiError::Storage(format!("storage lock poisoned: {}", e)))?;

        // A file damaged since open is rebuilt around our own salt
        let mut file = read_session_file(&self.path)?
            .unwrap_or_else(|| SessionFile::empty(self.salt.clone()));
        edit(&mut file);
        write_session_file(&self.path, &file)
    }
}

impl DurableStorage for EncryptedFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let Some(file) = read_session_file(&self.path)? else {
            return Ok(None);
        };
        file.entries.get(key).map(|v| self.decrypt(v)).transpose()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let encrypted = self.encrypt(value)?;
        self.update(|file| {
            file.entries.insert(key.to_string(), encrypted);
        })
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.update(|file| {
            file.entries.remove(key);
        })
    }
}

/// `Ok(None)` for a missing or unparseable file; only I/O failures are errors
fn read_session_file(path: &Path) -> Result<Option<SessionFile>, ApiError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ApiError::Storage(format!("Failed to read {}: {}", path.display(), e))),
    };

    match serde_json::from_slice(&data) {
        Ok(file) => Ok(Some(file)),
        Err(e) => {
            warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Write through a sibling temp file so a crash never leaves half a session file
fn write_session_file(path: &Path, file: &SessionFile) -> Result<(), ApiError> {
    let dir = path
        .parent()
        .ok_or_else(|| ApiError::Storage(format!("{} has no parent directory", path.display())))?;
    fs::create_dir_all(dir)
        .map_err(|e| ApiError::Storage(format!("Cannot create {}: {}", dir.display(), e)))?;

    let staging = path.with_extension("enc.tmp");
    let json = serde_json::to_vec_pretty(file)?;
    fs::write(&staging, json)
        .and_then(|_| fs::rename(&staging, path))
        .map_err(|e| ApiError::Storage(format!("Cannot write {}: {}", path.display(), e)))
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Binds the session key to this host and OS user, so a copied file is useless elsewhere
fn machine_secret() -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_default();
    let user = ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .unwrap_or_default();

    format!("trade-journal-session:{}:{}", host, user)
}

/// Argon2id (default parameters) over the machine secret and the file's salt
fn derive_key(secret: &str, salt_b64: &str) -> Result<[u8; 32], ApiError> {
    let salt = BASE64
        .decode(salt_b64)
        .map_err(|e| ApiError::Storage(format!("Invalid salt: {}", e)))?;

    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(secret.as_bytes(), &salt, &mut key)
        .map_err(|e| ApiError::Storage(format!("Key derivation failed: {}", e)))?;

    Ok(key)
}
