use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

pub const API_URL_VAR: &str = "TRADE_JOURNAL_API_URL";
pub const STORAGE_VAR: &str = "TRADE_JOURNAL_STORAGE";
pub const DATA_DIR_VAR: &str = "TRADE_JOURNAL_DATA_DIR";

/// Where the auth session is persisted between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Keyring,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "keyring" => Ok(StorageBackend::Keyring),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            storage: StorageBackend::File,
            data_dir: default_data_dir(),
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset. An unrecognised storage backend falls
    /// back to the default with a warning rather than failing startup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let base_url = get(API_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let storage = match get(STORAGE_VAR).map(|v| v.parse::<StorageBackend>()) {
            Some(Ok(backend)) => backend,
            Some(Err(e)) => {
                log::warn!("{}, using {:?}", e, defaults.storage);
                defaults.storage
            }
            None => defaults.storage,
        };

        let data_dir = get(DATA_DIR_VAR).map(PathBuf::from).unwrap_or(defaults.data_dir);

        Self {
            base_url,
            storage,
            data_dir,
        }
    }
}

fn default_data_dir() -> PathBuf {
    std::env::temp_dir().join("trade-journal")
}
