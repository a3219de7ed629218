pub mod api;
pub mod config;
pub mod guards;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod storage;
pub mod stores;

#[cfg(test)]
mod testing;

use anyhow::Context;
use log::info;
use std::sync::Arc;

use api::{HttpApiClient, JournalApi};
use config::{ClientConfig, StorageBackend};
use guards::{ProtectedGuard, PublicGuard};
use models::TradeFilters;
use navigation::Navigator;
use pages::HomeData;
use storage::{DurableStorage, EncryptedFileStorage, KeyringStorage, MemoryStorage};
use stores::{AccountsStore, AuthStore, StrategiesStore};

/// Explicitly constructed application container.
///
/// Owns one instance of each store; everything is shared through `Arc`
/// so UI code can hold on to the pieces it needs.
pub struct JournalApp {
    pub config: ClientConfig,
    pub api: Arc<dyn JournalApi>,
    pub auth: Arc<AuthStore>,
    pub accounts: Arc<AccountsStore>,
    pub strategies: Arc<StrategiesStore>,
    /// Both guards wait on auth readiness: call [`start`](Self::start) before
    /// running either, or `check` never returns.
    pub protected: ProtectedGuard,
    pub public: PublicGuard,
}

impl JournalApp {
    /// Wire the app against the HTTP backend named in `config`
    pub fn new(
        config: ClientConfig,
        storage: Arc<dyn DurableStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let api: Arc<dyn JournalApi> = Arc::new(HttpApiClient::from_config(&config));
        Self::with_api(config, api, storage, navigator)
    }

    /// Same as [`new`](Self::new) with the storage backend chosen by `config`
    pub fn from_config(config: ClientConfig, navigator: Arc<dyn Navigator>) -> anyhow::Result<Self> {
        let storage = open_storage(&config)?;
        Ok(Self::new(config, storage, navigator))
    }

    pub fn with_api(
        config: ClientConfig,
        api: Arc<dyn JournalApi>,
        storage: Arc<dyn DurableStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let auth = Arc::new(AuthStore::new(api.clone(), storage, navigator.clone()));
        let accounts = Arc::new(AccountsStore::new(api.clone(), auth.clone()));
        let strategies = Arc::new(StrategiesStore::new(api.clone(), auth.clone()));

        Self {
            protected: ProtectedGuard::new(auth.clone(), navigator.clone()),
            public: PublicGuard::new(auth.clone(), navigator),
            config,
            api,
            auth,
            accounts,
            strategies,
        }
    }

    /// Restore the persisted session; guards wait for this to finish
    pub fn start(&self) {
        info!("Starting journal client against {}", self.config.base_url);
        self.auth.initialize();
    }

    /// Drop cached data and end the session
    pub fn logout(&self) {
        self.accounts.clear();
        self.strategies.clear();
        self.auth.logout();
    }

    pub async fn load_home(&self) -> HomeData {
        pages::load_home(
            self.api.as_ref(),
            &self.auth,
            &self.accounts,
            &self.strategies,
            &TradeFilters::default(),
        )
        .await
    }
}

/// Open the session storage selected by `config.storage`
pub fn open_storage(config: &ClientConfig) -> anyhow::Result<Arc<dyn DurableStorage>> {
    let storage: Arc<dyn DurableStorage> = match config.storage {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::File => Arc::new(
            EncryptedFileStorage::open(&config.data_dir).with_context(|| {
                format!("Failed to open session storage in {}", config.data_dir.display())
            })?,
        ),
        StorageBackend::Keyring => Arc::new(KeyringStorage::new()),
    };
    Ok(storage)
}
