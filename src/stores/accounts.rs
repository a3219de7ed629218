use futures::future::BoxFuture;

use super::collection::{CachedResource, CollectionStore};
use crate::api::{ApiResult, JournalApi};
use crate::models::Account;

pub type AccountsStore = CollectionStore<Account>;

impl CachedResource for Account {
    const KIND: &'static str = "accounts";

    fn id(&self) -> i64 {
        self.id
    }

    fn fetch_all<'a>(api: &'a dyn JournalApi, token: &'a str) -> BoxFuture<'a, ApiResult<Vec<Self>>> {
        Box::pin(async move { api.get_accounts(token).await })
    }
}

impl AccountsStore {
    pub fn accounts(&self) -> Vec<Account> {
        self.items()
    }

    /// Accounts currently marked active, in cached order
    pub fn active_accounts(&self) -> Vec<Account> {
        self.items().into_iter().filter(|a| a.is_active).collect()
    }
}
