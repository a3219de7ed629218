use futures::future::BoxFuture;

use super::collection::{CachedResource, CollectionStore};
use crate::api::{ApiResult, JournalApi};
use crate::models::Strategy;

pub type StrategiesStore = CollectionStore<Strategy>;

impl CachedResource for Strategy {
    const KIND: &'static str = "strategies";

    fn id(&self) -> i64 {
        self.id
    }

    fn fetch_all<'a>(api: &'a dyn JournalApi, token: &'a str) -> BoxFuture<'a, ApiResult<Vec<Self>>> {
        Box::pin(async move { api.get_strategies(token).await })
    }
}

impl StrategiesStore {
    pub fn strategies(&self) -> Vec<Strategy> {
        self.items()
    }

    /// Names for the given ids, skipping ids that are not cached
    pub fn names_for(&self, ids: &[i64]) -> Vec<String> {
        ids.iter().filter_map(|id| self.get(*id)).map(|s| s.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;
    use crate::storage::MemoryStorage;
    use crate::stores::AuthStore;
    use crate::testing::{FakeApi, session, strategy};
    use std::sync::Arc;

    async fn signed_in_store() -> (Arc<FakeApi>, StrategiesStore) {
        let api = Arc::new(FakeApi::new());
        let auth = Arc::new(AuthStore::new(
            api.clone(),
            Arc::new(MemoryStorage::new()),
            Arc::new(HistoryNavigator::new()),
        ));
        auth.initialize();
        FakeApi::set(&api.auth, Ok(session("t1")));
        auth.login("a@b.com", "pw").await.unwrap();

        (api.clone(), StrategiesStore::new(api, auth))
    }

    #[tokio::test]
    async fn test_load_caches_strategies() {
        let (api, store) = signed_in_store().await;
        FakeApi::set(&api.strategies, Ok(vec![strategy(1, "Breakout"), strategy(2, "Pullback")]));

        store.load().await.unwrap();
        store.load().await.unwrap();

        assert_eq!(api.calls("get_strategies"), 1);
        assert_eq!(store.strategies().len(), 2);
    }

    #[tokio::test]
    async fn test_local_edits() {
        let (api, store) = signed_in_store().await;
        FakeApi::set(&api.strategies, Ok(vec![strategy(1, "Breakout")]));
        store.load().await.unwrap();

        store.add(strategy(2, "Pullback"));
        store.update(strategy(1, "Range Breakout"));
        assert_eq!(store.names_for(&[1, 2, 3]), vec!["Range Breakout", "Pullback"]);

        store.remove(1);
        assert_eq!(store.strategies(), vec![strategy(2, "Pullback")]);
    }
}
