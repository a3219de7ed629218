use futures::future::BoxFuture;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::watch;

use super::auth::AuthStore;
use crate::api::error::NOT_AUTHENTICATED_MESSAGE;
use crate::api::{ApiError, ApiResult, JournalApi};

/// A backend collection that can be cached in a [`CollectionStore`]
pub trait CachedResource: Clone + Send + Sync + 'static {
    /// Plural name used in log lines
    const KIND: &'static str;

    fn id(&self) -> i64;

    fn fetch_all<'a>(api: &'a dyn JournalApi, token: &'a str) -> BoxFuture<'a, ApiResult<Vec<Self>>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

/// In-memory cache of one backend collection.
///
/// `load` fetches only while the cache is empty; `reload` always fetches.
/// `add`/`update`/`remove` edit the cached list locally and assume the
/// caller already persisted the change server-side.
pub struct CollectionStore<T: CachedResource> {
    api: Arc<dyn JournalApi>,
    auth: Arc<AuthStore>,
    state: watch::Sender<ListState<T>>,
}

impl<T: CachedResource> CollectionStore<T> {
    pub fn new(api: Arc<dyn JournalApi>, auth: Arc<AuthStore>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self { api, auth, state }
    }

    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn snapshot(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.state.borrow().items.iter().find(|item| item.id() == id).cloned()
    }

    pub async fn load(&self) -> ApiResult<()> {
        self.fetch(false).await
    }

    pub async fn reload(&self) -> ApiResult<()> {
        self.fetch(true).await
    }

    async fn fetch(&self, force: bool) -> ApiResult<()> {
        let cached = !self.state.borrow().items.is_empty();
        if cached && !force {
            debug!("{} already cached, skipping fetch", T::KIND);
            return Ok(());
        }

        let Some(token) = self.auth.token() else {
            self.state.send_modify(|state| {
                state.error = Some(NOT_AUTHENTICATED_MESSAGE.to_string());
            });
            return Err(ApiError::NotAuthenticated);
        };

        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        // Overlapping fetches are not ordered; whichever finishes last wins.
        let result = T::fetch_all(self.api.as_ref(), &token).await;

        match result {
            Ok(items) => {
                debug!("Loaded {} {}", items.len(), T::KIND);
                self.state.send_modify(|state| {
                    state.items = items;
                    state.is_loading = false;
                });
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load {}: {}", T::KIND, e);
                let message = e.to_string();
                self.state.send_modify(|state| {
                    state.items.clear();
                    state.error = Some(message);
                    state.is_loading = false;
                });
                Err(e)
            }
        }
    }

    pub fn add(&self, item: T) {
        self.state.send_modify(|state| state.items.push(item));
    }

    /// Replace the cached entry with the same id; unknown ids are ignored
    pub fn update(&self, item: T) {
        self.state.send_if_modified(|state| {
            match state.items.iter_mut().find(|existing| existing.id() == item.id()) {
                Some(existing) => {
                    *existing = item;
                    true
                }
                None => false,
            }
        });
    }

    pub fn remove(&self, id: i64) {
        self.state.send_if_modified(|state| {
            let before = state.items.len();
            state.items.retain(|item| item.id() != id);
            state.items.len() != before
        });
    }

    pub fn clear(&self) {
        self.state.send_replace(ListState::default());
    }
}
