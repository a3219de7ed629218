use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::watch;

use crate::api::{ApiError, JournalApi};
use crate::models::{AuthResponse, Credentials, User};
use crate::navigation::{Navigator, Route};
use crate::storage::DurableStorage;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Persisted session not read yet
    Initializing,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub phase: AuthPhase,
}

impl AuthState {
    fn initializing() -> Self {
        Self {
            user: None,
            token: None,
            phase: AuthPhase::Initializing,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Initializing
    }
}

/// Current session, mirrored to durable storage
pub struct AuthStore {
    api: Arc<dyn JournalApi>,
    storage: Arc<dyn DurableStorage>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    pub fn new(
        api: Arc<dyn JournalApi>,
        storage: Arc<dyn DurableStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::initializing());
        Self {
            api,
            storage,
            navigator,
            state,
        }
    }

    /// Restore the persisted session. Runs once; later calls are no-ops.
    ///
    /// A token without a user, or a user that no longer parses, counts as
    /// no session. Corrupt entries are wiped so the next start is clean.
    pub fn initialize(&self) {
        if !self.state.borrow().is_loading() {
            debug!("Auth store already initialized");
            return;
        }

        let restored = self.restore();
        self.state.send_modify(|state| match restored {
            Some((token, user)) => {
                info!("Restored session for user {}", user.id);
                state.token = Some(token);
                state.user = Some(user);
                state.phase = AuthPhase::Authenticated;
            }
            None => {
                state.token = None;
                state.user = None;
                state.phase = AuthPhase::Unauthenticated;
            }
        });
    }

    /// Resolves once [`initialize`](Self::initialize) has finished.
    ///
    /// Pends forever if nothing ever calls `initialize`; `JournalApp::start`
    /// is the caller in an assembled app.
    pub async fn ready(&self) -> AuthState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .api
            .login(Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.set_session(response);
        self.navigator.goto(Route::Home);
        Ok(())
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .api
            .register(Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.set_session(response);
        self.navigator.goto(Route::Home);
        Ok(())
    }

    pub fn logout(&self) {
        self.clear_session();
        info!("Logged out");
        self.navigator.goto(Route::Login);
    }

    /// Re-fetch the signed-in user from `/api/me` and persist the result
    pub async fn refresh_user(&self) -> Result<User, ApiError> {
        let token = self.token().ok_or(ApiError::NotAuthenticated)?;
        let user = self.api.get_current_user(&token).await?;

        // The session may have changed while the request was in flight
        let mut applied = false;
        self.state.send_if_modified(|state| {
            if state.token.as_deref() == Some(token.as_str()) {
                state.user = Some(user.clone());
                applied = true;
            }
            applied
        });

        if applied {
            self.persist_user(&user);
        }
        Ok(user)
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn restore(&self) -> Option<(String, User)> {
        let token = self.read(TOKEN_KEY)?;
        let user_json = self.read(USER_KEY)?;

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Some((token, user)),
            Err(e) => {
                warn!("Discarding unreadable persisted user: {}", e);
                self.clear_persisted();
                None
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Failed to read {} from storage: {}", key, e);
                None
            }
        }
    }

    fn set_session(&self, response: AuthResponse) {
        let AuthResponse { token, user } = response;

        if let Err(e) = self.storage.set(TOKEN_KEY, &token) {
            warn!("Failed to persist auth token: {}", e);
        }
        self.persist_user(&user);

        info!("Signed in as user {}", user.id);
        self.state.send_modify(|state| {
            state.token = Some(token);
            state.user = Some(user);
            state.phase = AuthPhase::Authenticated;
        });
    }

    fn persist_user(&self, user: &User) {
        let result = serde_json::to_string(user)
            .map_err(ApiError::from)
            .and_then(|json| self.storage.set(USER_KEY, &json));
        if let Err(e) = result {
            warn!("Failed to persist auth user: {}", e);
        }
    }

    fn clear_session(&self) {
        self.state.send_modify(|state| {
            state.token = None;
            state.user = None;
            state.phase = AuthPhase::Unauthenticated;
        });
        self.clear_persisted();
    }

    fn clear_persisted(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove {} from storage: {}", key, e);
            }
        }
    }
}
