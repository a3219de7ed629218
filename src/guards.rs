//! Route guards for the protected app area and the public auth area.
//!
//! Both wait for the auth store to finish restoring the persisted session
//! before looking at it, so a guard evaluated at startup never redirects a
//! user whose session simply has not been read yet.

use log::debug;
use std::sync::Arc;

use crate::models::User;
use crate::navigation::{Navigator, Route};
use crate::stores::AuthStore;

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome<T> {
    Proceed(T),
    Redirect(Route),
}

impl<T> GuardOutcome<T> {
    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardOutcome::Redirect(_))
    }
}

/// Guards the app area; unauthenticated visitors are sent to the login page
pub struct ProtectedGuard {
    auth: Arc<AuthStore>,
    navigator: Arc<dyn Navigator>,
}

impl ProtectedGuard {
    pub fn new(auth: Arc<AuthStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { auth, navigator }
    }

    /// Proceeds with the signed-in user
    pub async fn check(&self) -> GuardOutcome<User> {
        let state = self.auth.ready().await;
        match state.user {
            Some(user) if state.is_authenticated() => GuardOutcome::Proceed(user),
            _ => redirect(self.navigator.as_ref(), Route::Login),
        }
    }
}

/// Guards login/register; signed-in users are sent home
pub struct PublicGuard {
    auth: Arc<AuthStore>,
    navigator: Arc<dyn Navigator>,
}

impl PublicGuard {
    pub fn new(auth: Arc<AuthStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { auth, navigator }
    }

    pub async fn check(&self) -> GuardOutcome<()> {
        if self.auth.ready().await.is_authenticated() {
            return redirect(self.navigator.as_ref(), Route::Home);
        }
        GuardOutcome::Proceed(())
    }
}

fn redirect<T>(navigator: &dyn Navigator, route: Route) -> GuardOutcome<T> {
    debug!("Guard redirecting to {}", route.path());
    navigator.goto(route);
    GuardOutcome::Redirect(route)
}
