use log::{debug, warn};
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Dashboard, the landing page of the protected area
    Home,
    Login,
    Register,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Routes reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// Hands navigation requests to whatever drives the UI
pub trait Navigator: Send + Sync {
    fn goto(&self, route: Route);
}

/// Forwards routes to a UI event loop
impl Navigator for UnboundedSender<Route> {
    fn goto(&self, route: Route) {
        if self.send(route).is_err() {
            warn!("Navigation to {} dropped: receiver closed", route.path());
        }
    }
}

/// Headless navigator that only records where the app was sent
#[derive(Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn current(&self) -> Option<Route> {
        self.history.lock().ok().and_then(|h| h.last().copied())
    }
}

impl Navigator for HistoryNavigator {
    fn goto(&self, route: Route) {
        debug!("Navigating to {}", route.path());
        if let Ok(mut history) = self.history.lock() {
            history.push(route);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_history_navigator_tracks_current_route() {
        let navigator = HistoryNavigator::new();
        assert_eq!(navigator.current(), None);

        navigator.goto(Route::Login);
        navigator.goto(Route::Home);

        assert_eq!(navigator.current(), Some(Route::Home));
        assert_eq!(navigator.history(), vec![Route::Login, Route::Home]);
    }

    #[tokio::test]
    async fn test_channel_navigator_forwards_routes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.goto(Route::Register);
        assert_eq!(rx.recv().await, Some(Route::Register));

        drop(rx);
        // a closed UI loop must not panic the caller
        tx.goto(Route::Home);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert!(Route::Login.is_public());
        assert!(!Route::Home.is_public());
    }
}
