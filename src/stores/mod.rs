pub mod accounts;
pub mod auth;
pub mod collection;
pub mod strategies;

pub use accounts::AccountsStore;
pub use auth::{AuthPhase, AuthState, AuthStore};
pub use collection::{CachedResource, CollectionStore, ListState};
pub use strategies::StrategiesStore;
