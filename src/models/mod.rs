pub mod account;
pub mod analytics;
pub mod strategy;
pub mod trade;
pub mod user;

pub use account::*;
pub use analytics::*;
pub use strategy::*;
pub use trade::*;
pub use user::*;
