pub mod client;
pub mod error;
pub mod http;

pub use client::{ApiResult, JournalApi};
pub use error::ApiError;
pub use http::HttpApiClient;
