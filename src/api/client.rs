use async_trait::async_trait;

use super::error::ApiError;
use crate::models::{
    Account, Analytics, AuthResponse, CreateAccountRequest, CreateStrategyRequest,
    CreateTradeRequest, LoginRequest, RegisterRequest, Strategy, Trade, TradeFilters,
    UpdateAccountRequest, UpdateStrategyRequest, UpdateTradeRequest, User,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// One method per journal backend operation.
///
/// Every call is a single attempt: no retries, no timeout, no backoff.
/// Authenticated operations take the bearer token explicitly so callers
/// decide which session a request belongs to.
#[async_trait]
pub trait JournalApi: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> ApiResult<AuthResponse>;

    async fn login(&self, request: LoginRequest) -> ApiResult<AuthResponse>;

    async fn get_current_user(&self, token: &str) -> ApiResult<User>;

    // Accounts

    async fn get_accounts(&self, token: &str) -> ApiResult<Vec<Account>>;

    async fn get_account(&self, token: &str, id: i64) -> ApiResult<Account>;

    async fn create_account(&self, token: &str, request: CreateAccountRequest) -> ApiResult<Account>;

    async fn update_account(
        &self,
        token: &str,
        id: i64,
        request: UpdateAccountRequest,
    ) -> ApiResult<Account>;

    async fn delete_account(&self, token: &str, id: i64) -> ApiResult<()>;

    // Strategies

    async fn get_strategies(&self, token: &str) -> ApiResult<Vec<Strategy>>;

    async fn get_strategy(&self, token: &str, id: i64) -> ApiResult<Strategy>;

    async fn create_strategy(
        &self,
        token: &str,
        request: CreateStrategyRequest,
    ) -> ApiResult<Strategy>;

    async fn update_strategy(
        &self,
        token: &str,
        id: i64,
        request: UpdateStrategyRequest,
    ) -> ApiResult<Strategy>;

    async fn delete_strategy(&self, token: &str, id: i64) -> ApiResult<()>;

    // Trades

    async fn get_trades(&self, token: &str, filters: &TradeFilters) -> ApiResult<Vec<Trade>>;

    async fn get_trade(&self, token: &str, id: i64) -> ApiResult<Trade>;

    async fn create_trade(&self, token: &str, request: CreateTradeRequest) -> ApiResult<Trade>;

    async fn update_trade(&self, token: &str, id: i64, request: UpdateTradeRequest) -> ApiResult<Trade>;

    async fn delete_trade(&self, token: &str, id: i64) -> ApiResult<()>;

    // Analytics

    async fn get_analytics(&self, token: &str) -> ApiResult<Analytics>;
}
