//! In-crate test doubles shared by the store, guard and page tests.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{ApiError, ApiResult, JournalApi};
use crate::models::{
    Account, AccountType, Analytics, AuthResponse, CreateAccountRequest, CreateStrategyRequest,
    CreateTradeRequest, LoginRequest, RegisterRequest, Strategy, Trade, TradeFilters, TradeStatus,
    TradeType, UpdateAccountRequest, UpdateStrategyRequest, UpdateTradeRequest, User,
};

/// Canned response: a value, or a server error `(status, message)`
pub type Canned<T> = Option<Result<T, (u16, String)>>;

/// `JournalApi` that answers from canned responses and counts calls by operation
#[derive(Default)]
pub struct FakeApi {
    pub auth: Mutex<Canned<AuthResponse>>,
    pub me: Mutex<Canned<User>>,
    pub accounts: Mutex<Canned<Vec<Account>>>,
    pub strategies: Mutex<Canned<Vec<Strategy>>>,
    pub trades: Mutex<Canned<Vec<Trade>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    last_credentials: Mutex<Option<LoginRequest>>,
}

/// Route `log` output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

impl FakeApi {
    pub fn new() -> Self {
        init_logging();
        Self::default()
    }

    pub fn set<T>(slot: &Mutex<Canned<T>>, value: Result<T, (u16, &str)>) {
        *slot.lock().unwrap() = Some(value.map_err(|(status, msg)| (status, msg.to_string())));
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    pub fn last_credentials(&self) -> Option<LoginRequest> {
        self.last_credentials.lock().unwrap().clone()
    }

    fn answer<T: Clone>(&self, operation: &'static str, slot: &Mutex<Canned<T>>) -> ApiResult<T> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        match slot.lock().unwrap().clone() {
            Some(Ok(value)) => Ok(value),
            Some(Err((status, message))) => Err(ApiError::Server { status, message }),
            None => Err(not_stubbed(operation)),
        }
    }

    fn unstubbed<T>(&self, operation: &'static str) -> ApiResult<T> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        Err(not_stubbed(operation))
    }
}

fn not_stubbed(operation: &str) -> ApiError {
    ApiError::Server {
        status: 501,
        message: format!("{} not stubbed", operation),
    }
}

#[async_trait]
impl JournalApi for FakeApi {
    async fn register(&self, request: RegisterRequest) -> ApiResult<AuthResponse> {
        *self.last_credentials.lock().unwrap() = Some(request);
        self.answer("register", &self.auth)
    }

    async fn login(&self, request: LoginRequest) -> ApiResult<AuthResponse> {
        *self.last_credentials.lock().unwrap() = Some(request);
        self.answer("login", &self.auth)
    }

    async fn get_current_user(&self, _token: &str) -> ApiResult<User> {
        self.answer("get_current_user", &self.me)
    }

    async fn get_accounts(&self, _token: &str) -> ApiResult<Vec<Account>> {
        self.answer("get_accounts", &self.accounts)
    }

    async fn get_account(&self, _token: &str, _id: i64) -> ApiResult<Account> {
        self.unstubbed("get_account")
    }

    async fn create_account(&self, _token: &str, _request: CreateAccountRequest) -> ApiResult<Account> {
        self.unstubbed("create_account")
    }

    async fn update_account(
        &self,
        _token: &str,
        _id: i64,
        _request: UpdateAccountRequest,
    ) -> ApiResult<Account> {
        self.unstubbed("update_account")
    }

    async fn delete_account(&self, _token: &str, _id: i64) -> ApiResult<()> {
        self.unstubbed("delete_account")
    }

    async fn get_strategies(&self, _token: &str) -> ApiResult<Vec<Strategy>> {
        self.answer("get_strategies", &self.strategies)
    }

    async fn get_strategy(&self, _token: &str, _id: i64) -> ApiResult<Strategy> {
        self.unstubbed("get_strategy")
    }

    async fn create_strategy(
        &self,
        _token: &str,
        _request: CreateStrategyRequest,
    ) -> ApiResult<Strategy> {
        self.unstubbed("create_strategy")
    }

    async fn update_strategy(
        &self,
        _token: &str,
        _id: i64,
        _request: UpdateStrategyRequest,
    ) -> ApiResult<Strategy> {
        self.unstubbed("update_strategy")
    }

    async fn delete_strategy(&self, _token: &str, _id: i64) -> ApiResult<()> {
        self.unstubbed("delete_strategy")
    }

    async fn get_trades(&self, _token: &str, _filters: &TradeFilters) -> ApiResult<Vec<Trade>> {
        self.answer("get_trades", &self.trades)
    }

    async fn get_trade(&self, _token: &str, _id: i64) -> ApiResult<Trade> {
        self.unstubbed("get_trade")
    }

    async fn create_trade(&self, _token: &str, _request: CreateTradeRequest) -> ApiResult<Trade> {
        self.unstubbed("create_trade")
    }

    async fn update_trade(&self, _token: &str, _id: i64, _request: UpdateTradeRequest) -> ApiResult<Trade> {
        self.unstubbed("update_trade")
    }

    async fn delete_trade(&self, _token: &str, _id: i64) -> ApiResult<()> {
        self.unstubbed("delete_trade")
    }

    async fn get_analytics(&self, _token: &str) -> ApiResult<Analytics> {
        self.unstubbed("get_analytics")
    }
}

pub fn user() -> User {
    User {
        id: 1,
        email: "a@b.com".to_string(),
    }
}

pub fn session(token: &str) -> AuthResponse {
    AuthResponse {
        token: token.to_string(),
        user: user(),
    }
}

pub fn account(id: i64, name: &str) -> Account {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Account {
        id,
        name: name.to_string(),
        broker: "IC Markets".to_string(),
        account_number: format!("ACC-{}", id),
        account_type: AccountType::Demo,
        currency: "USD".to_string(),
        current_balance: Some(10_000.0),
        is_active: true,
        created_at: ts,
        updated_at: ts,
    }
}

pub fn strategy(id: i64, name: &str) -> Strategy {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Strategy {
        id,
        name: name.to_string(),
        description: String::new(),
        created_at: ts,
        updated_at: ts,
    }
}

pub fn trade(id: i64) -> Trade {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap();
    Trade {
        id,
        account_id: Some(1),
        date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        time: "09:30".to_string(),
        pair: "EURUSD".to_string(),
        trade_type: TradeType::Buy,
        entry: 1.1,
        exit: Some(1.11),
        lots: 1.0,
        pips: Some(100.0),
        pl: Some(1000.0),
        rr: Some("2".to_string()),
        status: TradeStatus::Closed,
        stop_loss: None,
        take_profit: None,
        notes: String::new(),
        mistakes: String::new(),
        amount: None,
        strategies: Vec::new(),
        created_at: ts,
        updated_at: ts,
    }
}
