use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::client::{ApiResult, JournalApi};
use super::error::ApiError;
use crate::config::ClientConfig;
use crate::models::{
    Account, Analytics, AuthResponse, CreateAccountRequest, CreateStrategyRequest,
    CreateTradeRequest, LoginRequest, RegisterRequest, Strategy, Trade, TradeFilters,
    UpdateAccountRequest, UpdateStrategyRequest, UpdateTradeRequest, User,
};

const REGISTER_ENDPOINT: &str = "/api/auth/register";
const LOGIN_ENDPOINT: &str = "/api/auth/login";
const ME_ENDPOINT: &str = "/api/me";
const ACCOUNTS_ENDPOINT: &str = "/api/accounts";
const STRATEGIES_ENDPOINT: &str = "/api/strategies";
const TRADES_ENDPOINT: &str = "/api/trades";
const ANALYTICS_ENDPOINT: &str = "/api/analytics";

/// Raw outcome of a successful (2xx) exchange
struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

/// `JournalApi` over HTTP using reqwest
pub struct HttpApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_headers(&self, token: Option<&str>) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidToken(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Perform a single request and split the outcome into success bytes or an `ApiError`
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> ApiResult<RawResponse> {
        let headers = self.build_headers(token)?;
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, path);

        let mut builder = self.http_client.request(method.clone(), &url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!("{} {} body read failed: {}", method, path, e);
            ApiError::from(e)
        })?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &body);
            debug!("{} {} -> {}: {}", method, path, status, err);
            return Err(err);
        }

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }

    /// Request whose 2xx response must carry a JSON payload of type `T`
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let raw = self.send(method.clone(), path, token, &[], body).await?;
        decode(&method, path, &raw)
    }

    /// Request whose 2xx response carries no meaningful payload (204 or a message body)
    async fn request_empty(&self, method: Method, path: &str, token: &str) -> ApiResult<()> {
        let raw = self.send::<()>(method, path, Some(token), &[], None).await?;
        if raw.status != StatusCode::NO_CONTENT {
            debug!("{} answered {} with {} byte body", path, raw.status, raw.body.len());
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> ApiResult<T> {
        self.request::<T, ()>(Method::GET, path, Some(token), None).await
    }
}

fn decode<T: DeserializeOwned>(method: &Method, path: &str, raw: &RawResponse) -> ApiResult<T> {
    serde_json::from_slice(&raw.body).map_err(|e| {
        warn!("{} {} returned an undecodable body: {}", method, path, e);
        ApiError::from(e)
    })
}

fn item_path(collection: &str, id: i64) -> String {
    format!("{}/{}", collection, id)
}

#[async_trait]
impl JournalApi for HttpApiClient {
    async fn register(&self, request: RegisterRequest) -> ApiResult<AuthResponse> {
        self.request(Method::POST, REGISTER_ENDPOINT, None, Some(&request)).await
    }

    async fn login(&self, request: LoginRequest) -> ApiResult<AuthResponse> {
        self.request(Method::POST, LOGIN_ENDPOINT, None, Some(&request)).await
    }

    async fn get_current_user(&self, token: &str) -> ApiResult<User> {
        self.get(ME_ENDPOINT, token).await
    }

    async fn get_accounts(&self, token: &str) -> ApiResult<Vec<Account>> {
        self.get(ACCOUNTS_ENDPOINT, token).await
    }

    async fn get_account(&self, token: &str, id: i64) -> ApiResult<Account> {
        self.get(&item_path(ACCOUNTS_ENDPOINT, id), token).await
    }

    async fn create_account(&self, token: &str, request: CreateAccountRequest) -> ApiResult<Account> {
        self.request(Method::POST, ACCOUNTS_ENDPOINT, Some(token), Some(&request)).await
    }

    async fn update_account(
        &self,
        token: &str,
        id: i64,
        request: UpdateAccountRequest,
    ) -> ApiResult<Account> {
        let path = item_path(ACCOUNTS_ENDPOINT, id);
        self.request(Method::PUT, &path, Some(token), Some(&request)).await
    }

    async fn delete_account(&self, token: &str, id: i64) -> ApiResult<()> {
        self.request_empty(Method::DELETE, &item_path(ACCOUNTS_ENDPOINT, id), token).await
    }

    async fn get_strategies(&self, token: &str) -> ApiResult<Vec<Strategy>> {
        self.get(STRATEGIES_ENDPOINT, token).await
    }

    async fn get_strategy(&self, token: &str, id: i64) -> ApiResult<Strategy> {
        self.get(&item_path(STRATEGIES_ENDPOINT, id), token).await
    }

    async fn create_strategy(
        &self,
        token: &str,
        request: CreateStrategyRequest,
    ) -> ApiResult<Strategy> {
        self.request(Method::POST, STRATEGIES_ENDPOINT, Some(token), Some(&request)).await
    }

    async fn update_strategy(
        &self,
        token: &str,
        id: i64,
        request: UpdateStrategyRequest,
    ) -> ApiResult<Strategy> {
        let path = item_path(STRATEGIES_ENDPOINT, id);
        self.request(Method::PUT, &path, Some(token), Some(&request)).await
    }

    async fn delete_strategy(&self, token: &str, id: i64) -> ApiResult<()> {
        self.request_empty(Method::DELETE, &item_path(STRATEGIES_ENDPOINT, id), token).await
    }

    async fn get_trades(&self, token: &str, filters: &TradeFilters) -> ApiResult<Vec<Trade>> {
        let query = filters.query_pairs();
        let raw = self
            .send::<()>(Method::GET, TRADES_ENDPOINT, Some(token), &query, None)
            .await?;
        decode(&Method::GET, TRADES_ENDPOINT, &raw)
    }

    async fn get_trade(&self, token: &str, id: i64) -> ApiResult<Trade> {
        self.get(&item_path(TRADES_ENDPOINT, id), token).await
    }

    async fn create_trade(&self, token: &str, request: CreateTradeRequest) -> ApiResult<Trade> {
        self.request(Method::POST, TRADES_ENDPOINT, Some(token), Some(&request)).await
    }

    async fn update_trade(&self, token: &str, id: i64, request: UpdateTradeRequest) -> ApiResult<Trade> {
        let path = item_path(TRADES_ENDPOINT, id);
        self.request(Method::PUT, &path, Some(token), Some(&request)).await
    }

    async fn delete_trade(&self, token: &str, id: i64) -> ApiResult<()> {
        self.request_empty(Method::DELETE, &item_path(TRADES_ENDPOINT, id), token).await
    }

    async fn get_analytics(&self, token: &str) -> ApiResult<Analytics> {
        self.get(ANALYTICS_ENDPOINT, token).await
    }
}
