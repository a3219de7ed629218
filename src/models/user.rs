use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    // `/api/me` answers with `user_id`, the auth endpoints with `id`
    #[serde(alias = "user_id")]
    pub id: i64,
    pub email: String,
}

/// Body of both `/api/auth/register` and `/api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub type RegisterRequest = Credentials;
pub type LoginRequest = Credentials;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
