use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Demo,
    Live,
}

/// Brokerage account as returned by `/api/accounts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub broker: String,
    pub account_number: String,
    pub account_type: AccountType,
    pub currency: String,
    #[serde(default)]
    pub current_balance: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating/updating an account (the backend takes the same shape for both)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInput {
    pub name: String,
    pub broker: String,
    pub account_number: String,
    pub account_type: AccountType,
    pub currency: String,
    pub is_active: bool,
}

pub type CreateAccountRequest = AccountInput;
pub type UpdateAccountRequest = AccountInput;
