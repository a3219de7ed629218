use log::{error, warn};

use crate::api::JournalApi;
use crate::models::{Trade, TradeFilters};
use crate::stores::{AccountsStore, AuthStore, StrategiesStore};

/// Data for the dashboard; accounts and strategies live in their stores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeData {
    pub trades: Vec<Trade>,
}

/// Fill the account and strategy caches concurrently, then fetch trades.
///
/// Store failures stay in the stores' `error` fields. A failed trade
/// fetch is logged and shown as an empty journal.
pub async fn load_home(
    api: &dyn JournalApi,
    auth: &AuthStore,
    accounts: &AccountsStore,
    strategies: &StrategiesStore,
    filters: &TradeFilters,
) -> HomeData {
    let (accounts_result, strategies_result) = futures::join!(accounts.load(), strategies.load());
    if let Err(e) = accounts_result {
        warn!("Dashboard accounts unavailable: {}", e);
    }
    if let Err(e) = strategies_result {
        warn!("Dashboard strategies unavailable: {}", e);
    }

    let Some(token) = auth.token() else {
        return HomeData::default();
    };

    match api.get_trades(&token, filters).await {
        Ok(trades) => HomeData { trades },
        Err(e) => {
            error!("Failed to load trades: {}", e);
            HomeData::default()
        }
    }
}
