use serde::{Deserialize, Serialize};

/// Aggregate performance snapshot computed by the backend.
///
/// Every field defaults to zero so an account without closed trades
/// (or an older backend missing a metric) still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub total_pl: f64,
    pub win_rate: f64,
    pub total_trades: i64,
    pub winning_trades: i64,
    pub losing_trades: i64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_rr: f64,
    pub consecutive_wins: i64,
    pub consecutive_losses: i64,
    pub best_streak: i64,
    pub worst_streak: i64,
}
