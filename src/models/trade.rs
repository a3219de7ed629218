use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    Buy,
    Sell,
    Deposit,
    Withdraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// Strategy reference embedded in a trade (read side only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeStrategy {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub account_id: Option<i64>,
    pub date: NaiveDate,
    pub time: String, // HH:MM
    pub pair: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub entry: f64,
    pub exit: Option<f64>,
    pub lots: f64,
    pub pips: Option<f64>,
    pub pl: Option<f64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rr: Option<String>,
    pub status: TradeStatus,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub mistakes: String,
    pub amount: Option<f64>,
    #[serde(default)]
    pub strategies: Vec<TradeStrategy>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable trade fields; `strategy_ids` replaces the embedded strategy list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeInput {
    pub account_id: Option<i64>,
    pub date: NaiveDate,
    pub time: String,
    pub pair: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub entry: f64,
    pub exit: Option<f64>,
    pub lots: f64,
    pub pips: Option<f64>,
    pub pl: Option<f64>,
    pub rr: Option<f64>,
    pub status: TradeStatus,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub notes: String,
    pub mistakes: String,
    pub amount: Option<f64>,
    pub strategy_ids: Vec<i64>,
}

pub type CreateTradeRequest = TradeInput;
pub type UpdateTradeRequest = TradeInput;

/// Query filters for `GET /api/trades`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub account_id: Option<i64>,
}

impl TradeFilters {
    /// Query pairs in the order the backend documents them; unset filters are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(account_id) = self.account_id {
            pairs.push(("account_id", account_id.to_string()));
        }
        pairs
    }
}

// The backend has emitted rr both as a number and as a decimal string.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn trade_json(rr: serde_json::Value) -> serde_json::Value {
        json!({
            "id": 7,
            "account_id": null,
            "date": "2025-01-01",
            "time": "09:30",
            "pair": "EURUSD",
            "type": "BUY",
            "entry": 1.1,
            "exit": 1.11,
            "lots": 1.0,
            "pips": 100.0,
            "pl": 1000.0,
            "rr": rr,
            "status": "closed",
            "stop_loss": null,
            "take_profit": null,
            "notes": "",
            "mistakes": "",
            "amount": null,
            "strategies": [{"id": 2, "name": "Breakout"}],
            "created_at": "2025-01-01T09:30:00Z",
            "updated_at": "2025-01-01T09:30:00Z"
        })
    }

    #[test]
    fn test_rr_accepts_number_and_string() {
        let from_number: Trade = serde_json::from_value(trade_json(json!(2.5))).unwrap();
        assert_eq!(from_number.rr.as_deref(), Some("2.5"));

        let from_string: Trade = serde_json::from_value(trade_json(json!("1:3"))).unwrap();
        assert_eq!(from_string.rr.as_deref(), Some("1:3"));

        let missing: Trade = serde_json::from_value(trade_json(json!(null))).unwrap();
        assert_eq!(missing.rr, None);
    }

    #[test]
    fn test_unassigned_trade_and_embedded_strategies() {
        let trade: Trade = serde_json::from_value(trade_json(json!(null))).unwrap();
        assert_eq!(trade.account_id, None);
        assert_eq!(trade.trade_type, TradeType::Buy);
        assert_eq!(trade.status, TradeStatus::Closed);
        assert_eq!(trade.strategies, vec![TradeStrategy { id: 2, name: "Breakout".into() }]);
    }

    #[test]
    fn test_input_serializes_type_and_strategy_ids() {
        let input = TradeInput {
            account_id: Some(3),
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            time: "14:00".into(),
            pair: "GBPUSD".into(),
            trade_type: TradeType::Withdraw,
            entry: 0.0,
            exit: None,
            lots: 0.0,
            pips: None,
            pl: None,
            rr: None,
            status: TradeStatus::Closed,
            stop_loss: None,
            take_profit: None,
            notes: String::new(),
            mistakes: String::new(),
            amount: Some(250.0),
            strategy_ids: vec![1, 4],
        };

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["type"], "WITHDRAW");
        assert_eq!(value["date"], "2025-02-03");
        assert_eq!(value["strategy_ids"], json!([1, 4]));
        assert!(value.get("strategies").is_none());
    }

    #[test]
    fn test_filter_query_pairs_skip_unset() {
        assert!(TradeFilters::default().query_pairs().is_empty());

        let filters = TradeFilters {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: None,
            account_id: Some(9),
        };
        assert_eq!(
            filters.query_pairs(),
            vec![("start_date", "2025-01-01".to_string()), ("account_id", "9".to_string())]
        );
    }
}
