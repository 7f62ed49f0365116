//! Trade records and the pre-engine validation layer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::symbol::{MAX_SYMBOL_LEN, normalize_symbol};
use crate::error::AnalyticsError;

/// Trade direction.
///
/// Serialized uppercase; deserialized through [`FromStr`], so any case is
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Side {
    /// Buy: closes shorts first, then opens long.
    Buy,
    /// Sell: closes longs first, then opens short.
    Sell,
}

/// Unrecognized side string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown side '{0}' (expected BUY or SELL)")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Side {
    type Error = ParseSideError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Direction of a lot or position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// Long exposure (opened by a buy).
    Long,
    /// Short exposure (opened by a sell).
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// An executed trade for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Trade identifier.
    pub id: String,
    /// Instrument symbol as stored (normalized by the engine).
    pub symbol: String,
    /// Buy or sell.
    pub side: Side,
    /// Executed quantity (whole units).
    pub quantity: u64,
    /// Execution price.
    pub price: Decimal,
    /// Execution time.
    pub trade_time: DateTime<Utc>,
    /// Total fees charged for the whole trade.
    #[serde(default)]
    pub fees: Decimal,
}

impl Trade {
    /// Create a fee-free trade.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        quantity: u64,
        price: Decimal,
        trade_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            side,
            quantity,
            price,
            trade_time,
            fees: Decimal::ZERO,
        }
    }

    /// Set the total fees for this trade.
    #[must_use]
    pub fn with_fees(mut self, fees: Decimal) -> Self {
        self.fees = fees;
        self
    }

    /// Normalized symbol key.
    #[must_use]
    pub fn normalized_symbol(&self) -> String {
        normalize_symbol(&self.symbol)
    }

    /// Fees spread evenly over the executed quantity (zero for a zero quantity).
    #[must_use]
    pub fn fee_per_share(&self) -> Decimal {
        if self.quantity == 0 {
            return Decimal::ZERO;
        }
        self.fees / Decimal::from(self.quantity)
    }
}

/// A trade as it arrives from callers, before the side is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Trade identifier.
    pub id: String,
    /// Instrument symbol.
    pub symbol: String,
    /// Raw side string, `BUY` or `SELL` in any case.
    pub side: String,
    /// Executed quantity.
    pub quantity: u64,
    /// Execution price.
    pub price: Decimal,
    /// Execution time.
    pub trade_time: DateTime<Utc>,
    /// Total fees.
    #[serde(default)]
    pub fees: Decimal,
}

impl TryFrom<TradeRecord> for Trade {
    type Error = AnalyticsError;

    fn try_from(record: TradeRecord) -> Result<Self, Self::Error> {
        let side = record.side.parse::<Side>().map_err(|_| {
            AnalyticsError::invalid_trade(
                &record.id,
                "side",
                format!("must be BUY or SELL, got '{}'", record.side),
            )
        })?;
        Ok(Self {
            id: record.id,
            symbol: record.symbol,
            side,
            quantity: record.quantity,
            price: record.price,
            trade_time: record.trade_time,
            fees: record.fees,
        })
    }
}

impl From<Trade> for TradeRecord {
    fn from(trade: Trade) -> Self {
        Self {
            side: trade.side.to_string(),
            id: trade.id,
            symbol: trade.symbol,
            quantity: trade.quantity,
            price: trade.price,
            trade_time: trade.trade_time,
            fees: trade.fees,
        }
    }
}

/// Parse raw records into trades, failing on the first unknown side.
pub fn parse_trades(records: Vec<TradeRecord>) -> Result<Vec<Trade>, AnalyticsError> {
    records.into_iter().map(Trade::try_from).collect()
}

/// Check one trade against the input contract.
pub fn validate_trade(trade: &Trade) -> Result<(), AnalyticsError> {
    let symbol = trade.normalized_symbol();
    if symbol.is_empty() {
        return Err(AnalyticsError::invalid_trade(
            &trade.id,
            "symbol",
            "must not be empty",
        ));
    }
    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(AnalyticsError::invalid_trade(
            &trade.id,
            "symbol",
            format!("must be at most {MAX_SYMBOL_LEN} characters"),
        ));
    }
    if trade.quantity == 0 {
        return Err(AnalyticsError::invalid_trade(
            &trade.id,
            "quantity",
            "must be positive",
        ));
    }
    if trade.price <= Decimal::ZERO {
        return Err(AnalyticsError::invalid_trade(
            &trade.id,
            "price",
            "must be positive",
        ));
    }
    if trade.fees < Decimal::ZERO {
        return Err(AnalyticsError::invalid_trade(
            &trade.id,
            "fees",
            "must not be negative",
        ));
    }
    Ok(())
}

/// Check every trade, stopping at the first violation.
pub fn validate_trades(trades: &[Trade]) -> Result<(), AnalyticsError> {
    trades.iter().try_for_each(validate_trade)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    fn trade(quantity: u64, price: Decimal) -> Trade {
        Trade::new(
            "t-1",
            "aapl",
            Side::Buy,
            quantity,
            price,
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("buy".parse::<Side>(), Ok(Side::Buy));
        assert_eq!(" SELL ".parse::<Side>(), Ok(Side::Sell));
        assert!("short".parse::<Side>().is_err());
    }

    #[test]
    fn test_side_serde_uses_uppercase() {
        let json = serde_json::to_string(&Side::Sell).unwrap();
        assert_eq!(json, "\"SELL\"");
        assert_eq!(serde_json::from_str::<Side>("\"buy\"").unwrap(), Side::Buy);
        assert!(serde_json::from_str::<Side>("\"HOLD\"").is_err());
    }

    #[test]
    fn test_record_side_is_case_insensitive() {
        let mut record = TradeRecord::from(trade(3, dec!(10)));
        record.side = "sell".to_string();

        let Ok(parsed) = Trade::try_from(record) else {
            panic!("lowercase side should parse");
        };
        assert_eq!(parsed.side, Side::Sell);
        assert_eq!(parsed.quantity, 3);
    }

    #[test]
    fn test_unknown_side_is_invalid_trade() {
        let mut record = TradeRecord::from(trade(1, dec!(10)));
        record.side = "HOLD".to_string();

        let Err(err) = parse_trades(vec![record]) else {
            panic!("unknown side should be rejected");
        };
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidTrade);
        let AnalyticsError::InvalidTrade { trade_id, field, message } = err else {
            panic!("expected an invalid-trade error");
        };
        assert_eq!((trade_id.as_str(), field.as_str()), ("t-1", "side"));
        assert!(message.contains("HOLD"));
    }

    #[test]
    fn test_fee_per_share() {
        let t = trade(10, dec!(100)).with_fees(dec!(10));
        assert_eq!(t.fee_per_share(), dec!(1));

        let t = trade(0, dec!(100)).with_fees(dec!(10));
        assert_eq!(t.fee_per_share(), Decimal::ZERO);
    }

    #[test]
    fn test_validate_accepts_clean_trade() {
        assert!(validate_trade(&trade(5, dec!(101.25))).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let Err(AnalyticsError::InvalidTrade { field, .. }) = validate_trade(&trade(0, dec!(1)))
        else {
            panic!("zero quantity should be rejected");
        };
        assert_eq!(field, "quantity");

        let Err(AnalyticsError::InvalidTrade { field, .. }) =
            validate_trade(&trade(1, Decimal::ZERO))
        else {
            panic!("zero price should be rejected");
        };
        assert_eq!(field, "price");

        let negative_fees = trade(1, dec!(1)).with_fees(dec!(-0.01));
        assert!(validate_trade(&negative_fees).is_err());

        let mut blank = trade(1, dec!(1));
        blank.symbol = "  ".to_string();
        assert!(validate_trade(&blank).is_err());

        let mut long = trade(1, dec!(1));
        long.symbol = "X".repeat(MAX_SYMBOL_LEN + 1);
        assert!(validate_trade(&long).is_err());
    }

    #[test]
    fn test_validate_trades_reports_first_failure() {
        let mut bad = trade(0, dec!(1));
        bad.id = "t-2".to_string();
        let trades = vec![trade(1, dec!(1)), bad];

        let Err(AnalyticsError::InvalidTrade { trade_id, .. }) = validate_trades(&trades) else {
            panic!("second trade should fail validation");
        };
        assert_eq!(trade_id, "t-2");
    }
}
