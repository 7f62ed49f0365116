//! Snapshot types returned by the overview aggregator.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::PositionSide;

/// Where open positions got their valuation price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkSource {
    /// No usable caller marks; every symbol uses its last trade price.
    LastTrade,
    /// Caller marks where supplied, last trade price otherwise.
    ProvidedWithLastTradeFallback,
}

/// Risk-adjusted metrics over the realized match series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
    /// Sharpe ratio of per-match PnL.
    pub sharpe_ratio: Option<Decimal>,
    /// Sortino ratio of per-match PnL.
    pub sortino_ratio: Option<Decimal>,
    /// Realized PnL over max drawdown.
    pub calmar_ratio: Option<Decimal>,
    /// Gross profit over gross loss.
    pub profit_factor: Option<Decimal>,
    /// Expected PnL per match.
    pub expectancy: Option<Decimal>,
    /// Mean holding period in days.
    pub avg_holding_period_days: Option<Decimal>,
}

/// Realized PnL keyed by exit hour and exit weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBuckets {
    /// Hour of day (0-23).
    pub pnl_by_hour: BTreeMap<u32, Decimal>,
    /// Weekday, Monday = 0.
    pub pnl_by_weekday: BTreeMap<u32, Decimal>,
}

/// One open side of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPosition {
    /// Symbol.
    pub symbol: String,
    /// Open side.
    pub side: PositionSide,
    /// Open quantity on this side.
    pub quantity: u64,
    /// Fee-inclusive average entry (cost for longs, net proceeds for shorts).
    pub avg_cost: Decimal,
    /// Price used for valuation; zero when none is known.
    pub mark_price: Decimal,
    /// Unrealized PnL of the symbol.
    pub unrealized_pnl: Decimal,
}

/// Provenance notes attached to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNotes {
    /// Mark policy applied.
    pub mark_price_source: MarkSource,
    /// Open symbols without a usable caller-supplied mark, sorted.
    pub missing_marks: Vec<String>,
}

/// Portfolio snapshot for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Sum of realized match PnL.
    pub realized_pnl: Decimal,
    /// Sum of unrealized PnL over open lots.
    pub unrealized_pnl: Decimal,
    /// Realized plus unrealized.
    pub total_pnl: Decimal,
    /// Wins over decided matches (0 when none).
    pub win_rate: Decimal,
    /// Mean winning match PnL (0 when none).
    pub avg_win: Decimal,
    /// Mean losing match PnL, non-positive (0 when none).
    pub avg_loss: Decimal,
    /// Max drawdown of the realized equity curve.
    pub drawdown: Decimal,
    /// `avg_win / |avg_loss|` when there are losses.
    pub risk_reward_ratio: Option<Decimal>,
    /// Risk-adjusted metrics.
    pub advanced_metrics: AdvancedMetrics,
    /// Exit-time buckets.
    pub time_buckets: TimeBuckets,
    /// Open sides, ordered by symbol then long before short.
    pub open_positions: Vec<OpenPosition>,
    /// Mark provenance.
    pub notes: SnapshotNotes,
}
