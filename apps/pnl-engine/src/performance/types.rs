//! Performance report types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Realized PnL of one exit date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPnl {
    /// Exit date (UTC).
    pub date: NaiveDate,
    /// Realized PnL.
    pub pnl: Decimal,
}

/// Realized PnL of one ISO week, keyed `YYYY-Www`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPnl {
    /// ISO week key.
    pub week: String,
    /// Realized PnL.
    pub pnl: Decimal,
}

/// Cumulative realized PnL at the end of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEquity {
    /// Exit date (UTC).
    pub date: NaiveDate,
    /// Cumulative realized PnL.
    pub equity: Decimal,
}

/// Time series, all ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceSeries {
    /// PnL per exit date.
    pub daily_realized_pnl: Vec<DailyPnl>,
    /// PnL per ISO week.
    pub weekly_realized_pnl: Vec<WeeklyPnl>,
    /// Cumulative PnL per exit date.
    pub equity_curve: Vec<DailyEquity>,
}

/// Extremes and streaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceStats {
    /// Day with the highest PnL.
    pub best_day: Option<DailyPnl>,
    /// Day with the lowest PnL.
    pub worst_day: Option<DailyPnl>,
    /// Longest run of winning matches.
    pub max_win_streak: u32,
    /// Longest run of losing matches.
    pub max_loss_streak: u32,
}

/// Aggregate for one group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Group key.
    pub key: String,
    /// Realized PnL.
    pub pnl: Decimal,
    /// Match count.
    pub matches: u64,
    /// Wins over decided matches.
    pub win_rate: Decimal,
}

/// Breakdowns sorted by descending absolute PnL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdowns {
    /// Per symbol.
    pub by_symbol: Vec<Breakdown>,
    /// Per strategy tag of the exit trade.
    pub by_strategy: Vec<Breakdown>,
    /// Per emotion tag of the exit trade.
    pub by_emotion: Vec<Breakdown>,
}

/// Which trade of a match its tags come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Attribution {
    /// Tags of the closing trade.
    #[default]
    ExitTrade,
}

/// Report notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceNotes {
    /// Tag attribution policy.
    pub attribution: Attribution,
}

/// Performance insights over realized matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Time series.
    pub series: PerformanceSeries,
    /// Extremes and streaks.
    pub stats: PerformanceStats,
    /// Grouped aggregates.
    pub breakdowns: Breakdowns,
    /// Notes.
    pub notes: PerformanceNotes,
}
