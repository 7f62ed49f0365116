//! Side-by-side comparison of two trading periods.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::overview;
use super::types::Snapshot;
use crate::domain::Trade;
use crate::error::AnalyticsError;
use crate::metrics::constants::HUNDRED;

/// Inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    /// Window start (inclusive).
    pub start: DateTime<Utc>,
    /// Window end (inclusive).
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    /// Build a window.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether `time` falls inside the window.
    #[must_use]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Snapshot of the trades inside one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodReport {
    /// The window.
    pub window: PeriodWindow,
    /// Trades executed inside it.
    pub trade_count: usize,
    /// Non-strict snapshot of those trades alone.
    pub analytics: Snapshot,
}

/// Second period minus first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDelta {
    /// Realized PnL difference.
    pub pnl_difference: Decimal,
    /// Realized PnL change in percent of `|first|`; zero when first is zero.
    pub pnl_percent_change: Decimal,
    /// Win-rate difference.
    pub win_rate_difference: Decimal,
    /// Trade-count difference.
    pub trade_count_difference: i64,
    /// Average-win difference.
    pub avg_win_difference: Decimal,
    /// Average-loss difference.
    pub avg_loss_difference: Decimal,
    /// Drawdown difference.
    pub drawdown_difference: Decimal,
}

/// Both periods and their delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodComparison {
    /// Baseline period.
    pub first: PeriodReport,
    /// Compared period.
    pub second: PeriodReport,
    /// Differences.
    pub comparison: PeriodDelta,
}

/// Compare two windows of the same account.
///
/// Each window is matched on its own, so lots opened before a window start
/// are not visible inside it.
pub fn compare_periods(
    trades: &[Trade],
    first: PeriodWindow,
    second: PeriodWindow,
) -> Result<PeriodComparison, AnalyticsError> {
    let first = period_report(trades, first)?;
    let second = period_report(trades, second)?;

    let a = &first.analytics;
    let b = &second.analytics;

    let pnl_difference = b.realized_pnl - a.realized_pnl;
    let pnl_percent_change = if a.realized_pnl == Decimal::ZERO {
        Decimal::ZERO
    } else {
        pnl_difference / a.realized_pnl.abs() * HUNDRED
    };

    let comparison = PeriodDelta {
        pnl_difference,
        pnl_percent_change,
        win_rate_difference: b.win_rate - a.win_rate,
        trade_count_difference: second.trade_count as i64 - first.trade_count as i64,
        avg_win_difference: b.avg_win - a.avg_win,
        avg_loss_difference: b.avg_loss - a.avg_loss,
        drawdown_difference: b.drawdown - a.drawdown,
    };

    Ok(PeriodComparison {
        first,
        second,
        comparison,
    })
}

fn period_report(trades: &[Trade], window: PeriodWindow) -> Result<PeriodReport, AnalyticsError> {
    let inside: Vec<Trade> = trades
        .iter()
        .filter(|t| window.contains(t.trade_time))
        .cloned()
        .collect();

    Ok(PeriodReport {
        window,
        trade_count: inside.len(),
        analytics: overview(&inside, &BTreeMap::new(), false)?,
    })
}
