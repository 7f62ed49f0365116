//! Overview aggregation.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::types::{AdvancedMetrics, MarkSource, OpenPosition, Snapshot, SnapshotNotes, TimeBuckets};
use crate::domain::{PositionSide, Trade, normalize_symbol};
use crate::error::AnalyticsError;
use crate::ledger::{MatchOutcome, RealizedMatch, match_trades, unrealized_by_symbol};
use crate::metrics::{
    average_holding_period_days, calmar_ratio, equity_curve, expectancy, max_drawdown, mean,
    profit_factor, sharpe_ratio, sortino_ratio,
};

/// Builds portfolio snapshots from an account's trades.
#[derive(Debug, Clone, Default)]
pub struct OverviewCalculator {
    risk_free_rate: Decimal,
}

impl OverviewCalculator {
    /// Create a calculator with a zero risk-free rate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the risk-free rate subtracted by Sharpe and Sortino.
    pub const fn set_risk_free_rate(&mut self, rate: Decimal) {
        self.risk_free_rate = rate;
    }

    /// Match `trades` and value the open lots.
    ///
    /// Caller marks override last-trade marks when positive. With `strict`,
    /// any open symbol lacking such a mark fails the call.
    pub fn calculate(
        &self,
        trades: &[Trade],
        marks: &BTreeMap<String, Decimal>,
        strict: bool,
    ) -> Result<Snapshot, AnalyticsError> {
        let outcome = match_trades(trades);
        let provided = usable_marks(marks);

        let missing_marks: Vec<String> = outcome
            .open_symbols()
            .filter(|symbol| !provided.contains_key(*symbol))
            .map(str::to_string)
            .collect();

        if strict && !missing_marks.is_empty() {
            warn!(symbols = ?missing_marks, "Strict overview rejected: missing marks");
            return Err(AnalyticsError::MissingMarks {
                symbols: missing_marks,
            });
        }

        let mark_price_source = if provided.is_empty() {
            MarkSource::LastTrade
        } else {
            MarkSource::ProvidedWithLastTradeFallback
        };

        let mut effective = outcome.marks.clone();
        effective.extend(provided);

        debug!(
            source = ?mark_price_source,
            missing = missing_marks.len(),
            "Resolved mark prices"
        );

        Ok(self.build_snapshot(
            &outcome,
            &effective,
            SnapshotNotes {
                mark_price_source,
                missing_marks,
            },
        ))
    }

    fn build_snapshot(
        &self,
        outcome: &MatchOutcome,
        effective: &BTreeMap<String, Decimal>,
        notes: SnapshotNotes,
    ) -> Snapshot {
        let unrealized = unrealized_by_symbol(&outcome.positions, effective);

        let mut realized: Vec<&RealizedMatch> = outcome.realized.iter().collect();
        realized.sort_by_key(|m| m.exit_time);

        let realized_pnl: Decimal = realized.iter().map(|m| m.pnl).sum();
        let unrealized_pnl: Decimal = unrealized.values().copied().sum();

        let (wins, losses) = split_outcomes(&realized);
        let win_rate = win_rate(wins.len(), losses.len());
        let avg_win = mean(&wins).unwrap_or(Decimal::ZERO);
        let avg_loss = mean(&losses).unwrap_or(Decimal::ZERO);
        let risk_reward_ratio = (avg_loss < Decimal::ZERO).then(|| avg_win / avg_loss.abs());

        let drawdown = max_drawdown(&equity_curve(&outcome.realized));

        let returns: Vec<Decimal> = realized.iter().map(|m| m.pnl).collect();
        let advanced_metrics = AdvancedMetrics {
            sharpe_ratio: sharpe_ratio(&returns, self.risk_free_rate),
            sortino_ratio: sortino_ratio(&returns, self.risk_free_rate),
            calmar_ratio: calmar_ratio(realized_pnl, drawdown),
            profit_factor: profit_factor(wins.iter().sum(), losses.iter().sum()),
            expectancy: expectancy(&wins, &losses, win_rate),
            avg_holding_period_days: average_holding_period_days(&outcome.realized),
        };

        Snapshot {
            realized_pnl,
            unrealized_pnl,
            total_pnl: realized_pnl + unrealized_pnl,
            win_rate,
            avg_win,
            avg_loss,
            drawdown,
            risk_reward_ratio,
            advanced_metrics,
            time_buckets: time_buckets(&realized),
            open_positions: open_positions(outcome, effective, &unrealized),
            notes,
        }
    }
}

/// Snapshot with a zero risk-free rate.
pub fn overview(
    trades: &[Trade],
    marks: &BTreeMap<String, Decimal>,
    strict: bool,
) -> Result<Snapshot, AnalyticsError> {
    OverviewCalculator::new().calculate(trades, marks, strict)
}

/// All realized matches ordered by exit time.
#[must_use]
pub fn realized_matches(trades: &[Trade]) -> Vec<RealizedMatch> {
    let mut realized = match_trades(trades).realized;
    realized.sort_by_key(|m| m.exit_time);
    realized
}

/// `wins / max(1, wins + losses)`.
pub(crate) fn win_rate(wins: usize, losses: usize) -> Decimal {
    let decided = (wins + losses).max(1);
    Decimal::from(wins as u64) / Decimal::from(decided as u64)
}

/// Winning and losing PnLs; zero PnL lands in neither.
fn split_outcomes(matches: &[&RealizedMatch]) -> (Vec<Decimal>, Vec<Decimal>) {
    let wins = matches.iter().filter(|m| m.is_win()).map(|m| m.pnl).collect();
    let losses = matches.iter().filter(|m| m.is_loss()).map(|m| m.pnl).collect();
    (wins, losses)
}

fn usable_marks(marks: &BTreeMap<String, Decimal>) -> BTreeMap<String, Decimal> {
    marks
        .iter()
        .filter(|(_, price)| **price > Decimal::ZERO)
        .map(|(symbol, price)| (normalize_symbol(symbol), *price))
        .collect()
}

fn time_buckets(realized: &[&RealizedMatch]) -> TimeBuckets {
    let mut buckets = TimeBuckets::default();
    for m in realized {
        *buckets.pnl_by_hour.entry(m.exit_time.hour()).or_default() += m.pnl;
        *buckets
            .pnl_by_weekday
            .entry(m.exit_time.weekday().num_days_from_monday())
            .or_default() += m.pnl;
    }
    buckets
}

fn open_positions(
    outcome: &MatchOutcome,
    effective: &BTreeMap<String, Decimal>,
    unrealized: &BTreeMap<String, Decimal>,
) -> Vec<OpenPosition> {
    let mut rows = Vec::new();

    for (symbol, position) in &outcome.positions {
        let mark_price = effective.get(symbol).copied().unwrap_or(Decimal::ZERO);
        let unrealized_pnl = unrealized.get(symbol).copied().unwrap_or(Decimal::ZERO);

        let sides = [
            (PositionSide::Long, position.long_qty(), position.avg_long_cost()),
            (PositionSide::Short, position.short_qty(), position.avg_short_proceeds()),
        ];

        for (side, quantity, avg_cost) in sides {
            let Some(avg_cost) = avg_cost else {
                continue;
            };
            rows.push(OpenPosition {
                symbol: symbol.clone(),
                side,
                quantity,
                avg_cost,
                mark_price,
                unrealized_pnl,
            });
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::Side;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn buy(id: &str, symbol: &str, qty: u64, price: Decimal, time: DateTime<Utc>) -> Trade {
        Trade::new(id, symbol, Side::Buy, qty, price, time)
    }

    fn sell(id: &str, symbol: &str, qty: u64, price: Decimal, time: DateTime<Utc>) -> Trade {
        Trade::new(id, symbol, Side::Sell, qty, price, time)
    }

    #[test]
    fn test_empty_trades() {
        let Ok(snapshot) = overview(&[], &BTreeMap::new(), true) else {
            panic!("empty account should produce a snapshot");
        };
        assert_eq!(snapshot.realized_pnl, Decimal::ZERO);
        assert_eq!(snapshot.win_rate, Decimal::ZERO);
        assert_eq!(snapshot.drawdown, Decimal::ZERO);
        assert_eq!(snapshot.risk_reward_ratio, None);
        assert_eq!(snapshot.advanced_metrics, AdvancedMetrics::default());
        assert!(snapshot.open_positions.is_empty());
        assert_eq!(snapshot.notes.mark_price_source, MarkSource::LastTrade);
    }

    #[test]
    fn test_win_rate_and_averages() {
        let trades = vec![
            buy("b1", "A", 1, dec!(100), at(1, 10)),
            sell("s1", "A", 1, dec!(130), at(1, 11)),
            buy("b2", "A", 1, dec!(100), at(2, 10)),
            sell("s2", "A", 1, dec!(90), at(2, 11)),
            buy("b3", "A", 1, dec!(100), at(3, 10)),
            sell("s3", "A", 1, dec!(100), at(3, 11)),
        ];
        let Ok(snapshot) = overview(&trades, &BTreeMap::new(), false) else {
            panic!("overview should succeed");
        };
        assert_eq!(snapshot.realized_pnl, dec!(20));
        assert_eq!(snapshot.win_rate, dec!(0.5));
        assert_eq!(snapshot.avg_win, dec!(30));
        assert_eq!(snapshot.avg_loss, dec!(-10));
        assert_eq!(snapshot.risk_reward_ratio, Some(dec!(3)));
        assert_eq!(snapshot.drawdown, dec!(10));
        assert_eq!(snapshot.advanced_metrics.profit_factor, Some(dec!(3)));
        assert_eq!(snapshot.advanced_metrics.calmar_ratio, Some(dec!(2)));
    }

    #[test]
    fn test_time_buckets_use_exit_time() {
        // 2024-01-01 is a Monday
        let trades = vec![
            buy("b1", "A", 2, dec!(10), at(1, 9)),
            sell("s1", "A", 1, dec!(15), at(1, 14)),
            sell("s2", "A", 1, dec!(12), at(3, 14)),
        ];
        let Ok(snapshot) = overview(&trades, &BTreeMap::new(), false) else {
            panic!("overview should succeed");
        };
        assert_eq!(snapshot.time_buckets.pnl_by_hour.len(), 1);
        assert_eq!(snapshot.time_buckets.pnl_by_hour[&14], dec!(7));
        assert_eq!(snapshot.time_buckets.pnl_by_weekday[&0], dec!(5));
        assert_eq!(snapshot.time_buckets.pnl_by_weekday[&2], dec!(2));
    }

    #[test]
    fn test_provided_mark_overrides_last_trade() {
        let trades = vec![buy("b1", "A", 10, dec!(100), at(1, 10))];
        let marks = BTreeMap::from([("a".to_string(), dec!(110))]);

        let Ok(snapshot) = overview(&trades, &marks, true) else {
            panic!("strict overview should succeed when every mark is supplied");
        };
        assert_eq!(snapshot.unrealized_pnl, dec!(100));
        assert_eq!(snapshot.total_pnl, dec!(100));
        assert_eq!(
            snapshot.notes.mark_price_source,
            MarkSource::ProvidedWithLastTradeFallback
        );
        assert!(snapshot.notes.missing_marks.is_empty());

        let position = &snapshot.open_positions[0];
        assert_eq!(position.side, PositionSide::Long);
        assert_eq!(position.quantity, 10);
        assert_eq!(position.avg_cost, dec!(100));
        assert_eq!(position.mark_price, dec!(110));
    }

    #[test]
    fn test_non_positive_mark_is_ignored() {
        let trades = vec![buy("b1", "A", 1, dec!(50), at(1, 10))];
        let marks = BTreeMap::from([("A".to_string(), Decimal::ZERO)]);

        let Err(err) = overview(&trades, &marks, true) else {
            panic!("a zero mark must not satisfy strict mode");
        };
        assert_eq!(
            err,
            AnalyticsError::MissingMarks {
                symbols: vec!["A".to_string()]
            }
        );

        let Ok(snapshot) = overview(&trades, &marks, false) else {
            panic!("non-strict overview should succeed");
        };
        assert_eq!(snapshot.notes.mark_price_source, MarkSource::LastTrade);
        assert_eq!(snapshot.open_positions[0].mark_price, dec!(50));
    }

    #[test]
    fn test_short_open_position_row() {
        let trades = vec![sell("s1", "S", 4, dec!(50), at(1, 10)).with_fees(dec!(2))];
        let Ok(snapshot) = overview(&trades, &BTreeMap::new(), false) else {
            panic!("overview should succeed");
        };
        let position = &snapshot.open_positions[0];
        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.avg_cost, dec!(49.5));
        assert_eq!(position.unrealized_pnl, dec!(-2));
    }

    #[test]
    fn test_risk_free_rate_is_applied() {
        let trades = vec![
            buy("b1", "A", 1, dec!(100), at(1, 10)),
            sell("s1", "A", 1, dec!(101), at(1, 11)),
            buy("b2", "A", 1, dec!(100), at(2, 10)),
            sell("s2", "A", 1, dec!(103), at(2, 11)),
        ];
        let mut calculator = OverviewCalculator::new();
        let Ok(base) = calculator.calculate(&trades, &BTreeMap::new(), false) else {
            panic!("overview should succeed");
        };
        calculator.set_risk_free_rate(dec!(2));
        let Ok(adjusted) = calculator.calculate(&trades, &BTreeMap::new(), false) else {
            panic!("overview should succeed");
        };

        let (Some(base_sharpe), Some(adjusted_sharpe)) = (
            base.advanced_metrics.sharpe_ratio,
            adjusted.advanced_metrics.sharpe_ratio,
        ) else {
            panic!("sharpe should exist for two distinct returns");
        };
        assert!(adjusted_sharpe < base_sharpe);
        assert_eq!(adjusted_sharpe, Decimal::ZERO);
    }

    #[test]
    fn test_realized_matches_sorted_by_exit() {
        let trades = vec![
            buy("b1", "A", 1, dec!(10), at(1, 9)),
            buy("b2", "B", 1, dec!(10), at(1, 9)),
            sell("s2", "B", 1, dec!(11), at(2, 9)),
            sell("s1", "A", 1, dec!(12), at(3, 9)),
        ];
        let matches = realized_matches(&trades);
        let exits: Vec<&str> = matches.iter().map(|m| m.exit_trade_id.as_str()).collect();
        assert_eq!(exits, vec!["s2", "s1"]);
    }
}
