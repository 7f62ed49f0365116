//! Trade-analysis views: calendar heatmap, time of day, symbol and strategy
//! matrices, win/loss distribution.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, Timelike};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::group::{GroupStats, group_by};
use crate::domain::{JournalTag, UNTAGGED};
use crate::ledger::RealizedMatch;
use crate::metrics::mean;

/// Number of histogram bins in [`win_loss_distribution`].
pub const DISTRIBUTION_BINS: usize = 20;

/// Realized PnL of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Exit date.
    pub date: NaiveDate,
    /// Year.
    pub year: i32,
    /// Month (1-12).
    pub month: u32,
    /// Day of month.
    pub day: u32,
    /// Realized PnL.
    pub pnl: Decimal,
}

/// First and last exit dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest date.
    pub min: Option<NaiveDate>,
    /// Latest date.
    pub max: Option<NaiveDate>,
}

/// Calendar heatmap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heatmap {
    /// Cells in date order.
    pub heatmap_data: Vec<HeatmapCell>,
    /// Covered dates.
    pub date_range: DateRange,
}

/// Aggregate for one hour of the day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourStats {
    /// Hour (0-23).
    pub hour: u32,
    /// Total PnL.
    pub total_pnl: Decimal,
    /// Mean PnL (0 when empty).
    pub avg_pnl: Decimal,
    /// Matches in the hour.
    pub count: u64,
    /// Winning matches.
    pub wins: u64,
    /// Losing matches.
    pub losses: u64,
}

/// Hour-of-day analysis; always 24 rows per list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    /// By entry hour.
    pub by_entry_hour: Vec<HourStats>,
    /// By exit hour.
    pub by_exit_hour: Vec<HourStats>,
}

/// One row of a symbol or strategy matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    /// Symbol or strategy.
    pub key: String,
    /// Total PnL.
    pub total_pnl: Decimal,
    /// Matches.
    pub matches: u64,
    /// Winning matches.
    pub wins: u64,
    /// Losing matches.
    pub losses: u64,
    /// Wins over all matches.
    pub win_rate: Decimal,
    /// Mean winning PnL.
    pub avg_win: Decimal,
    /// Mean losing PnL.
    pub avg_loss: Decimal,
    /// `|avg_win / avg_loss|`.
    pub payoff_ratio: Option<Decimal>,
}

/// One histogram bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBin {
    /// Position, 0-based.
    pub bin_index: usize,
    /// `"<start> to <end>"` rounded to whole units.
    pub label: String,
    /// Lower edge.
    pub range_start: Decimal,
    /// Upper edge.
    pub range_end: Decimal,
    /// Winning matches in the bin.
    pub wins: u64,
    /// Losing matches in the bin.
    pub losses: u64,
}

/// Distribution summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Winning matches.
    pub total_wins: u64,
    /// Losing matches.
    pub total_losses: u64,
    /// Mean win.
    pub avg_win: Decimal,
    /// Mean loss.
    pub avg_loss: Decimal,
    /// Largest win.
    pub max_win: Decimal,
    /// Most negative loss.
    pub max_loss: Decimal,
}

/// Histogram of non-zero match PnL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLossDistribution {
    /// Bins, empty when there are no decided matches.
    pub bins: Vec<DistributionBin>,
    /// Summary.
    pub summary: DistributionSummary,
}

/// Realized PnL per exit date.
#[must_use]
pub fn heatmap(matches: &[RealizedMatch]) -> Heatmap {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for m in matches {
        *by_date.entry(m.exit_time.date_naive()).or_default() += m.pnl;
    }

    Heatmap {
        date_range: DateRange {
            min: by_date.keys().next().copied(),
            max: by_date.keys().next_back().copied(),
        },
        heatmap_data: by_date
            .into_iter()
            .map(|(date, pnl)| HeatmapCell {
                date,
                year: date.year(),
                month: date.month(),
                day: date.day(),
                pnl,
            })
            .collect(),
    }
}

/// PnL by entry hour and by exit hour.
#[must_use]
pub fn time_of_day(matches: &[RealizedMatch]) -> TimeOfDay {
    let mut by_entry_hour = empty_hours();
    let mut by_exit_hour = empty_hours();

    for m in matches {
        add_to_hour(&mut by_entry_hour[m.entry_time.hour() as usize], m);
        add_to_hour(&mut by_exit_hour[m.exit_time.hour() as usize], m);
    }

    for row in by_entry_hour.iter_mut().chain(by_exit_hour.iter_mut()) {
        if row.count > 0 {
            row.avg_pnl = row.total_pnl / Decimal::from(row.count);
        }
    }

    TimeOfDay {
        by_entry_hour,
        by_exit_hour,
    }
}

fn empty_hours() -> Vec<HourStats> {
    (0..24)
        .map(|hour| HourStats {
            hour,
            ..HourStats::default()
        })
        .collect()
}

fn add_to_hour(row: &mut HourStats, m: &RealizedMatch) {
    row.total_pnl += m.pnl;
    row.count += 1;
    if m.is_win() {
        row.wins += 1;
    } else if m.is_loss() {
        row.losses += 1;
    }
}

/// Per-symbol matrix sorted by total PnL, highest first.
#[must_use]
pub fn symbol_matrix(matches: &[RealizedMatch]) -> Vec<MatrixRow> {
    matrix(group_by(matches, |m| m.symbol.clone()))
}

/// Per-strategy matrix keyed by the entry trade's tag.
///
/// Unlike the performance breakdowns, a match belongs to the strategy that
/// opened it.
#[must_use]
pub fn strategy_matrix(
    matches: &[RealizedMatch],
    tags: &HashMap<String, JournalTag>,
) -> Vec<MatrixRow> {
    matrix(group_by(matches, |m| {
        tags.get(&m.entry_trade_id)
            .map_or_else(|| UNTAGGED.to_string(), JournalTag::strategy_key)
    }))
}

fn matrix(groups: BTreeMap<String, GroupStats>) -> Vec<MatrixRow> {
    let mut rows: Vec<MatrixRow> = groups
        .into_iter()
        .map(|(key, stats)| {
            let avg_win = stats.avg_win();
            let avg_loss = stats.avg_loss();
            MatrixRow {
                key,
                total_pnl: stats.pnl,
                matches: stats.matches,
                wins: stats.wins,
                losses: stats.losses,
                win_rate: if stats.matches == 0 {
                    Decimal::ZERO
                } else {
                    Decimal::from(stats.wins) / Decimal::from(stats.matches)
                },
                avg_win,
                avg_loss,
                payoff_ratio: (!avg_loss.is_zero()).then(|| (avg_win / avg_loss).abs()),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total_pnl.cmp(&a.total_pnl));
    rows
}

/// Histogram of winning and losing PnL over equal-width bins.
///
/// The bins span the smallest to the largest non-zero PnL; the last bin is
/// closed on the right. Identical values share a single unit-wide bin range.
#[must_use]
pub fn win_loss_distribution(matches: &[RealizedMatch]) -> WinLossDistribution {
    let wins: Vec<Decimal> = matches.iter().filter(|m| m.is_win()).map(|m| m.pnl).collect();
    let losses: Vec<Decimal> = matches.iter().filter(|m| m.is_loss()).map(|m| m.pnl).collect();

    let (Some(min), Some(max)) = (
        wins.iter().chain(&losses).min().copied(),
        wins.iter().chain(&losses).max().copied(),
    ) else {
        return WinLossDistribution::default();
    };

    let bin_size = if max == min {
        Decimal::ONE
    } else {
        (max - min) / Decimal::from(DISTRIBUTION_BINS as u64)
    };

    let mut bins: Vec<DistributionBin> = (0..DISTRIBUTION_BINS)
        .map(|i| {
            let range_start = min + bin_size * Decimal::from(i as u64);
            let range_end = min + bin_size * Decimal::from(i as u64 + 1);
            DistributionBin {
                bin_index: i,
                label: format!("{} to {}", whole(range_start), whole(range_end)),
                range_start,
                range_end,
                wins: 0,
                losses: 0,
            }
        })
        .collect();

    let bin_of = |value: Decimal| {
        ((value - min) / bin_size)
            .floor()
            .to_usize()
            .unwrap_or(0)
            .min(DISTRIBUTION_BINS - 1)
    };
    for win in &wins {
        bins[bin_of(*win)].wins += 1;
    }
    for loss in &losses {
        bins[bin_of(*loss)].losses += 1;
    }

    let average = |values: &[Decimal]| mean(values).unwrap_or(Decimal::ZERO);

    WinLossDistribution {
        bins,
        summary: DistributionSummary {
            total_wins: wins.len() as u64,
            total_losses: losses.len() as u64,
            avg_win: average(&wins),
            avg_loss: average(&losses),
            max_win: wins.iter().max().copied().unwrap_or(Decimal::ZERO),
            max_loss: losses.iter().min().copied().unwrap_or(Decimal::ZERO),
        },
    }
}

fn whole(value: Decimal) -> Decimal {
    let rounded = value.round_dp(0);
    if rounded.is_zero() { Decimal::ZERO } else { rounded }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::PositionSide;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn closed(
        symbol: &str,
        exit_id: &str,
        entry: DateTime<Utc>,
        exit: DateTime<Utc>,
        pnl: Decimal,
    ) -> RealizedMatch {
        RealizedMatch {
            symbol: symbol.to_string(),
            qty: 1,
            entry_trade_id: format!("{exit_id}-entry"),
            exit_trade_id: exit_id.to_string(),
            entry_price: dec!(50),
            exit_price: dec!(50) + pnl,
            entry_time: entry,
            exit_time: exit,
            side_closed: PositionSide::Long,
            pnl,
        }
    }

    #[test]
    fn test_heatmap() {
        assert_eq!(heatmap(&[]), Heatmap::default());

        let matches = vec![
            closed("A", "x1", at(3, 9), at(5, 10), dec!(10)),
            closed("A", "x2", at(1, 9), at(2, 10), dec!(-3)),
            closed("B", "x3", at(1, 9), at(5, 16), dec!(4)),
        ];
        let map = heatmap(&matches);

        assert_eq!(map.heatmap_data.len(), 2);
        assert_eq!(map.heatmap_data[0].day, 2);
        assert_eq!(map.heatmap_data[0].month, 6);
        assert_eq!(map.heatmap_data[1].pnl, dec!(14));
        assert_eq!(map.date_range.min, NaiveDate::from_ymd_opt(2024, 6, 2));
        assert_eq!(map.date_range.max, NaiveDate::from_ymd_opt(2024, 6, 5));
    }

    #[test]
    fn test_time_of_day_has_all_hours() {
        let matches = vec![
            closed("A", "x1", at(1, 9), at(1, 15), dec!(10)),
            closed("A", "x2", at(1, 9), at(1, 16), dec!(-4)),
        ];
        let view = time_of_day(&matches);

        assert_eq!(view.by_entry_hour.len(), 24);
        assert_eq!(view.by_exit_hour.len(), 24);

        let nine = &view.by_entry_hour[9];
        assert_eq!(nine.count, 2);
        assert_eq!(nine.wins, 1);
        assert_eq!(nine.losses, 1);
        assert_eq!(nine.avg_pnl, dec!(3));

        assert_eq!(view.by_exit_hour[15].total_pnl, dec!(10));
        assert_eq!(view.by_exit_hour[0].avg_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_symbol_matrix() {
        let matches = vec![
            closed("A", "x1", at(1, 9), at(1, 10), dec!(30)),
            closed("A", "x2", at(1, 9), at(1, 11), dec!(-10)),
            closed("A", "x3", at(1, 9), at(1, 12), Decimal::ZERO),
            closed("B", "x4", at(1, 9), at(1, 13), dec!(50)),
        ];
        let rows = symbol_matrix(&matches);

        assert_eq!(rows[0].key, "B");
        assert_eq!(rows[0].payoff_ratio, None);

        let a = &rows[1];
        assert_eq!(a.total_pnl, dec!(20));
        assert_eq!(a.matches, 3);
        assert_eq!(a.avg_win, dec!(30));
        assert_eq!(a.avg_loss, dec!(-10));
        assert_eq!(a.payoff_ratio, Some(dec!(3)));
        // zero-PnL match counts in the denominator
        assert_eq!(a.win_rate, Decimal::ONE / Decimal::from(3));
    }

    #[test]
    fn test_strategy_matrix_uses_entry_tags() {
        let matches = vec![
            closed("A", "x1", at(1, 9), at(1, 10), dec!(5)),
            closed("A", "x2", at(1, 9), at(1, 11), dec!(7)),
        ];
        let tags = HashMap::from([
            (
                "x1".to_string(),
                JournalTag {
                    strategy: Some("scalp".to_string()),
                    emotion: None,
                },
            ),
            (
                "x2-entry".to_string(),
                JournalTag {
                    strategy: Some("swing".to_string()),
                    emotion: None,
                },
            ),
        ]);

        let rows = strategy_matrix(&matches, &tags);
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        // x1 is tagged only on its exit, x2 on its entry
        assert_eq!(keys, vec!["swing", UNTAGGED]);
        assert_eq!(rows[0].total_pnl, dec!(7));
    }

    #[test]
    fn test_distribution_bins() {
        assert_eq!(win_loss_distribution(&[]), WinLossDistribution::default());

        let matches = vec![
            closed("A", "x1", at(1, 9), at(1, 10), dec!(10)),
            closed("A", "x2", at(1, 9), at(1, 11), dec!(30)),
            closed("A", "x3", at(1, 9), at(1, 12), dec!(-10)),
            closed("A", "x4", at(1, 9), at(1, 13), Decimal::ZERO),
        ];
        let dist = win_loss_distribution(&matches);

        assert_eq!(dist.bins.len(), DISTRIBUTION_BINS);
        assert_eq!(dist.bins[0].losses, 1);
        assert_eq!(dist.bins[0].label, "-10 to -8");
        assert_eq!(dist.bins[10].wins, 1);
        assert_eq!(dist.bins[19].wins, 1);
        assert_eq!(dist.bins.iter().map(|b| b.wins + b.losses).sum::<u64>(), 3);

        assert_eq!(dist.summary.total_wins, 2);
        assert_eq!(dist.summary.total_losses, 1);
        assert_eq!(dist.summary.avg_win, dec!(20));
        assert_eq!(dist.summary.max_win, dec!(30));
        assert_eq!(dist.summary.max_loss, dec!(-10));
    }

    #[test]
    fn test_distribution_identical_values() {
        let matches = vec![
            closed("A", "x1", at(1, 9), at(1, 10), dec!(5)),
            closed("A", "x2", at(1, 9), at(1, 11), dec!(5)),
        ];
        let dist = win_loss_distribution(&matches);
        assert_eq!(dist.bins[0].wins, 2);
        assert_eq!(dist.bins[0].range_end, dec!(6));
    }
}
