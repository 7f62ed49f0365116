//! Time-series and grouped performance over realized matches.
//!
//! A match's PnL is attributed to the tags of its exit trade.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::group::{GroupStats, group_by};
use super::types::{
    Breakdown, Breakdowns, DailyEquity, DailyPnl, PerformanceNotes, PerformanceReport,
    PerformanceSeries, PerformanceStats, WeeklyPnl,
};
use crate::domain::{JournalEntry, JournalTag, Trade, latest_tags};
use crate::ledger::RealizedMatch;
use crate::overview::{realized_matches, win_rate};

/// Build the performance report for `matches` and per-trade `tags`.
#[must_use]
pub fn performance(
    matches: &[RealizedMatch],
    tags: &HashMap<String, JournalTag>,
) -> PerformanceReport {
    let mut ordered: Vec<&RealizedMatch> = matches.iter().collect();
    ordered.sort_by_key(|m| m.exit_time);

    let mut pnl_by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    let mut pnl_by_week: BTreeMap<String, Decimal> = BTreeMap::new();
    for m in &ordered {
        *pnl_by_day.entry(m.exit_time.date_naive()).or_default() += m.pnl;
        let week = m.exit_time.iso_week();
        *pnl_by_week
            .entry(format!("{}-W{:02}", week.year(), week.week()))
            .or_default() += m.pnl;
    }

    let series = PerformanceSeries {
        daily_realized_pnl: pnl_by_day
            .iter()
            .map(|(date, pnl)| DailyPnl {
                date: *date,
                pnl: *pnl,
            })
            .collect(),
        weekly_realized_pnl: pnl_by_week
            .into_iter()
            .map(|(week, pnl)| WeeklyPnl { week, pnl })
            .collect(),
        equity_curve: pnl_by_day
            .iter()
            .scan(Decimal::ZERO, |equity, (date, pnl)| {
                *equity += *pnl;
                Some(DailyEquity {
                    date: *date,
                    equity: *equity,
                })
            })
            .collect(),
    };

    let (max_win_streak, max_loss_streak) = streaks(&ordered);
    let (best_day, worst_day) = extreme_days(&series.daily_realized_pnl);

    let no_tag = JournalTag::default();
    let tag_of = |m: &RealizedMatch| tags.get(&m.exit_trade_id).unwrap_or(&no_tag);

    let breakdowns = Breakdowns {
        by_symbol: finalize(group_by(ordered.iter().copied(), |m| m.symbol.clone())),
        by_strategy: finalize(group_by(ordered.iter().copied(), |m| {
            tag_of(m).strategy_key()
        })),
        by_emotion: finalize(group_by(ordered.iter().copied(), |m| {
            tag_of(m).emotion_key()
        })),
    };

    PerformanceReport {
        series,
        stats: PerformanceStats {
            best_day,
            worst_day,
            max_win_streak,
            max_loss_streak,
        },
        breakdowns,
        notes: PerformanceNotes::default(),
    }
}

/// Match `trades` and build the report with journal tags resolved.
#[must_use]
pub fn performance_from_trades(trades: &[Trade], journal: &[JournalEntry]) -> PerformanceReport {
    performance(&realized_matches(trades), &latest_tags(journal))
}

/// Longest win and loss runs; a zero-PnL match breaks both.
fn streaks(ordered: &[&RealizedMatch]) -> (u32, u32) {
    let (mut max_win, mut max_loss) = (0, 0);
    let (mut win, mut loss) = (0, 0);

    for m in ordered {
        if m.is_win() {
            win += 1;
            loss = 0;
        } else if m.is_loss() {
            loss += 1;
            win = 0;
        } else {
            win = 0;
            loss = 0;
        }
        max_win = max_win.max(win);
        max_loss = max_loss.max(loss);
    }

    (max_win, max_loss)
}

/// Best and worst days; the earliest wins a tie.
fn extreme_days(daily: &[DailyPnl]) -> (Option<DailyPnl>, Option<DailyPnl>) {
    let mut best: Option<&DailyPnl> = None;
    let mut worst: Option<&DailyPnl> = None;

    for day in daily {
        if best.is_none_or(|b| day.pnl > b.pnl) {
            best = Some(day);
        }
        if worst.is_none_or(|w| day.pnl < w.pnl) {
            worst = Some(day);
        }
    }

    (best.cloned(), worst.cloned())
}

/// Rows by absolute PnL, largest first; ties keep first-appearance order.
fn finalize(groups: BTreeMap<String, GroupStats>) -> Vec<Breakdown> {
    let mut ranked: Vec<(usize, Breakdown)> = groups
        .into_iter()
        .map(|(key, stats)| {
            let row = Breakdown {
                key,
                pnl: stats.pnl,
                matches: stats.matches,
                win_rate: win_rate(stats.wins as usize, stats.losses as usize),
            };
            (stats.first_seen, row)
        })
        .collect();
    ranked.sort_by(|(a_seen, a), (b_seen, b)| {
        b.pnl.abs().cmp(&a.pnl.abs()).then(a_seen.cmp(b_seen))
    });
    ranked.into_iter().map(|(_, row)| row).collect()
}
