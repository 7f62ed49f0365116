//! Per-key accumulator shared by breakdowns and matrices.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::ledger::RealizedMatch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct GroupStats {
    pub pnl: Decimal,
    pub matches: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_pnl: Decimal,
    pub loss_pnl: Decimal,
    /// Position of the key's first match in the input.
    pub first_seen: usize,
}

impl GroupStats {
    pub fn record(&mut self, m: &RealizedMatch) {
        self.pnl += m.pnl;
        self.matches += 1;
        if m.is_win() {
            self.wins += 1;
            self.win_pnl += m.pnl;
        } else if m.is_loss() {
            self.losses += 1;
            self.loss_pnl += m.pnl;
        }
    }

    pub fn avg_win(&self) -> Decimal {
        if self.wins == 0 {
            return Decimal::ZERO;
        }
        self.win_pnl / Decimal::from(self.wins)
    }

    pub fn avg_loss(&self) -> Decimal {
        if self.losses == 0 {
            return Decimal::ZERO;
        }
        self.loss_pnl / Decimal::from(self.losses)
    }
}

/// Group `matches` under the key produced by `key_of`.
pub(crate) fn group_by<'a, I, F>(matches: I, mut key_of: F) -> BTreeMap<String, GroupStats>
where
    I: IntoIterator<Item = &'a RealizedMatch>,
    F: FnMut(&RealizedMatch) -> String,
{
    let mut groups: BTreeMap<String, GroupStats> = BTreeMap::new();
    for m in matches {
        let first_seen = groups.len();
        groups
            .entry(key_of(m))
            .or_insert_with(|| GroupStats {
                first_seen,
                ..GroupStats::default()
            })
            .record(m);
    }
    groups
}
