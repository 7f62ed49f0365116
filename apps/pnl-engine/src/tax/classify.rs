//! Capital-gains classification of realized matches.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::policy::{HoldingTerm, TaxPolicy};
use crate::ledger::RealizedMatch;
use crate::metrics::constants::HUNDRED;

/// A realized match as it appears on the tax report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxableMatch {
    /// Symbol.
    pub symbol: String,
    /// Quantity.
    pub qty: u64,
    /// Entry time.
    pub entry_time: DateTime<Utc>,
    /// Exit time.
    pub exit_time: DateTime<Utc>,
    /// Entry price.
    pub entry_price: Decimal,
    /// Exit price.
    pub exit_price: Decimal,
    /// Net PnL.
    pub pnl: Decimal,
    /// Whole days held.
    pub holding_days: i64,
    /// Opening trade.
    pub entry_trade_id: String,
    /// Closing trade.
    pub exit_trade_id: String,
}

impl From<&RealizedMatch> for TaxableMatch {
    fn from(m: &RealizedMatch) -> Self {
        Self {
            symbol: m.symbol.clone(),
            qty: m.qty,
            entry_time: m.entry_time,
            exit_time: m.exit_time,
            entry_price: m.entry_price,
            exit_price: m.exit_price,
            pnl: m.pnl,
            holding_days: m.holding_days(),
            entry_trade_id: m.entry_trade_id.clone(),
            exit_trade_id: m.exit_trade_id.clone(),
        }
    }
}

/// Gains and losses of one holding-period bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBucket {
    /// Matches with positive PnL.
    pub gains: Vec<TaxableMatch>,
    /// Matches with negative PnL.
    pub losses: Vec<TaxableMatch>,
    /// Sum of gains.
    pub total_gains: Decimal,
    /// Sum of losses (non-positive).
    pub total_losses: Decimal,
    /// Gains plus losses.
    pub net: Decimal,
    /// Classified matches.
    pub count: usize,
}

impl TaxBucket {
    fn push(&mut self, m: TaxableMatch) {
        if m.pnl > Decimal::ZERO {
            self.total_gains += m.pnl;
            self.gains.push(m);
        } else if m.pnl < Decimal::ZERO {
            self.total_losses += m.pnl;
            self.losses.push(m);
        } else {
            return;
        }
        self.net = self.total_gains + self.total_losses;
        self.count += 1;
    }

    /// Net gain that is taxed; losses never push it below zero.
    #[must_use]
    pub fn taxable_gain(&self) -> Decimal {
        self.net.max(Decimal::ZERO)
    }
}

/// Bucket nets and the tax due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    /// Net of both buckets.
    pub total_realized_pnl: Decimal,
    /// Short-term net.
    pub net_short_term: Decimal,
    /// Long-term net.
    pub net_long_term: Decimal,
    /// Taxable short-term gain.
    pub short_term_taxable_gain: Decimal,
    /// Taxable long-term gain.
    pub long_term_taxable_gain: Decimal,
    /// Short-term tax.
    pub short_term_tax: Decimal,
    /// Long-term tax.
    pub long_term_tax: Decimal,
    /// Sum of both taxes.
    pub total_tax: Decimal,
}

/// Losses in a bucket that could offset that bucket's gains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestHint {
    /// Bucket holding the losses.
    pub term: HoldingTerm,
    /// Absolute value of the bucket's losses.
    pub available_loss: Decimal,
    /// Bucket whose gains the losses could offset.
    pub could_offset: HoldingTerm,
}

/// Tax classification for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReport {
    /// Year of the exits considered.
    pub tax_year: i32,
    /// Short-term bucket.
    pub short_term: TaxBucket,
    /// Long-term bucket.
    pub long_term: TaxBucket,
    /// Totals and tax due.
    pub summary: TaxSummary,
    /// Policy applied.
    pub policy: TaxPolicy,
    /// Informational harvesting hints.
    pub tax_loss_harvesting: Vec<HarvestHint>,
}

/// Realized PnL of one exit year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    /// Realized PnL.
    pub realized_pnl: Decimal,
    /// Matches.
    pub count: usize,
}

/// Classify the matches exiting in `tax_year`.
///
/// Zero-PnL matches fall in neither gains nor losses.
#[must_use]
pub fn classify(matches: &[RealizedMatch], tax_year: i32, policy: &TaxPolicy) -> TaxReport {
    let mut short_term = TaxBucket::default();
    let mut long_term = TaxBucket::default();

    for m in matches.iter().filter(|m| m.exit_time.year() == tax_year) {
        let row = TaxableMatch::from(m);
        match policy.term_for(row.holding_days) {
            HoldingTerm::ShortTerm => short_term.push(row),
            HoldingTerm::LongTerm => long_term.push(row),
        }
    }

    let short_term_taxable_gain = short_term.taxable_gain();
    let long_term_taxable_gain = long_term.taxable_gain();
    let short_term_tax = short_term_taxable_gain * policy.rate_for(HoldingTerm::ShortTerm) / HUNDRED;
    let long_term_tax = long_term_taxable_gain * policy.rate_for(HoldingTerm::LongTerm) / HUNDRED;

    let summary = TaxSummary {
        total_realized_pnl: short_term.net + long_term.net,
        net_short_term: short_term.net,
        net_long_term: long_term.net,
        short_term_taxable_gain,
        long_term_taxable_gain,
        short_term_tax,
        long_term_tax,
        total_tax: short_term_tax + long_term_tax,
    };

    let tax_loss_harvesting = [
        (HoldingTerm::ShortTerm, &short_term),
        (HoldingTerm::LongTerm, &long_term),
    ]
    .into_iter()
    .filter(|(_, bucket)| {
        bucket.total_losses < Decimal::ZERO && bucket.total_gains > Decimal::ZERO
    })
    .map(|(term, bucket)| HarvestHint {
        term,
        available_loss: bucket.total_losses.abs(),
        could_offset: term,
    })
    .collect();

    debug!(
        tax_year,
        short_term = short_term.count,
        long_term = long_term.count,
        total_tax = %summary.total_tax,
        "Tax classification complete"
    );

    TaxReport {
        tax_year,
        short_term,
        long_term,
        summary,
        policy: *policy,
        tax_loss_harvesting,
    }
}

/// Realized PnL and match count per exit year.
#[must_use]
pub fn tax_year_summary(matches: &[RealizedMatch]) -> BTreeMap<i32, YearSummary> {
    let mut years: BTreeMap<i32, YearSummary> = BTreeMap::new();
    for m in matches {
        let year = years.entry(m.exit_time.year()).or_default();
        year.realized_pnl += m.pnl;
        year.count += 1;
    }
    years
}
