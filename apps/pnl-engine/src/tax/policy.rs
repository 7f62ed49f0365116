//! Holding-period threshold and tax rates.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Default days held before a match counts as long-term.
pub const DEFAULT_LONG_TERM_DAYS: i64 = 365;

/// Classification threshold and bucket rates (percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// Minimum whole days held for long-term treatment.
    pub long_term_days: i64,
    /// Short-term rate in percent.
    pub short_term_rate: Decimal,
    /// Long-term rate in percent.
    pub long_term_rate: Decimal,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            long_term_days: DEFAULT_LONG_TERM_DAYS,
            short_term_rate: dec!(15),
            long_term_rate: dec!(10),
        }
    }
}

/// Holding-period bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldingTerm {
    /// Held less than the threshold.
    ShortTerm,
    /// Held at least the threshold.
    LongTerm,
}

impl TaxPolicy {
    /// Bucket for a holding period in whole days.
    #[must_use]
    pub const fn term_for(&self, holding_days: i64) -> HoldingTerm {
        if holding_days >= self.long_term_days {
            HoldingTerm::LongTerm
        } else {
            HoldingTerm::ShortTerm
        }
    }

    /// Rate applied to a bucket.
    #[must_use]
    pub const fn rate_for(&self, term: HoldingTerm) -> Decimal {
        match term {
            HoldingTerm::ShortTerm => self.short_term_rate,
            HoldingTerm::LongTerm => self.long_term_rate,
        }
    }
}
