//! Tax classification parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tax::TaxPolicy;

/// Holding-period threshold and bucket rates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxConfig {
    /// Days held before a match is long-term.
    #[serde(default = "default_long_term_days")]
    pub long_term_days: i64,
    /// Short-term rate in percent.
    #[serde(default = "default_short_term_rate")]
    pub short_term_rate: Decimal,
    /// Long-term rate in percent.
    #[serde(default = "default_long_term_rate")]
    pub long_term_rate: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            long_term_days: default_long_term_days(),
            short_term_rate: default_short_term_rate(),
            long_term_rate: default_long_term_rate(),
        }
    }
}

impl TaxConfig {
    /// Policy handed to the classifier.
    #[must_use]
    pub const fn to_policy(&self) -> TaxPolicy {
        TaxPolicy {
            long_term_days: self.long_term_days,
            short_term_rate: self.short_term_rate,
            long_term_rate: self.long_term_rate,
        }
    }
}

fn default_long_term_days() -> i64 {
    TaxPolicy::default().long_term_days
}

fn default_short_term_rate() -> Decimal {
    TaxPolicy::default().short_term_rate
}

fn default_long_term_rate() -> Decimal {
    TaxPolicy::default().long_term_rate
}
