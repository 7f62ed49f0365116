//! Metric input types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cumulative realized equity at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Time of the realization that produced this value.
    pub timestamp: DateTime<Utc>,
    /// Cumulative equity.
    pub equity: Decimal,
}

impl EquityPoint {
    /// Build a point.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, equity: Decimal) -> Self {
        Self { timestamp, equity }
    }
}
