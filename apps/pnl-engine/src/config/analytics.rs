//! Analytics parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters for the overview and its ratios.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Risk-free rate subtracted by Sharpe and Sortino, in [0, 1].
    #[serde(default)]
    pub risk_free_rate: Decimal,
    /// Fail the overview when an open symbol has no supplied mark.
    #[serde(default)]
    pub strict_marks: bool,
}
