//! Display helpers for metrics.

use rust_decimal::Decimal;

use super::constants::HUNDRED;

/// Format a fraction as a percentage, e.g. `0.6` -> `60.00%`.
#[must_use]
pub fn format_pct(value: Decimal) -> String {
    format!("{:.2}%", (value * HUNDRED).round_dp(2))
}

/// Format a money amount with an explicit sign, e.g. `+220.00`.
#[must_use]
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded > Decimal::ZERO {
        format!("+{rounded:.2}")
    } else {
        format!("{rounded:.2}")
    }
}

/// Format an optional ratio; absent values render as `N/A`.
#[must_use]
pub fn format_ratio(value: Option<Decimal>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", v.round_dp(2)))
}
