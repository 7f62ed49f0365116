//! Statistical metrics over realized PnL.
//!
//! Every function is pure and returns `None` for degenerate input (empty
//! series, single points, zero denominators) instead of failing:
//! - Maximum drawdown (peak-to-trough decline)
//! - Sharpe and Sortino ratios
//! - Calmar ratio, profit factor, expectancy
//! - Average holding period

pub(crate) mod constants;
mod format;
mod math;
mod ratios;
mod types;

pub use format::{format_money, format_pct, format_ratio};
pub use math::{downside_rms, mean, sqrt_decimal, std_dev};
pub use ratios::{
    average_holding_period_days, calmar_ratio, equity_curve, expectancy, max_drawdown,
    profit_factor, sharpe_ratio, sortino_ratio,
};
pub use types::EquityPoint;
