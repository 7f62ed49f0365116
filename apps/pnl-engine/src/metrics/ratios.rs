//! Drawdown and risk-adjusted ratios.

use rust_decimal::Decimal;

use super::constants::SECONDS_PER_DAY;
use super::math::{downside_rms, mean, std_dev};
use super::types::EquityPoint;
use crate::ledger::RealizedMatch;

/// Cumulative realized PnL ordered by exit time (stable for ties).
#[must_use]
pub fn equity_curve(matches: &[RealizedMatch]) -> Vec<EquityPoint> {
    let mut ordered: Vec<&RealizedMatch> = matches.iter().collect();
    ordered.sort_by_key(|m| m.exit_time);

    let mut equity = Decimal::ZERO;
    ordered
        .into_iter()
        .map(|m| {
            equity += m.pnl;
            EquityPoint::new(m.exit_time, equity)
        })
        .collect()
}

/// Largest drop from a running peak; the peak starts at the first point.
///
/// Returns zero for an empty curve.
#[must_use]
pub fn max_drawdown(curve: &[EquityPoint]) -> Decimal {
    let Some(first) = curve.first() else {
        return Decimal::ZERO;
    };

    let mut peak = first.equity;
    let mut max_dd = Decimal::ZERO;

    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        }
        let drawdown = peak - point.equity;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }

    max_dd
}

/// `(mean - rf) / sample std`; needs two points and a nonzero deviation.
#[must_use]
pub fn sharpe_ratio(returns: &[Decimal], risk_free_rate: Decimal) -> Option<Decimal> {
    if returns.len() < 2 {
        return None;
    }

    let avg = mean(returns)?;
    let std = std_dev(returns)?;

    if std == Decimal::ZERO {
        return None;
    }

    avg.checked_sub(risk_free_rate)?.checked_div(std)
}

/// Like [`sharpe_ratio`] with the RMS of negative returns as denominator.
#[must_use]
pub fn sortino_ratio(returns: &[Decimal], risk_free_rate: Decimal) -> Option<Decimal> {
    if returns.len() < 2 {
        return None;
    }

    let avg = mean(returns)?;
    let downside = downside_rms(returns)?;

    if downside == Decimal::ZERO {
        return None;
    }

    avg.checked_sub(risk_free_rate)?.checked_div(downside)
}

/// `|total_return / max_drawdown|`, only for a positive drawdown.
#[must_use]
pub fn calmar_ratio(total_return: Decimal, max_drawdown: Decimal) -> Option<Decimal> {
    if max_drawdown <= Decimal::ZERO {
        return None;
    }
    total_return.checked_div(max_drawdown).map(|r| r.abs())
}

/// `|gross_profit / gross_loss|`.
///
/// Losses are passed as a non-positive figure; anything else yields `None`.
#[must_use]
pub fn profit_factor(gross_profit: Decimal, gross_loss: Decimal) -> Option<Decimal> {
    if gross_loss >= Decimal::ZERO {
        return None;
    }
    gross_profit.checked_div(gross_loss).map(|r| r.abs())
}

/// `win_rate * avg_win + (1 - win_rate) * avg_loss`.
///
/// `losses` keep their negative sign. An empty side averages to zero; only
/// two empty lists give `None`.
#[must_use]
pub fn expectancy(wins: &[Decimal], losses: &[Decimal], win_rate: Decimal) -> Option<Decimal> {
    if wins.is_empty() && losses.is_empty() {
        return None;
    }

    let avg_win = mean(wins).unwrap_or(Decimal::ZERO);
    let avg_loss = mean(losses).unwrap_or(Decimal::ZERO);

    let win_part = win_rate.checked_mul(avg_win)?;
    let loss_part = (Decimal::ONE - win_rate).checked_mul(avg_loss)?;
    win_part.checked_add(loss_part)
}

/// Mean exit-minus-entry time in fractional days.
#[must_use]
pub fn average_holding_period_days(matches: &[RealizedMatch]) -> Option<Decimal> {
    let days: Vec<Decimal> = matches
        .iter()
        .map(|m| Decimal::from(m.holding_period().num_seconds()) / SECONDS_PER_DAY)
        .collect();
    mean(&days)
}
