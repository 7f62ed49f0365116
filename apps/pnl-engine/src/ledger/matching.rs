//! FIFO lot matching.
//!
//! Trades are replayed in `trade_time` order (stable for ties). A buy first
//! closes open short lots oldest-first and opens a long lot with whatever is
//! left; a sell mirrors that against the long lots. Each closed slice becomes
//! one [`RealizedMatch`] carrying its proportional share of both trades' fees.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::lot::{Lot, Position};
use crate::domain::{PositionSide, Side, Trade};

/// One FIFO-matched slice of quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedMatch {
    /// Normalized symbol.
    pub symbol: String,
    /// Matched quantity.
    pub qty: u64,
    /// Trade that opened the lot.
    pub entry_trade_id: String,
    /// Trade that closed it.
    pub exit_trade_id: String,
    /// Entry price.
    pub entry_price: Decimal,
    /// Exit price.
    pub exit_price: Decimal,
    /// Entry time.
    pub entry_time: DateTime<Utc>,
    /// Exit time.
    pub exit_time: DateTime<Utc>,
    /// Side of the lot that was closed.
    pub side_closed: PositionSide,
    /// Net PnL after both trades' proportional fees.
    pub pnl: Decimal,
}

impl RealizedMatch {
    /// Time between entry and exit.
    #[must_use]
    pub fn holding_period(&self) -> Duration {
        self.exit_time.signed_duration_since(self.entry_time)
    }

    /// Whole days held.
    #[must_use]
    pub fn holding_days(&self) -> i64 {
        self.holding_period().num_days()
    }

    /// True for a strictly positive PnL.
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    /// True for a strictly negative PnL.
    #[must_use]
    pub fn is_loss(&self) -> bool {
        self.pnl < Decimal::ZERO
    }
}

/// Result of one matching run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Realized matches in the order they were produced.
    pub realized: Vec<RealizedMatch>,
    /// Lot queues for every symbol seen.
    pub positions: BTreeMap<String, Position>,
    /// Last traded price per symbol.
    pub marks: BTreeMap<String, Decimal>,
}

impl MatchOutcome {
    /// Symbols with open quantity on either side.
    pub fn open_symbols(&self) -> impl Iterator<Item = &str> {
        self.positions
            .iter()
            .filter(|(_, p)| !p.is_flat())
            .map(|(s, _)| s.as_str())
    }
}

/// Replay `trades` through FIFO lot queues.
///
/// The input is not validated here; callers run
/// [`crate::domain::validate_trades`] first. A zero-quantity trade only
/// updates the mark.
#[must_use]
pub fn match_trades(trades: &[Trade]) -> MatchOutcome {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.trade_time);

    let mut outcome = MatchOutcome::default();

    for trade in ordered {
        let symbol = trade.normalized_symbol();
        outcome.marks.insert(symbol.clone(), trade.price);

        let fee_per_share = trade.fee_per_share();
        let position = outcome.positions.entry(symbol.clone()).or_default();

        let (closing, opening, side_closed) = match trade.side {
            Side::Buy => (
                &mut position.short_lots,
                &mut position.long_lots,
                PositionSide::Short,
            ),
            Side::Sell => (
                &mut position.long_lots,
                &mut position.short_lots,
                PositionSide::Long,
            ),
        };

        let remaining = close_lots(
            closing,
            trade,
            &symbol,
            fee_per_share,
            side_closed,
            &mut outcome.realized,
        );

        if remaining > 0 {
            opening.push_back(Lot::open(trade, remaining, fee_per_share));
        }

        assert!(
            position.long_lots.is_empty() || position.short_lots.is_empty(),
            "lot queues for {symbol} hold both directions after trade {}",
            trade.id
        );
    }

    debug!(
        trades = trades.len(),
        matches = outcome.realized.len(),
        open_symbols = outcome.open_symbols().count(),
        "FIFO matching complete"
    );

    outcome
}

/// Drain `queue` head-first against `trade`, returning the unmatched quantity.
fn close_lots(
    queue: &mut VecDeque<Lot>,
    trade: &Trade,
    symbol: &str,
    fee_per_share: Decimal,
    side_closed: PositionSide,
    realized: &mut Vec<RealizedMatch>,
) -> u64 {
    let mut remaining = trade.quantity;

    while remaining > 0 {
        let Some(lot) = queue.front_mut() else {
            break;
        };

        let qty = remaining.min(lot.remaining_qty);
        let matched = Decimal::from(qty);
        let gross = match side_closed {
            PositionSide::Long => (trade.price - lot.price) * matched,
            PositionSide::Short => (lot.price - trade.price) * matched,
        };
        let fees = (lot.fee_per_share + fee_per_share) * matched;

        realized.push(RealizedMatch {
            symbol: symbol.to_string(),
            qty,
            entry_trade_id: lot.origin_trade_id.clone(),
            exit_trade_id: trade.id.clone(),
            entry_price: lot.price,
            exit_price: trade.price,
            entry_time: lot.opened_at,
            exit_time: trade.trade_time,
            side_closed,
            pnl: gross - fees,
        });

        lot.remaining_qty -= qty;
        remaining -= qty;

        if lot.remaining_qty == 0 {
            queue.pop_front();
        }
    }

    remaining
}
