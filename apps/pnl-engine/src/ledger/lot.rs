//! Open lots and per-symbol positions.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{PositionSide, Trade};

/// An unmatched slice of one trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Quantity still open.
    pub remaining_qty: u64,
    /// Trade that opened the lot.
    pub origin_trade_id: String,
    /// Entry price.
    pub price: Decimal,
    /// Originating trade's fee per unit, carried into every partial close.
    pub fee_per_share: Decimal,
    /// Entry time.
    pub opened_at: DateTime<Utc>,
}

impl Lot {
    pub(crate) fn open(trade: &Trade, remaining_qty: u64, fee_per_share: Decimal) -> Self {
        Self {
            remaining_qty,
            origin_trade_id: trade.id.clone(),
            price: trade.price,
            fee_per_share,
            opened_at: trade.trade_time,
        }
    }

    /// Cost of a long lot including its entry fee.
    #[must_use]
    pub fn long_cost_basis(&self) -> Decimal {
        (self.price + self.fee_per_share) * Decimal::from(self.remaining_qty)
    }

    /// Proceeds of a short lot net of its entry fee.
    #[must_use]
    pub fn short_net_proceeds(&self) -> Decimal {
        (self.price - self.fee_per_share) * Decimal::from(self.remaining_qty)
    }
}

/// FIFO lot queues for one symbol.
///
/// After any trade has been applied at most one queue is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Open long lots, oldest first.
    pub long_lots: VecDeque<Lot>,
    /// Open short lots, oldest first.
    pub short_lots: VecDeque<Lot>,
}

impl Position {
    /// Total open long quantity.
    #[must_use]
    pub fn long_qty(&self) -> u64 {
        self.long_lots.iter().map(|l| l.remaining_qty).sum()
    }

    /// Total open short quantity.
    #[must_use]
    pub fn short_qty(&self) -> u64 {
        self.short_lots.iter().map(|l| l.remaining_qty).sum()
    }

    /// True when no lots are open.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.long_lots.is_empty() && self.short_lots.is_empty()
    }

    /// Lots for one side.
    #[must_use]
    pub const fn lots(&self, side: PositionSide) -> &VecDeque<Lot> {
        match side {
            PositionSide::Long => &self.long_lots,
            PositionSide::Short => &self.short_lots,
        }
    }

    /// Fee-inclusive weighted average entry price of the open longs.
    #[must_use]
    pub fn avg_long_cost(&self) -> Option<Decimal> {
        let qty = self.long_qty();
        if qty == 0 {
            return None;
        }
        let cost: Decimal = self.long_lots.iter().map(Lot::long_cost_basis).sum();
        Some(cost / Decimal::from(qty))
    }

    /// Fee-net weighted average entry proceeds price of the open shorts.
    #[must_use]
    pub fn avg_short_proceeds(&self) -> Option<Decimal> {
        let qty = self.short_qty();
        if qty == 0 {
            return None;
        }
        let proceeds: Decimal = self.short_lots.iter().map(Lot::short_net_proceeds).sum();
        Some(proceeds / Decimal::from(qty))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    fn lot(qty: u64, price: Decimal, fee_per_share: Decimal) -> Lot {
        Lot {
            remaining_qty: qty,
            origin_trade_id: "t".to_string(),
            price,
            fee_per_share,
            opened_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_avg_long_cost_includes_fees() {
        let position = Position {
            long_lots: VecDeque::from(vec![lot(10, dec!(100), dec!(1)), lot(10, dec!(110), dec!(1))]),
            short_lots: VecDeque::new(),
        };
        assert_eq!(position.long_qty(), 20);
        assert_eq!(position.avg_long_cost(), Some(dec!(106)));
        assert_eq!(position.avg_short_proceeds(), None);
    }

    #[test]
    fn test_avg_short_proceeds_nets_fees() {
        let position = Position {
            long_lots: VecDeque::new(),
            short_lots: VecDeque::from(vec![lot(4, dec!(50), dec!(0.5))]),
        };
        assert_eq!(position.short_qty(), 4);
        assert_eq!(position.avg_short_proceeds(), Some(dec!(49.5)));
        assert!(!position.is_flat());
        assert_eq!(position.lots(PositionSide::Short).len(), 1);
    }
}
