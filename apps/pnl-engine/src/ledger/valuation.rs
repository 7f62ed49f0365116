//! Mark-to-market valuation of open lots.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::lot::Position;

/// Unrealized PnL of one position at `mark`.
///
/// Longs: market value minus fee-inclusive cost. Shorts: fee-net entry
/// proceeds minus the cost to buy back at `mark`.
#[must_use]
pub fn position_unrealized(position: &Position, mark: Decimal) -> Decimal {
    let long: Decimal = position
        .long_lots
        .iter()
        .map(|lot| mark * Decimal::from(lot.remaining_qty) - lot.long_cost_basis())
        .sum();
    let short: Decimal = position
        .short_lots
        .iter()
        .map(|lot| lot.short_net_proceeds() - mark * Decimal::from(lot.remaining_qty))
        .sum();
    long + short
}

/// Unrealized PnL per symbol.
///
/// Every symbol in `positions` gets an entry (zero when flat). A symbol
/// without a mark is valued at zero rather than failing.
#[must_use]
pub fn unrealized_by_symbol(
    positions: &BTreeMap<String, Position>,
    marks: &BTreeMap<String, Decimal>,
) -> BTreeMap<String, Decimal> {
    positions
        .iter()
        .map(|(symbol, position)| {
            let mark = marks.get(symbol).copied().unwrap_or(Decimal::ZERO);
            (symbol.clone(), position_unrealized(position, mark))
        })
        .collect()
}
