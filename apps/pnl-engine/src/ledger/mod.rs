//! Lot matching engine and unrealized valuation.
//!
//! Every run starts from an empty ledger, so replaying the same trade list is
//! deterministic and carries no state between calls.

mod lot;
mod matching;
mod valuation;

pub use lot::{Lot, Position};
pub use matching::{MatchOutcome, RealizedMatch, match_trades};
pub use valuation::{position_unrealized, unrealized_by_symbol};
