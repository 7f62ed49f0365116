//! Input types handed to the engine by its collaborators.
//!
//! - [`Trade`]: one executed fill for the account
//! - [`JournalEntry`] / [`JournalTag`]: strategy/emotion tags keyed by trade id
//! - [`validate_trades`]: the pre-engine contract check

pub mod journal;
pub mod symbol;
pub mod trade;

pub use journal::{JournalEntry, JournalTag, UNTAGGED, latest_tags};
pub use symbol::{MAX_SYMBOL_LEN, normalize_symbol};
pub use trade::{
    ParseSideError, PositionSide, Side, Trade, TradeRecord, parse_trades, validate_trade,
    validate_trades,
};
