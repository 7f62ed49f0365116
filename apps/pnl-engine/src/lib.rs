// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! PnL Engine - Rust Core Library
//!
//! Deterministic realized/unrealized PnL and trade analytics for a single
//! account's trade history. Every computation is a pure function over a
//! snapshot of trades; nothing is persisted between calls.
//!
//! # Data flow
//!
//! - **Domain**: `Trade`, journal tags, pre-engine validation
//! - **Ledger**: FIFO lot matching and mark-to-market valuation
//! - **Metrics**: drawdown, Sharpe, Sortino, Calmar, profit factor, expectancy
//! - **Overview**: portfolio snapshot, strict-mark checks, period comparison
//! - **Performance**: daily/weekly series, streaks, breakdowns, analysis views
//! - **Tax**: short-/long-term classification and harvesting hints
//!
//! `report` composes all of the above for the binary; `config` and
//! `telemetry` are only read there.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod overview;
pub mod performance;
pub mod report;
pub mod tax;
pub mod telemetry;

pub use domain::{JournalEntry, JournalTag, PositionSide, Side, Trade, validate_trades};
pub use error::{AnalyticsError, ErrorCode};
pub use ledger::{MatchOutcome, RealizedMatch, match_trades, unrealized_by_symbol};
pub use overview::{OverviewCalculator, Snapshot, compare_periods, overview, realized_matches};
pub use performance::{performance, performance_from_trades};
pub use tax::{TaxPolicy, TaxReport, classify, tax_year_summary};
