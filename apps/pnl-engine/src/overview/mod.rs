//! Portfolio overview for one account.
//!
//! Combines realized matches with mark-to-market valuation of the open lots,
//! and compares two periods of the same account.

mod calculator;
mod comparison;
mod types;

pub use calculator::{OverviewCalculator, overview, realized_matches};
pub(crate) use calculator::win_rate;
pub use comparison::{PeriodComparison, PeriodDelta, PeriodReport, PeriodWindow, compare_periods};
pub use types::{AdvancedMetrics, MarkSource, OpenPosition, Snapshot, SnapshotNotes, TimeBuckets};
