//! Performance insights over realized matches.
//!
//! Daily/weekly series, streaks, grouped breakdowns and the trade-analysis
//! views. Matches are attributed to their exit trade throughout.

mod aggregator;
mod analysis;
mod group;
mod types;

pub use aggregator::{performance, performance_from_trades};
pub use analysis::{
    DISTRIBUTION_BINS, DateRange, DistributionBin, DistributionSummary, Heatmap, HeatmapCell,
    HourStats, MatrixRow, TimeOfDay, WinLossDistribution, heatmap, strategy_matrix, symbol_matrix,
    time_of_day, win_loss_distribution,
};
pub use types::{
    Attribution, Breakdown, Breakdowns, DailyEquity, DailyPnl, PerformanceNotes,
    PerformanceReport, PerformanceSeries, PerformanceStats, WeeklyPnl,
};
