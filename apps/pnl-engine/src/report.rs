//! One-call account report.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::domain::{JournalEntry, Trade, TradeRecord, latest_tags, parse_trades, validate_trades};
use crate::error::AnalyticsError;
use crate::ledger::RealizedMatch;
use crate::overview::{OverviewCalculator, Snapshot, realized_matches};
use crate::performance::{
    Heatmap, MatrixRow, PerformanceReport, TimeOfDay, WinLossDistribution, heatmap, performance,
    strategy_matrix, symbol_matrix, time_of_day, win_loss_distribution,
};
use crate::tax::{TaxReport, YearSummary, classify, tax_year_summary};

/// Report input as read from JSON; sides are still raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Raw trade records.
    pub trades: Vec<TradeRecord>,
    /// Caller-supplied mark prices.
    #[serde(default)]
    pub marks: BTreeMap<String, Decimal>,
    /// Journal entries tagging trades.
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
    /// Year to classify for tax, if any.
    #[serde(default)]
    pub tax_year: Option<i32>,
}

/// Everything the collaborators hand over for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportInput {
    /// The account's trades, in any order.
    pub trades: Vec<Trade>,
    /// Caller-supplied mark prices.
    pub marks: BTreeMap<String, Decimal>,
    /// Journal entries tagging trades.
    pub journal: Vec<JournalEntry>,
    /// Year to classify for tax, if any.
    pub tax_year: Option<i32>,
}

impl TryFrom<ReportRequest> for ReportInput {
    type Error = AnalyticsError;

    /// Unknown sides become [`AnalyticsError::InvalidTrade`] on field `side`.
    fn try_from(request: ReportRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            trades: parse_trades(request.trades)?,
            marks: request.marks,
            journal: request.journal,
            tax_year: request.tax_year,
        })
    }
}

/// Trade-analysis views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAnalysis {
    /// Calendar heatmap.
    pub heatmap: Heatmap,
    /// Entry/exit hour statistics.
    pub time_of_day: TimeOfDay,
    /// Per-symbol matrix.
    pub symbol_matrix: Vec<MatrixRow>,
    /// Per-strategy matrix.
    pub strategy_matrix: Vec<MatrixRow>,
    /// Win/loss histogram.
    pub distribution: WinLossDistribution,
}

/// Full analytics for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReport {
    /// Portfolio snapshot.
    pub overview: Snapshot,
    /// Realized matches by exit time.
    pub realized_matches: Vec<RealizedMatch>,
    /// Performance series and breakdowns.
    pub performance: PerformanceReport,
    /// Trade-analysis views.
    pub analysis: TradeAnalysis,
    /// Realized PnL per exit year.
    pub tax_years: BTreeMap<i32, YearSummary>,
    /// Tax classification for the requested year.
    pub tax: Option<TaxReport>,
}

/// Validate the trades and build every view.
///
/// Strictness and the risk-free rate come from `config.analytics`, the tax
/// policy from `config.tax`.
pub fn build_report(input: &ReportInput, config: &Config) -> Result<AccountReport, AnalyticsError> {
    validate_trades(&input.trades)?;

    let mut calculator = OverviewCalculator::new();
    calculator.set_risk_free_rate(config.analytics.risk_free_rate);
    let overview = calculator.calculate(&input.trades, &input.marks, config.analytics.strict_marks)?;

    let matches = realized_matches(&input.trades);
    let tags = latest_tags(&input.journal);

    let analysis = TradeAnalysis {
        heatmap: heatmap(&matches),
        time_of_day: time_of_day(&matches),
        symbol_matrix: symbol_matrix(&matches),
        strategy_matrix: strategy_matrix(&matches, &tags),
        distribution: win_loss_distribution(&matches),
    };

    let policy = config.tax.to_policy();
    let tax = input.tax_year.map(|year| classify(&matches, year, &policy));

    debug!(
        trades = input.trades.len(),
        matches = matches.len(),
        tax_year = ?input.tax_year,
        "Account report built"
    );

    Ok(AccountReport {
        overview,
        performance: performance(&matches, &tags),
        analysis,
        tax_years: tax_year_summary(&matches),
        tax,
        realized_matches: matches,
    })
}
