//! PnL Engine Binary
//!
//! Reads one account's trades as JSON and prints the full analytics report.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin pnl-engine -- input.json
//! ```
//!
//! The input holds `trades`, optional `marks` (symbol to price), optional
//! `journal` entries and an optional `tax_year`. A rejected report prints
//! its error body (`code`, `message`, `details`) instead and exits non-zero.
//!
//! # Environment Variables
//!
//! - `PNL_ENGINE_CONFIG`: Config file path (default: `config.yaml` if present)
//! - `RUST_LOG`: Log level (overrides `observability.logging.level`)

use std::fs;

use anyhow::{Context, anyhow};
use pnl_engine::config::load_config;
use pnl_engine::metrics::{format_money, format_pct, format_ratio};
use pnl_engine::report::{ReportInput, ReportRequest, build_report};
use pnl_engine::telemetry::init_telemetry;
use tracing::{error, info};

/// Environment variable naming the config file.
const CONFIG_ENV_VAR: &str = "PNL_ENGINE_CONFIG";

fn main() -> anyhow::Result<()> {
    let input_path = std::env::args()
        .nth(1)
        .context("usage: pnl-engine <input.json>")?;

    let config_path = std::env::var(CONFIG_ENV_VAR)
        .ok()
        .filter(|path| !path.trim().is_empty());
    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;

    init_telemetry(&config.observability.logging).map_err(|e| anyhow!(e))?;

    let raw = fs::read_to_string(&input_path)
        .with_context(|| format!("failed to read input file '{input_path}'"))?;
    let request: ReportRequest =
        serde_json::from_str(&raw).with_context(|| format!("invalid input JSON in '{input_path}'"))?;
    let trade_count = request.trades.len();

    let report = match ReportInput::try_from(request).and_then(|input| build_report(&input, &config)) {
        Ok(report) => report,
        Err(e) => {
            error!(code = %e.code(), error = %e, "Report rejected");
            let body = serde_json::to_string_pretty(&e.to_response())
                .context("failed to serialize error response")?;
            println!("{body}");
            return Err(e.into());
        }
    };

    let overview = &report.overview;
    info!(
        trades = trade_count,
        matches = report.realized_matches.len(),
        realized = %format_money(overview.realized_pnl),
        unrealized = %format_money(overview.unrealized_pnl),
        win_rate = %format_pct(overview.win_rate),
        sharpe = %format_ratio(overview.advanced_metrics.sharpe_ratio),
        profit_factor = %format_ratio(overview.advanced_metrics.profit_factor),
        "Report ready"
    );

    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");

    Ok(())
}
