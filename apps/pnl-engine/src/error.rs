//! Error types for the PnL engine.
//!
//! Only two failures are user-facing:
//!
//! | Code | Raised by | Meaning |
//! |------|-----------|---------|
//! | `INVALID_TRADE` | [`crate::domain::validate_trades`] | A trade violates the input contract |
//! | `MISSING_MARKS` | strict overview | Open symbols have no caller-supplied mark |
//!
//! Degenerate numeric cases never surface as errors; metrics resolve to `None`.
//! Broken ledger invariants panic instead of producing wrong figures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A trade failed pre-engine validation.
    InvalidTrade,
    /// Strict overview requested without marks for every open symbol.
    MissingMarks,
}

impl ErrorCode {
    /// Get the stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidTrade => "INVALID_TRADE",
            Self::MissingMarks => "MISSING_MARKS",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors raised by the analytics core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// A trade violates the input contract.
    #[error("Invalid trade '{trade_id}': {field} {message}")]
    InvalidTrade {
        /// Offending trade id.
        trade_id: String,
        /// Field that failed validation.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Strict mode found open symbols priced only by their last trade.
    #[error("Missing marks for open symbols: {}", symbols.join(", "))]
    MissingMarks {
        /// Sorted symbols lacking a caller-supplied mark.
        symbols: Vec<String>,
    },
}

impl AnalyticsError {
    /// Build an invalid-trade error.
    #[must_use]
    pub fn invalid_trade(
        trade_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidTrade {
            trade_id: trade_id.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidTrade { .. } => ErrorCode::InvalidTrade,
            Self::MissingMarks { .. } => ErrorCode::MissingMarks,
        }
    }

    /// Convert to a transport-neutral error body.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        let mut details = HashMap::new();
        match self {
            Self::InvalidTrade {
                trade_id, field, ..
            } => {
                details.insert("trade_id".to_string(), trade_id.clone());
                details.insert("field".to_string(), field.clone());
            }
            Self::MissingMarks { symbols } => {
                details.insert("symbols".to_string(), symbols.join(","));
            }
        }
        ErrorResponse {
            code: self.code().reason().to_string(),
            message: self.to_string(),
            details,
        }
    }
}

/// Error body handed to route handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    pub details: HashMap<String, String>,
}
