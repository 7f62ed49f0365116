//! Short-/long-term capital-gains classification.
//!
//! Matches are filtered by exit year and bucketed by whole days held. Losses
//! only offset gains inside their own bucket, so a bucket's taxable gain is
//! never negative.

mod classify;
mod policy;

pub use classify::{
    HarvestHint, TaxBucket, TaxReport, TaxSummary, TaxableMatch, YearSummary, classify,
    tax_year_summary,
};
pub use policy::{DEFAULT_LONG_TERM_DAYS, HoldingTerm, TaxPolicy};
