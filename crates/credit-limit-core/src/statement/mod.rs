//! Statement analysis pipeline.
//!
//! Covers:
//! 1. **Provider parsers** -- bank CSV tables and MTN MoMo exports.
//! 2. **Monthly aggregation** -- income, expenditure and lowest balance per
//!    calendar month inside a trailing 180-day window.
//! 3. **Outlier suppression** -- 3-sigma filtering of monthly series.
//! 4. **Metric summary** -- the normalized `StatementMetrics` record.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

pub mod aggregate;
pub mod bank;
pub mod dates;
pub mod momo;
pub mod outliers;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, StatementMetrics, StatementType};
use crate::CreditEngineResult;

/// Decoded statement text plus routing information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementAnalysisInput {
    pub statement_type: StatementType,
    /// Raw decoded text content of the export.
    pub content: String,
    /// Applicant identifier, carried for diagnostics only.
    pub user_id: String,
}

/// Run the full pipeline for one statement: parse, bucket, filter, summarize.
pub fn analyze_statement(input: &StatementAnalysisInput) -> CreditEngineResult<StatementMetrics> {
    let buckets = match input.statement_type {
        StatementType::Bank => {
            let transactions = bank::parse(&input.content)?;
            aggregate::bucket_bank(&transactions)?
        }
        StatementType::MomoMtn => {
            let ledger = momo::parse(&input.content)?;
            aggregate::bucket_momo(&ledger)?
        }
    };
    Ok(aggregate::summarize(&buckets))
}

/// Strip everything but digits and the decimal point, then parse.
/// Exports freely mix thousands separators, currency symbols and blanks;
/// anything unparsable after cleaning counts as zero.
pub(crate) fn clean_numeric(raw: &str) -> Money {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return Money::ZERO;
    }
    cleaned.parse::<Decimal>().unwrap_or(Money::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
