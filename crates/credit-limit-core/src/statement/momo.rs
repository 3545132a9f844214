//! MTN Mobile Money statement parser.
//!
//! The export is not a clean table: a report preamble precedes the data
//! header, records carry the provider's own timestamp format, and the
//! statement never states whose ledger it is. The owner's wallet number is
//! inferred from the first outgoing record (DEBIT or PAYMENT), since money
//! can only leave the statement holder's own wallet.

use chrono::NaiveDateTime;
use csv::ReaderBuilder;

use crate::error::CreditEngineError;
use crate::types::Money;
use crate::CreditEngineResult;

use super::{clean_numeric, dates};

/// A line is the header when its uppercase text contains all of these.
const HEADER_KEYWORDS: &[&str] = &[
    "TRANSACTION DATE",
    "TRANS. TYPE",
    "AMOUNT",
    "BAL AFTER",
    "FROM NO.",
    "TO NO.",
];

/// Trailing digits that identify a wallet regardless of the 0- / 233- /
/// +233- prefix convention used on a given row.
const PHONE_SUFFIX_LEN: usize = 9;

/// One mobile-money ledger entry from the data table.
#[derive(Debug, Clone, PartialEq)]
pub struct MomoTransaction {
    pub date: NaiveDateTime,
    pub trans_type: String,
    pub amount: Money,
    pub balance_after: Money,
    /// Destination wallet, reduced to digits.
    pub to_suffix: String,
}

/// Parsed ledger together with the inferred owner suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct MomoLedger {
    pub transactions: Vec<MomoTransaction>,
    /// Last digits of the statement holder's own wallet number.
    pub user_suffix: String,
}

/// Positions of the named columns inside the detected header.
struct ColumnMap {
    date: usize,
    trans_type: usize,
    amount: usize,
    bal_after: usize,
    from_no: usize,
    to_no: usize,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> CreditEngineResult<Self> {
        Ok(ColumnMap {
            date: position_of(header, "TRANSACTION DATE")?,
            trans_type: position_of(header, "TRANS. TYPE")?,
            amount: position_of(header, "AMOUNT")?,
            bal_after: position_of(header, "BAL AFTER")?,
            from_no: position_of(header, "FROM NO.")?,
            to_no: position_of(header, "TO NO.")?,
        })
    }
}

fn position_of(header: &[String], name: &str) -> CreditEngineResult<usize> {
    header
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            CreditEngineError::StructuralParse(format!(
                "could not map the {name} column from the detected header"
            ))
        })
}

/// Parse an MTN MoMo export into a ledger with an inferred owner suffix.
pub fn parse(content: &str) -> CreditEngineResult<MomoLedger> {
    let lines: Vec<&str> = content.lines().collect();

    let mut header: Option<Vec<String>> = None;
    let mut data_start = 0usize;
    for (i, line) in lines.iter().enumerate() {
        let upper = line.to_uppercase();
        if HEADER_KEYWORDS.iter().all(|k| upper.contains(k)) {
            header = Some(
                line.split(',')
                    .map(|h| h.trim().replace('"', ""))
                    .collect(),
            );
            data_start = i + 1;
            break;
        }
    }
    let header = header.ok_or_else(|| {
        CreditEngineError::StructuralParse(
            "could not find an MTN MoMo data header row in the export".into(),
        )
    })?;
    let columns = ColumnMap::from_header(&header)?;

    let body = lines[data_start..].join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut transactions = Vec::new();
    let mut user_suffix: Option<String> = None;

    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        // Owner inference scans every record, dated or not.
        if user_suffix.is_none() {
            let trans_type = field(columns.trans_type).to_uppercase();
            if trans_type == "DEBIT" || trans_type == "PAYMENT" {
                let digits = digits_only(field(columns.from_no));
                if !digits.is_empty() {
                    user_suffix = Some(last_digits(&digits, PHONE_SUFFIX_LEN));
                }
            }
        }

        let Some(date) = dates::parse_momo_date(field(columns.date)) else {
            continue;
        };
        transactions.push(MomoTransaction {
            date,
            trans_type: field(columns.trans_type).to_uppercase(),
            amount: clean_numeric(field(columns.amount)),
            balance_after: clean_numeric(field(columns.bal_after)),
            to_suffix: digits_only(field(columns.to_no)),
        });
    }

    let user_suffix = user_suffix.ok_or_else(|| {
        CreditEngineError::StructuralParse(
            "could not identify the statement holder's phone number".into(),
        )
    })?;
    if transactions.is_empty() {
        return Err(CreditEngineError::StructuralParse(
            "could not find any valid transaction dates in the statement".into(),
        ));
    }

    Ok(MomoLedger {
        transactions,
        user_suffix,
    })
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn last_digits(digits: &str, n: usize) -> String {
    digits[digits.len().saturating_sub(n)..].to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SIMPLE: &str = "\
MTN MOBILE MONEY STATEMENT\n\
Name:,John Doe\n\
\"TRANSACTION DATE\",\"TRANS. TYPE\",\"AMOUNT\",\"FEES\",\"BAL AFTER\",\"FROM NO.\",\"FROM NAME\",\"TO NO.\",\"TO NAME\"\n\
\"05-Feb-2025-08:30:15 AM\",\"CASH_IN\",\"500.00\",\"0.00\",\"600.00\",\"233240000001\",\"AGENT\",\"0244123456\",\"JOHN DOE\"\n\
\"10-Feb-2025-01:45:00 PM\",\"PAYMENT\",\"50.00\",\"0.50\",\"549.50\",\"0244123456\",\"JOHN DOE\",\"233599000002\",\"MERCHANT\"\n";

    #[test]
    fn test_infers_owner_from_first_outgoing_record() {
        let ledger = parse(SIMPLE).unwrap();
        assert_eq!(ledger.user_suffix, "244123456");
    }

    #[test]
    fn test_parses_amounts_and_destinations() {
        let ledger = parse(SIMPLE).unwrap();
        assert_eq!(ledger.transactions.len(), 2);
        let cash_in = &ledger.transactions[0];
        assert_eq!(cash_in.amount, dec!(500.00));
        assert_eq!(cash_in.balance_after, dec!(600.00));
        assert_eq!(cash_in.to_suffix, "0244123456");
        assert_eq!(ledger.transactions[1].trans_type, "PAYMENT");
    }

    #[test]
    fn test_undated_rows_still_feed_owner_inference() {
        let content = "\
\"TRANSACTION DATE\",\"TRANS. TYPE\",\"AMOUNT\",\"BAL AFTER\",\"FROM NO.\",\"TO NO.\"\n\
\"pending\",\"DEBIT\",\"10.00\",\"90.00\",\"0244123456\",\"233599000002\"\n\
\"05-Feb-2025-08:30:15 AM\",\"CASH_IN\",\"500.00\",\"590.00\",\"233240000001\",\"0244123456\"\n";
        let ledger = parse(content).unwrap();
        assert_eq!(ledger.user_suffix, "244123456");
        assert_eq!(ledger.transactions.len(), 1);
    }

    #[test]
    fn test_no_outgoing_record_fails_owner_inference() {
        let content = "\
\"TRANSACTION DATE\",\"TRANS. TYPE\",\"AMOUNT\",\"BAL AFTER\",\"FROM NO.\",\"TO NO.\"\n\
\"05-Feb-2025-08:30:15 AM\",\"CASH_IN\",\"500.00\",\"600.00\",\"233240000001\",\"0244123456\"\n";
        let err = parse(content).unwrap_err();
        assert!(err.to_string().contains("phone number"));
    }

    #[test]
    fn test_missing_header_is_structural_error() {
        assert!(parse("no,momo,header\nhere,at,all\n").is_err());
    }

    #[test]
    fn test_no_dates_is_structural_error() {
        let content = "\
\"TRANSACTION DATE\",\"TRANS. TYPE\",\"AMOUNT\",\"BAL AFTER\",\"FROM NO.\",\"TO NO.\"\n\
\"pending\",\"DEBIT\",\"10.00\",\"90.00\",\"0244123456\",\"233599000002\"\n";
        let err = parse(content).unwrap_err();
        assert!(err.to_string().contains("transaction dates"));
    }
}
