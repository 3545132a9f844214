//! Bank statement CSV parser.
//!
//! Real exports carry a preamble (account holder, address, disclaimers)
//! before the transaction table, and header cells that wrap across lines.
//! The header row is located by keyword scan and columns are mapped by
//! substring so the parser survives cosmetic layout differences between
//! banks.

use csv::ReaderBuilder;

use crate::error::CreditEngineError;
use crate::types::RawTransaction;
use crate::CreditEngineResult;

use super::{clean_numeric, dates};

/// A row is the header when its concatenated text contains all of these.
const HEADER_KEYWORDS: &[&str] = &["DATE", "DESCRIPTION", "DEBIT", "CREDIT", "BALANCE"];

/// Positions of the logical columns inside the detected header.
struct ColumnMap {
    date: usize,
    description: usize,
    debit: usize,
    credit: usize,
    balance: usize,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> CreditEngineResult<Self> {
        Ok(ColumnMap {
            // "VALUE DATE" columns exist alongside the transaction date and
            // must not win the mapping.
            date: position_of(header, "date", |h| h.contains("DATE") && !h.contains("VALUE"))?,
            description: position_of(header, "description", |h| h.contains("DESCRIPTION"))?,
            debit: position_of(header, "debit", |h| h.contains("DEBIT"))?,
            credit: position_of(header, "credit", |h| h.contains("CREDIT"))?,
            balance: position_of(header, "balance", |h| h.contains("BALANCE"))?,
        })
    }
}

fn position_of(
    header: &[String],
    name: &str,
    pred: impl Fn(&str) -> bool,
) -> CreditEngineResult<usize> {
    header
        .iter()
        .position(|h| pred(&h.to_uppercase()))
        .ok_or_else(|| {
            CreditEngineError::StructuralParse(format!(
                "could not map the {name} column from the detected header"
            ))
        })
}

/// Parse a bank statement export into the canonical transaction ledger.
///
/// Rows before the header are discarded as preamble; rows whose date parses
/// under none of the known formats are silently dropped.
pub fn parse(content: &str) -> CreditEngineResult<Vec<RawTransaction>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut data_rows: Vec<Vec<String>> = Vec::new();

    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();

        if header.is_some() {
            if cells.iter().any(|c| !c.trim().is_empty()) {
                data_rows.push(cells);
            }
            continue;
        }

        let row_text = cells.join(" ").to_uppercase();
        if HEADER_KEYWORDS.iter().all(|k| row_text.contains(k)) {
            header = Some(
                cells
                    .iter()
                    .map(|h| h.replace('\n', " ").trim().to_string())
                    .collect(),
            );
        }
    }

    let header = header.ok_or_else(|| {
        CreditEngineError::StructuralParse(
            "could not find a bank statement header row in the export".into(),
        )
    })?;
    let columns = ColumnMap::from_header(&header)?;

    let mut transactions = Vec::with_capacity(data_rows.len());
    for row in &data_rows {
        let Some(date) = dates::parse_bank_date(cell(row, columns.date)) else {
            continue;
        };
        transactions.push(RawTransaction {
            date,
            description: cell(row, columns.description).to_uppercase(),
            debit: clean_numeric(cell(row, columns.debit)),
            credit: clean_numeric(cell(row, columns.credit)),
            balance: clean_numeric(cell(row, columns.balance)),
        });
    }

    if transactions.is_empty() {
        return Err(CreditEngineError::StructuralParse(
            "could not parse any valid transaction dates from the bank statement".into(),
        ));
    }

    Ok(transactions)
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SIMPLE: &str = "\
ACME BANK LTD\n\
Statement of Account,,,,,\n\
\n\
DATE,VALUE DATE,DESCRIPTION,DEBIT,CREDIT,BALANCE\n\
01/02/2025,01/02/2025,Salary credit,,\"1,000.00\",\"1,200.00\"\n\
not a date,,Opening balance,,,\n\
10/02/2025,10/02/2025,POS purchase,100.00,,\"1,100.00\"\n";

    #[test]
    fn test_parses_rows_after_preamble() {
        let transactions = parse(SIMPLE).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].credit, dec!(1000.00));
        assert_eq!(transactions[0].debit, dec!(0));
        assert_eq!(transactions[0].description, "SALARY CREDIT");
        assert_eq!(transactions[1].debit, dec!(100.00));
        assert_eq!(transactions[1].balance, dec!(1100.00));
    }

    #[test]
    fn test_value_date_column_is_not_the_date_column() {
        // Column 0 wins because "VALUE DATE" is excluded from the mapping.
        let transactions = parse(SIMPLE).unwrap();
        assert_eq!(transactions[0].date.format("%Y-%m-%d").to_string(), "2025-02-01");
    }

    #[test]
    fn test_multiline_header_cells() {
        let content = "\
\"TRANSACTION\nDATE\",DESCRIPTION,DEBIT,CREDIT,\"RUNNING\nBALANCE\"\n\
05/03/2025,Transfer in,,250.00,750.00\n";
        let transactions = parse(content).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].credit, dec!(250.00));
        assert_eq!(transactions[0].balance, dec!(750.00));
    }

    #[test]
    fn test_missing_header_is_structural_error() {
        let err = parse("just,some,cells\nwithout,a,header\n").unwrap_err();
        assert!(matches!(err, CreditEngineError::StructuralParse(_)));
    }

    #[test]
    fn test_unmappable_date_column_is_structural_error() {
        // All keywords present, but the only DATE header also says VALUE.
        let content = "VALUE DATE,DESCRIPTION,DEBIT,CREDIT,BALANCE\n01/02/2025,x,1,2,3\n";
        let err = parse(content).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("date column"), "unexpected message: {msg}");
    }

    #[test]
    fn test_no_parseable_dates_is_structural_error() {
        let content = "DATE,DESCRIPTION,DEBIT,CREDIT,BALANCE\nsoon,pending,1,2,3\n";
        assert!(parse(content).is_err());
    }
}
