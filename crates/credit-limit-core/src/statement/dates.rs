//! Date parsing strategies for statement providers.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Bank statement formats, tried in order of expected frequency.
/// First success wins; a row whose date matches none is dropped.
const BANK_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", // 21/07/2025
    "%d-%b-%Y", // 21-Jul-2025
    "%Y-%m-%d", // 2025-07-21
    "%d-%m-%Y", // 21-07-2025
];

/// Parse a bank statement date cell against the known formats.
pub fn parse_bank_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    BANK_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse the MTN MoMo timestamp format.
///
/// The export writes "21-Jul-2025-10:30:45 AM" (sometimes with a space
/// instead of the third dash); the separator after the date part is
/// rewritten to the single space the time format expects.
pub fn parse_momo_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned = normalize_date_separator(trimmed);
    NaiveDateTime::parse_from_str(&cleaned, "%d-%b-%Y %I:%M:%S %p").ok()
}

fn normalize_date_separator(s: &str) -> String {
    let mut bytes = s.as_bytes().to_vec();
    let mut i = 0;
    while i + 11 < bytes.len() {
        if is_date_prefix(&bytes[i..]) && (bytes[i + 11] == b'-' || bytes[i + 11].is_ascii_whitespace()) {
            bytes[i + 11] = b' ';
            i += 12;
        } else {
            i += 1;
        }
    }
    String::from_utf8(bytes).unwrap_or_else(|_| s.to_string())
}

/// DD-Mon-YYYY at the start of the slice.
fn is_date_prefix(w: &[u8]) -> bool {
    w.len() >= 11
        && w[0].is_ascii_digit()
        && w[1].is_ascii_digit()
        && w[2] == b'-'
        && w[3..6].iter().all(|c| c.is_ascii_alphanumeric())
        && w[6] == b'-'
        && w[7..11].iter().all(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
