//! 3-sigma outlier suppression for monthly value series.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

/// Minimum number of points before spread estimation makes sense.
const MIN_POINTS: usize = 3;

/// Arithmetic mean; zero for an empty series.
pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = values.iter().copied().sum();
    sum / Decimal::from(values.len() as u64)
}

/// Sample standard deviation (n - 1 denominator); zero for fewer than
/// two points.
pub fn sample_stdev(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let m = mean(values);
    let sum_sq: Decimal = values.iter().map(|v| (*v - m) * (*v - m)).sum();
    let variance = sum_sq / Decimal::from(values.len() as u64 - 1);
    variance.sqrt().unwrap_or(Decimal::ZERO)
}

/// Split a series into `(clean, outliers)` under the 3-sigma rule.
///
/// Series with fewer than three points, or with zero spread, pass through
/// untouched. Outliers are reported as distinct values: every occurrence of
/// an outlying value is removed from the clean set, but the value is counted
/// once.
pub fn without_outliers(values: &[Decimal]) -> (Vec<Decimal>, Vec<Decimal>) {
    if values.len() < MIN_POINTS {
        return (values.to_vec(), Vec::new());
    }

    let m = mean(values);
    let stdev = sample_stdev(values);
    if stdev.is_zero() {
        return (values.to_vec(), Vec::new());
    }

    let threshold = dec!(3) * stdev;
    let mut outliers: Vec<Decimal> = values
        .iter()
        .copied()
        .filter(|v| (*v - m).abs() > threshold)
        .collect();
    outliers.sort();
    outliers.dedup();

    let clean = values
        .iter()
        .copied()
        .filter(|v| !outliers.contains(v))
        .collect();

    (clean, outliers)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
