//! Monthly aggregation over a trailing 180-day analysis window.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::error::CreditEngineError;
use crate::types::{Money, RawTransaction, StatementMetrics};
use crate::CreditEngineResult;

use super::momo::{MomoLedger, MomoTransaction};
use super::outliers;

/// Length of the trailing analysis window, anchored on the latest
/// transaction date.
const ANALYSIS_WINDOW_DAYS: i64 = 180;

/// How a single ledger entry moves money, seen from the statement holder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CashFlow {
    Income(Money),
    Expenditure(Money),
    /// Contributes to the monthly balance low only.
    Neither,
}

/// Per-month running sums for the analysis window, keyed `"YYYY-MM"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyBuckets {
    pub income: BTreeMap<String, Money>,
    pub expenditure: BTreeMap<String, Money>,
    pub lowest_balance: BTreeMap<String, Money>,
}

/// Bucket a bank ledger month by month.
pub fn bucket_bank(transactions: &[RawTransaction]) -> CreditEngineResult<MonthlyBuckets> {
    bucket(
        transactions
            .iter()
            .map(|t| (t.date, t.balance, bank_cash_flow(t)))
            .collect(),
    )
}

/// Bucket a mobile-money ledger month by month.
pub fn bucket_momo(ledger: &MomoLedger) -> CreditEngineResult<MonthlyBuckets> {
    bucket(
        ledger
            .transactions
            .iter()
            .map(|t| {
                (
                    t.date,
                    t.balance_after,
                    momo_cash_flow(t, &ledger.user_suffix),
                )
            })
            .collect(),
    )
}

/// Bank rows carry separate debit and credit magnitudes; a row is income
/// when the credit side is set, expenditure when only the debit side is,
/// and neither when both are zero.
fn bank_cash_flow(t: &RawTransaction) -> CashFlow {
    if t.credit > Money::ZERO {
        CashFlow::Income(t.credit)
    } else if t.debit > Money::ZERO {
        CashFlow::Expenditure(t.debit)
    } else {
        CashFlow::Neither
    }
}

/// Mobile-money rows carry one amount; direction comes from whether the
/// destination wallet is the statement holder's own number. The full
/// amount lands on one side either way, zero included, so the month is
/// materialized on that side exactly as the provider reports it.
fn momo_cash_flow(t: &MomoTransaction, user_suffix: &str) -> CashFlow {
    if !t.to_suffix.is_empty() && t.to_suffix.ends_with(user_suffix) {
        CashFlow::Income(t.amount)
    } else {
        CashFlow::Expenditure(t.amount)
    }
}

fn bucket(entries: Vec<(NaiveDateTime, Money, CashFlow)>) -> CreditEngineResult<MonthlyBuckets> {
    let latest = entries
        .iter()
        .map(|(date, _, _)| *date)
        .max()
        .ok_or_else(|| {
            CreditEngineError::InsufficientData("no transactions to aggregate".into())
        })?;
    let window_start = latest - Duration::days(ANALYSIS_WINDOW_DAYS);

    let mut buckets = MonthlyBuckets::default();
    for (date, balance, flow) in entries {
        if date < window_start {
            continue;
        }
        let month = date.format("%Y-%m").to_string();

        buckets
            .lowest_balance
            .entry(month.clone())
            .and_modify(|low| {
                if balance < *low {
                    *low = balance;
                }
            })
            .or_insert(balance);

        match flow {
            CashFlow::Income(amount) => {
                *buckets.income.entry(month).or_insert(Money::ZERO) += amount;
            }
            CashFlow::Expenditure(amount) => {
                *buckets.expenditure.entry(month).or_insert(Money::ZERO) += amount;
            }
            CashFlow::Neither => {}
        }
    }

    Ok(buckets)
}

/// Reduce the monthly buckets into the final metrics record.
///
/// Income and expenditure series are outlier-filtered independently before
/// averaging; only the expenditure outlier count is carried forward. All
/// monetary metrics are rounded to 2 dp before persisting.
pub fn summarize(buckets: &MonthlyBuckets) -> StatementMetrics {
    let income_series: Vec<Money> = buckets.income.values().copied().collect();
    let expenditure_series: Vec<Money> = buckets.expenditure.values().copied().collect();

    let (clean_income, _) = outliers::without_outliers(&income_series);
    let (clean_expenditure, expenditure_outliers) =
        outliers::without_outliers(&expenditure_series);

    let avg_income = outliers::mean(&clean_income);
    let avg_expenditure = outliers::mean(&clean_expenditure);

    let balance_series: Vec<Money> = buckets.lowest_balance.values().copied().collect();
    let avg_lowest = outliers::mean(&balance_series);
    let volatility = if balance_series.len() > 1 {
        outliers::sample_stdev(&balance_series)
    } else {
        Money::ZERO
    };

    StatementMetrics {
        avg_monthly_income: avg_income.round_dp(2),
        avg_monthly_expenditure: avg_expenditure.round_dp(2),
        disposable_income: (avg_income - avg_expenditure).round_dp(2),
        avg_lowest_monthly_balance: avg_lowest.round_dp(2),
        balance_volatility: volatility.round_dp(2),
        expenditure_outlier_count: expenditure_outliers.len() as u32,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
