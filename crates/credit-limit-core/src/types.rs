use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CreditEngineError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Version tag stamped on every credit limit record.
pub const MODEL_VERSION: &str = "v1.0.0";

/// Statement providers with a dedicated parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    Bank,
    MomoMtn,
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementType::Bank => write!(f, "bank"),
            StatementType::MomoMtn => write!(f, "momo-mtn-statement"),
        }
    }
}

impl std::str::FromStr for StatementType {
    type Err = CreditEngineError;

    /// External callers route by free-form tags such as
    /// `momo-mtn-statement-v2` or `gcb-bank`; the tag is matched by
    /// substring at the boundary and resolved into the closed enum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.to_lowercase();
        if tag.contains("momo-mtn-statement") {
            Ok(StatementType::MomoMtn)
        } else if tag.contains("bank") {
            Ok(StatementType::Bank)
        } else {
            Err(CreditEngineError::StructuralParse(format!(
                "no analyzer for statement type: {s}"
            )))
        }
    }
}

/// A single ledger row in canonical form. Debit and credit are non-negative
/// magnitudes; balance is the running account balance after the transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub date: NaiveDateTime,
    pub description: String,
    pub debit: Money,
    pub credit: Money,
    pub balance: Money,
}

/// Normalized metrics for one analyzed statement, rounded to 2 dp.
/// Field names follow the stored-document shape of the profile service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementMetrics {
    pub avg_monthly_income: Money,
    pub avg_monthly_expenditure: Money,
    pub disposable_income: Money,
    pub avg_lowest_monthly_balance: Money,
    pub balance_volatility: Money,
    pub expenditure_outlier_count: u32,
}

/// One statement analysis as persisted on the applicant's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRecord {
    /// Unique per source file; re-analysis replaces the record in place.
    pub id: String,
    pub source_file: String,
    pub statement_type: StatementType,
    pub analysis_date: DateTime<Utc>,
    #[serde(flatten)]
    pub metrics: StatementMetrics,
}

impl StatementRecord {
    pub fn new(
        id: impl Into<String>,
        source_file: impl Into<String>,
        statement_type: StatementType,
        analysis_date: DateTime<Utc>,
        metrics: StatementMetrics,
    ) -> Self {
        Self {
            id: id.into(),
            source_file: source_file.into(),
            statement_type,
            analysis_date,
            metrics,
        }
    }
}

/// Per-statement analysis results attached to a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPortfolio {
    pub per_statement: Vec<StatementRecord>,
}

/// Categorical questionnaire answers, exactly as captured by the KYC form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residence_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowing_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repayment_ability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowing_source: Option<String>,
}

impl KycAnswers {
    /// True when the form was submitted with no answer on any question.
    pub fn is_empty(&self) -> bool {
        self.residence_duration.is_none()
            && self.borrowing_history.is_none()
            && self.repayment_ability.is_none()
            && self.monthly_income_range.is_none()
            && self.job_duration.is_none()
            && self.borrowing_source.is_none()
    }
}

/// Engine-facing projection of an applicant's stored profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditProfile {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kyc_answers: Option<KycAnswers>,
    #[serde(default)]
    pub statement_metrics: StatementPortfolio,
    /// Admin-set per-user override of the configured confidence score,
    /// strictly between 0 and 1 when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_factor: Option<Decimal>,
}

impl CreditProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            kyc_answers: None,
            statement_metrics: StatementPortfolio::default(),
            correction_factor: None,
        }
    }

    /// Replace the record with the same id, or append. The collection holds
    /// at most one record per source file id.
    pub fn upsert_statement(&mut self, record: StatementRecord) {
        let list = &mut self.statement_metrics.per_statement;
        match list.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => list.push(record),
        }
    }

    /// Most recent analysis by `analysis_date`, if any statement exists.
    pub fn latest_statement(&self) -> Option<&StatementRecord> {
        self.statement_metrics
            .per_statement
            .iter()
            .max_by_key(|r| r.analysis_date)
    }
}

/// Credit limit decision as persisted; the most recent write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditLimitRecord {
    pub user_id: String,
    pub credit_limit: Money,
    pub score_last_calculated_at: DateTime<Utc>,
    pub model_version: String,
}

/// Environment-level engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scalar applied to disposable income before the risk discount.
    pub confidence_score: Decimal,
    pub minimum_credit_limit: Money,
    pub maximum_credit_limit: Money,
    pub model_version: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_score: dec!(0.8),
            minimum_credit_limit: dec!(50),
            maximum_credit_limit: dec!(1000),
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
