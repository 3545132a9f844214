//! Initial credit limit calculation.
//!
//! Normalizes the latest statement metrics and KYC scores into fuzzy model
//! inputs, runs the risk evaluation, and applies the limit business rule:
//! disposable income, scaled by the confidence score and discounted by risk,
//! clamped into the configured bounds.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CreditEngineError;
use crate::fuzzy::{FuzzyInputs, RiskEvaluator};
use crate::kyc::{self, KycScores, MAX_AXIS_SCORE};
use crate::types::{CreditLimitRecord, CreditProfile, EngineConfig, StatementRecord};
use crate::CreditEngineResult;

/// Full trace of one limit calculation: every intermediate the business
/// rule consumed, plus the record to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitCalculation {
    pub kyc_scores: KycScores,
    pub fuzzy_inputs: FuzzyInputs,
    pub risk_score_output: Decimal,
    pub user_risk_score: Decimal,
    /// Unclamped `disposable * confidence * user_risk_score`.
    pub initial_limit: Decimal,
    pub record: CreditLimitRecord,
}

/// Calculate and package the initial credit limit for one applicant.
///
/// Fails without side effects when the profile has no statement analysis;
/// a missing questionnaire is not an error (the scorer falls back to its
/// neutral pair).
pub fn calculate_initial_limit(
    profile: &CreditProfile,
    config: &EngineConfig,
    calculated_at: DateTime<Utc>,
) -> CreditEngineResult<LimitCalculation> {
    if profile.user_id.trim().is_empty() {
        return Err(CreditEngineError::InvalidInput {
            field: "user_id".into(),
            reason: "must not be empty".into(),
        });
    }
    let latest = profile.latest_statement().ok_or_else(|| {
        CreditEngineError::InsufficientData(
            "no statement analysis found in profile; cannot calculate a limit".into(),
        )
    })?;

    let kyc_scores = kyc::calculate_kyc_scores(profile.kyc_answers.as_ref());
    let fuzzy_inputs = normalize_inputs(latest, &kyc_scores);
    let confidence = confidence_for(profile, config)?;

    let assessment = RiskEvaluator::new().assess(&fuzzy_inputs)?;

    let initial_limit =
        latest.metrics.disposable_income * confidence * assessment.user_risk_score;
    let credit_limit = apply_limit_bounds(initial_limit, config);

    Ok(LimitCalculation {
        kyc_scores,
        fuzzy_inputs,
        risk_score_output: assessment.risk_score_output,
        user_risk_score: assessment.user_risk_score,
        initial_limit,
        record: CreditLimitRecord {
            user_id: profile.user_id.clone(),
            credit_limit,
            score_last_calculated_at: calculated_at,
            model_version: config.model_version.clone(),
        },
    })
}

/// Rescale raw metrics and KYC axes into the fuzzy model's universes.
///
/// Zero recorded income marks the applicant maximally risky outright
/// instead of dividing by zero.
pub fn normalize_inputs(statement: &StatementRecord, kyc_scores: &KycScores) -> FuzzyInputs {
    let debt_honesty = Decimal::ONE + (kyc_scores.capacity_score / MAX_AXIS_SCORE) * dec!(4);
    let character = Decimal::ONE + (kyc_scores.character_score / MAX_AXIS_SCORE) * dec!(4);

    let m = &statement.metrics;
    let (dti, volatility, min_balance) = if m.avg_monthly_income.is_zero() {
        (Decimal::ONE, Decimal::ONE, Decimal::ZERO)
    } else {
        (
            m.avg_monthly_expenditure / m.avg_monthly_income,
            m.balance_volatility / m.avg_monthly_income,
            m.avg_lowest_monthly_balance / m.avg_monthly_income,
        )
    };

    FuzzyInputs::new(dti, volatility, min_balance, debt_honesty, character)
}

/// Per-user correction factor wins over the configured default when present.
fn confidence_for(profile: &CreditProfile, config: &EngineConfig) -> CreditEngineResult<Decimal> {
    match profile.correction_factor {
        None => Ok(config.confidence_score),
        Some(cf) if cf > Decimal::ZERO && cf < Decimal::ONE => Ok(cf),
        Some(cf) => Err(CreditEngineError::InvalidInput {
            field: "correction_factor".into(),
            reason: format!("must be between 0 and 1 (exclusive), got {cf}"),
        }),
    }
}

/// Clamp the raw limit into business bounds; in-range limits truncate to a
/// whole amount.
pub fn apply_limit_bounds(initial_limit: Decimal, config: &EngineConfig) -> Decimal {
    if initial_limit < config.minimum_credit_limit {
        config.minimum_credit_limit
    } else if initial_limit > config.maximum_credit_limit {
        config.maximum_credit_limit
    } else {
        initial_limit.trunc()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StatementMetrics, StatementType};
    use chrono::TimeZone;

    fn statement(metrics: StatementMetrics) -> StatementRecord {
        StatementRecord::new(
            "jul.csv",
            "statements/bank/user-1/jul.csv",
            StatementType::Bank,
            Utc.with_ymd_and_hms(2025, 7, 20, 9, 0, 0).unwrap(),
            metrics,
        )
    }

    fn healthy_metrics() -> StatementMetrics {
        StatementMetrics {
            avg_monthly_income: dec!(1000),
            avg_monthly_expenditure: dec!(200),
            disposable_income: dec!(800),
            avg_lowest_monthly_balance: dec!(800),
            balance_volatility: dec!(100),
            expenditure_outlier_count: 0,
        }
    }

    #[test]
    fn test_normalization_divides_by_income() {
        let scores = kyc::calculate_kyc_scores(None);
        let inputs = normalize_inputs(&statement(healthy_metrics()), &scores);
        assert_eq!(inputs.dti, dec!(0.2));
        assert_eq!(inputs.volatility, dec!(0.1));
        assert_eq!(inputs.min_balance, dec!(0.8));
    }

    #[test]
    fn test_normalization_clamps_to_unit_interval() {
        let mut metrics = healthy_metrics();
        metrics.avg_monthly_expenditure = dec!(2500);
        metrics.balance_volatility = dec!(1500);
        let scores = kyc::calculate_kyc_scores(None);
        let inputs = normalize_inputs(&statement(metrics), &scores);
        assert_eq!(inputs.dti, Decimal::ONE);
        assert_eq!(inputs.volatility, Decimal::ONE);
    }

    #[test]
    fn test_zero_income_forces_max_risk_inputs() {
        let metrics = StatementMetrics {
            avg_monthly_income: dec!(0),
            avg_monthly_expenditure: dec!(500),
            disposable_income: dec!(-500),
            avg_lowest_monthly_balance: dec!(900),
            balance_volatility: dec!(50),
            expenditure_outlier_count: 0,
        };
        let scores = kyc::calculate_kyc_scores(None);
        let inputs = normalize_inputs(&statement(metrics), &scores);
        assert_eq!(inputs.dti, Decimal::ONE);
        assert_eq!(inputs.volatility, Decimal::ONE);
        assert_eq!(inputs.min_balance, Decimal::ZERO);
    }

    #[test]
    fn test_neutral_kyc_rescaling() {
        let scores = kyc::calculate_kyc_scores(None);
        let inputs = normalize_inputs(&statement(healthy_metrics()), &scores);
        // 1 + (10/15)*4 and 1 + (7.5/15)*4.
        assert!((inputs.debt_honesty - dec!(3.6667)).abs() < dec!(0.0001));
        assert_eq!(inputs.character, dec!(3.0));
    }

    #[test]
    fn test_limit_bounds_clamp_and_truncate() {
        let config = EngineConfig::default();
        assert_eq!(apply_limit_bounds(dec!(2000), &config), dec!(1000));
        assert_eq!(apply_limit_bounds(dec!(10), &config), dec!(50));
        assert_eq!(apply_limit_bounds(dec!(-75), &config), dec!(50));
        assert_eq!(apply_limit_bounds(dec!(123.79), &config), dec!(123));
        assert_eq!(apply_limit_bounds(dec!(1000), &config), dec!(1000));
    }

    #[test]
    fn test_limit_bounds_monotonic_in_initial_limit() {
        let config = EngineConfig::default();
        let mut previous = Decimal::MIN;
        let mut raw = dec!(-100);
        while raw <= dec!(1200) {
            let bounded = apply_limit_bounds(raw, &config);
            assert!(bounded >= previous, "not monotonic at {raw}");
            previous = bounded;
            raw += dec!(7.3);
        }
    }

    #[test]
    fn test_missing_statement_is_insufficient_data() {
        let profile = CreditProfile::new("user-1");
        let err =
            calculate_initial_limit(&profile, &EngineConfig::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CreditEngineError::InsufficientData(_)));
    }

    #[test]
    fn test_blank_user_id_is_rejected() {
        let mut profile = CreditProfile::new("  ");
        profile.upsert_statement(statement(healthy_metrics()));
        let err =
            calculate_initial_limit(&profile, &EngineConfig::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CreditEngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_invalid_correction_factor_is_rejected() {
        let mut profile = CreditProfile::new("user-1");
        profile.upsert_statement(statement(healthy_metrics()));
        profile.correction_factor = Some(dec!(1.2));
        let err =
            calculate_initial_limit(&profile, &EngineConfig::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CreditEngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_correction_factor_overrides_confidence() {
        let mut profile = CreditProfile::new("user-1");
        profile.upsert_statement(statement(healthy_metrics()));
        let now = Utc.with_ymd_and_hms(2025, 7, 21, 0, 0, 0).unwrap();
        let config = EngineConfig::default();

        let with_default = calculate_initial_limit(&profile, &config, now).unwrap();
        profile.correction_factor = Some(dec!(0.4));
        let with_override = calculate_initial_limit(&profile, &config, now).unwrap();

        // Same risk, half the confidence: exactly half the raw limit.
        assert_eq!(
            with_override.initial_limit * dec!(2),
            with_default.initial_limit
        );
    }
}
