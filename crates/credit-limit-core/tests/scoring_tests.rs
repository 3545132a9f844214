use chrono::{TimeZone, Utc};
use credit_limit_core::fuzzy::{FuzzyInputs, RiskEvaluator};
use credit_limit_core::kyc::calculate_kyc_scores;
use credit_limit_core::limit::{apply_limit_bounds, calculate_initial_limit, normalize_inputs};
use credit_limit_core::types::{
    CreditProfile, EngineConfig, KycAnswers, StatementMetrics, StatementRecord, StatementType,
};
use credit_limit_core::CreditEngineError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn metrics(
    income: Decimal,
    expenditure: Decimal,
    lowest: Decimal,
    volatility: Decimal,
) -> StatementMetrics {
    StatementMetrics {
        avg_monthly_income: income,
        avg_monthly_expenditure: expenditure,
        disposable_income: income - expenditure,
        avg_lowest_monthly_balance: lowest,
        balance_volatility: volatility,
        expenditure_outlier_count: 0,
    }
}

fn profile_with(metrics: StatementMetrics, answers: Option<KycAnswers>) -> CreditProfile {
    let mut profile = CreditProfile::new("user-1");
    profile.kyc_answers = answers;
    profile.upsert_statement(StatementRecord::new(
        "jul.csv",
        "statements/bank/user-1/jul.csv",
        StatementType::Bank,
        Utc.with_ymd_and_hms(2025, 7, 20, 9, 0, 0).unwrap(),
        metrics,
    ));
    profile
}

fn best_answers() -> KycAnswers {
    KycAnswers {
        residence_duration: Some("More than 10 years".into()),
        borrowing_history: Some("Yes, but I paid it off".into()),
        repayment_ability: Some("Yes, without delays or challenges".into()),
        monthly_income_range: Some("Above 1800 GHS".into()),
        job_duration: Some("More than 10 years".into()),
        borrowing_source: Some("Banks".into()),
    }
}

// ===========================================================================
// Normalization scenarios
// ===========================================================================

#[test]
fn test_absent_kyc_answers_feed_forward_as_neutral_inputs() {
    let scores = calculate_kyc_scores(None);
    assert_eq!(scores.character_score, dec!(7.5));
    assert_eq!(scores.capacity_score, dec!(10));

    let profile = profile_with(metrics(dec!(1000), dec!(200), dec!(800), dec!(100)), None);
    let inputs = normalize_inputs(profile.latest_statement().unwrap(), &scores);
    // debt_honesty = 1 + (10/15)*4, character = 1 + (7.5/15)*4.
    assert!((inputs.debt_honesty - dec!(3.6667)).abs() < dec!(0.0001));
    assert_eq!(inputs.character, dec!(3.0));
}

#[test]
fn test_zero_income_overrides_raw_statement_numbers() {
    // Raw numbers would suggest a comfortable balance sheet; zero income
    // must still force the maximally risky normalization.
    let profile = profile_with(metrics(dec!(0), dec!(50), dec!(5000), dec!(10)), None);
    let scores = calculate_kyc_scores(None);
    let inputs = normalize_inputs(profile.latest_statement().unwrap(), &scores);
    assert_eq!(inputs.dti, Decimal::ONE);
    assert_eq!(inputs.volatility, Decimal::ONE);
    assert_eq!(inputs.min_balance, Decimal::ZERO);
}

// ===========================================================================
// End-to-end limit calculation
// ===========================================================================

#[test]
fn test_healthy_profile_gets_a_mid_range_limit() {
    let profile = profile_with(
        metrics(dec!(1000), dec!(200), dec!(800), dec!(100)),
        Some(best_answers()),
    );
    let now = Utc.with_ymd_and_hms(2025, 7, 21, 0, 0, 0).unwrap();
    let calc = calculate_initial_limit(&profile, &EngineConfig::default(), now).unwrap();

    // dti 0.2, volatility 0.1, min balance 0.8, both KYC axes at 5: only
    // the low-risk rule fires.
    assert!(calc.risk_score_output < dec!(0.25));
    assert!(calc.user_risk_score > dec!(0.75));

    // 800 * 0.8 * user score, truncated; bounds not hit.
    assert_eq!(calc.record.credit_limit, calc.initial_limit.trunc());
    assert!(calc.record.credit_limit > dec!(480));
    assert!(calc.record.credit_limit < dec!(640));
    assert_eq!(calc.record.model_version, "v1.0.0");
    assert_eq!(calc.record.user_id, "user-1");
}

#[test]
fn test_zero_income_profile_gets_the_floor() {
    let profile = profile_with(metrics(dec!(0), dec!(500), dec!(900), dec!(50)), None);
    let now = Utc.with_ymd_and_hms(2025, 7, 21, 0, 0, 0).unwrap();
    let calc = calculate_initial_limit(&profile, &EngineConfig::default(), now).unwrap();

    // Forced (1, 1, 0) inputs put the high-risk rule at full strength, and
    // negative disposable income sinks the raw limit below the floor.
    assert!(calc.risk_score_output > dec!(0.7));
    assert!(calc.initial_limit < dec!(50));
    assert_eq!(calc.record.credit_limit, dec!(50));
}

#[test]
fn test_limit_is_idempotent_for_a_fixed_timestamp() {
    let profile = profile_with(
        metrics(dec!(1000), dec!(200), dec!(800), dec!(100)),
        Some(best_answers()),
    );
    let now = Utc.with_ymd_and_hms(2025, 7, 21, 0, 0, 0).unwrap();
    let config = EngineConfig::default();

    let first = calculate_initial_limit(&profile, &config, now).unwrap();
    let second = calculate_initial_limit(&profile, &config, now).unwrap();
    assert_eq!(first.record, second.record);
    assert_eq!(first.risk_score_output, second.risk_score_output);
}

#[test]
fn test_limit_uses_the_most_recent_statement() {
    let mut profile = profile_with(
        metrics(dec!(1000), dec!(200), dec!(800), dec!(100)),
        Some(best_answers()),
    );
    // An older statement with zero income must not drive the decision.
    profile.upsert_statement(StatementRecord::new(
        "jan.csv",
        "statements/bank/user-1/jan.csv",
        StatementType::Bank,
        Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap(),
        metrics(dec!(0), dec!(500), dec!(0), dec!(0)),
    ));
    let now = Utc.with_ymd_and_hms(2025, 7, 21, 0, 0, 0).unwrap();
    let calc = calculate_initial_limit(&profile, &EngineConfig::default(), now).unwrap();
    assert!(calc.record.credit_limit > dec!(50));
}

#[test]
fn test_no_statements_is_fatal_for_the_run() {
    let profile = CreditProfile::new("user-1");
    let err =
        calculate_initial_limit(&profile, &EngineConfig::default(), Utc::now()).unwrap_err();
    assert!(matches!(err, CreditEngineError::InsufficientData(_)));
}

// ===========================================================================
// Business rule properties
// ===========================================================================

#[test]
fn test_clamp_correctness() {
    let config = EngineConfig::default();
    assert_eq!(apply_limit_bounds(dec!(2000), &config), dec!(1000));
    assert_eq!(apply_limit_bounds(dec!(10), &config), dec!(50));
    assert_eq!(apply_limit_bounds(dec!(537.93), &config), dec!(537));
}

#[test]
fn test_limit_monotonic_in_disposable_income() {
    let now = Utc.with_ymd_and_hms(2025, 7, 21, 0, 0, 0).unwrap();
    let config = EngineConfig::default();
    let mut previous = Decimal::ZERO;
    // Same normalized inputs throughout (expenditure scales with income),
    // so only disposable income moves.
    for income in [dec!(500), dec!(1000), dec!(1500), dec!(2000)] {
        let expenditure = income * dec!(0.2);
        let lowest = income * dec!(0.8);
        let volatility = income * dec!(0.1);
        let profile = profile_with(
            metrics(income, expenditure, lowest, volatility),
            Some(best_answers()),
        );
        let calc = calculate_initial_limit(&profile, &config, now).unwrap();
        assert!(
            calc.record.credit_limit >= previous,
            "limit decreased at income {income}"
        );
        previous = calc.record.credit_limit;
    }
}

#[test]
fn test_limit_monotonic_in_user_risk_score() {
    let config = EngineConfig::default();
    let disposable = dec!(800);
    let mut previous = Decimal::ZERO;
    for user_score in [dec!(0.1), dec!(0.3), dec!(0.5), dec!(0.7), dec!(0.9)] {
        let bounded = apply_limit_bounds(disposable * config.confidence_score * user_score, &config);
        assert!(bounded >= previous, "limit decreased at score {user_score}");
        previous = bounded;
    }
}

// ===========================================================================
// Fuzzy engine scenarios
// ===========================================================================

#[test]
fn test_fuzzy_engine_orders_applicants_by_quality() {
    let evaluator = RiskEvaluator::new();
    let strong = evaluator
        .evaluate(&FuzzyInputs::new(
            dec!(0.1),
            dec!(0.1),
            dec!(0.8),
            dec!(4.5),
            dec!(4.5),
        ))
        .unwrap();
    let weak = evaluator
        .evaluate(&FuzzyInputs::new(
            dec!(0.9),
            dec!(0.9),
            dec!(0.1),
            dec!(1.5),
            dec!(1.5),
        ))
        .unwrap();
    assert!(strong < weak);
    assert!(strong < dec!(0.25));
    assert!(weak > dec!(0.7));
}

#[test]
fn test_shared_evaluator_matches_fresh_instances() {
    // One long-lived evaluator and per-call instances agree, so callers may
    // choose either concurrency style.
    let shared = RiskEvaluator::new();
    let inputs = FuzzyInputs::new(dec!(0.25), dec!(0.2), dec!(0.6), dec!(4), dec!(4));
    assert_eq!(
        shared.evaluate(&inputs).unwrap(),
        RiskEvaluator::new().evaluate(&inputs).unwrap()
    );
}
