//! KYC questionnaire scoring.
//!
//! Categorical answers map to points on two 0-15 axes (character and
//! capacity) under a fixed marking scheme. Unmapped or missing answers take
//! the scheme's neutral defaults; an applicant with no answers at all scores
//! the fixed midpoint pair.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::KycAnswers;

/// Maximum raw score on either axis.
pub const MAX_AXIS_SCORE: Decimal = dec!(15);

/// Behavioral scores derived from the questionnaire, each on a 0-15 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KycScores {
    pub character_score: Decimal,
    pub capacity_score: Decimal,
}

/// Score the questionnaire. `None`, or a form with every question blank,
/// short-circuits to the neutral pair.
pub fn calculate_kyc_scores(answers: Option<&KycAnswers>) -> KycScores {
    let Some(a) = answers.filter(|a| !a.is_empty()) else {
        return KycScores {
            character_score: dec!(7.5),
            capacity_score: dec!(10),
        };
    };

    let character_score = residence_points(a.residence_duration.as_deref())
        + borrowing_history_points(a.borrowing_history.as_deref())
        + repayment_ability_points(a.repayment_ability.as_deref());

    let capacity_score = income_range_points(a.monthly_income_range.as_deref())
        + job_duration_points(a.job_duration.as_deref())
        + borrowing_source_points(a.borrowing_source.as_deref());

    KycScores {
        character_score,
        capacity_score,
    }
}

fn residence_points(answer: Option<&str>) -> Decimal {
    match answer {
        Some("More than 10 years") => dec!(5),
        Some("8 - 10 years") => dec!(4),
        Some("4 - 8 years") => dec!(3),
        Some("2 - 4 years") => dec!(2),
        Some("Less than 2 years") => dec!(1),
        _ => dec!(1),
    }
}

fn borrowing_history_points(answer: Option<&str>) -> Decimal {
    match answer {
        Some("Yes, but I paid it off") => dec!(5),
        Some("No, but I borrowed before") => dec!(4),
        Some("No") => dec!(3),
        Some("Yes, and I still owe money") => dec!(1),
        _ => dec!(3),
    }
}

fn repayment_ability_points(answer: Option<&str>) -> Decimal {
    match answer {
        Some("Yes, without delays or challenges") => dec!(5),
        Some("It's difficult but I manage to pay") => dec!(2),
        Some("Sometimes I wasn't able to pay back") => dec!(0),
        Some("Not applicable") => dec!(3),
        _ => dec!(3),
    }
}

fn income_range_points(answer: Option<&str>) -> Decimal {
    match answer {
        Some("Above 1800 GHS") => dec!(5),
        Some("1401 GHS - 1800 GHS") => dec!(4),
        Some("1001 GHS - 1400 GHS") => dec!(3),
        Some("701 GHS - 1000 GHS") => dec!(2),
        Some("351 GHS - 700 GHS") => dec!(1),
        Some("Below 350 GHS") => dec!(0),
        _ => dec!(0),
    }
}

fn job_duration_points(answer: Option<&str>) -> Decimal {
    match answer {
        Some("More than 10 years") => dec!(5),
        Some("8 - 10 years") => dec!(4),
        Some("4 - 8 years") => dec!(3),
        Some("2 - 4 years") => dec!(2),
        Some("Less than 2 years") => dec!(1),
        _ => dec!(1),
    }
}

fn borrowing_source_points(answer: Option<&str>) -> Decimal {
    match answer {
        Some("Banks") => dec!(5),
        Some("Other Financial apps (digital)") => dec!(5),
        Some("Mobile Money providers (MTN, Telecel, AT)") => dec!(4),
        Some("Money lenders (physical / shop)") => dec!(2),
        Some("Friends or family") => dec!(2),
        Some("No applicable") => dec!(3),
        _ => dec!(3),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
