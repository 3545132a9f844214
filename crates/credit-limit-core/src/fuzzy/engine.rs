//! Rule base and Mamdani evaluation.
//!
//! Five antecedents feed a fixed five-rule base. Each rule clips its
//! consequent term at the rule's firing strength; the clipped terms are
//! aggregated by max over a discretized output universe and defuzzified by
//! centroid.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CreditEngineError;
use crate::CreditEngineResult;

use super::membership::TriangularMf;

/// Steps across the [0, 1] output universe. A 0.01 resolution reproduces
/// the reference results to two decimal places.
const OUTPUT_STEPS: u32 = 100;

/// Crisp inputs to the risk model, clamped into their universes at
/// construction and never out of range afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzyInputs {
    /// Debt-to-income ratio, [0, 1].
    pub dti: Decimal,
    /// Normalized balance volatility, [0, 1].
    pub volatility: Decimal,
    /// Normalized minimum balance, [0, 1].
    pub min_balance: Decimal,
    /// Rescaled KYC capacity score, [1, 5].
    pub debt_honesty: Decimal,
    /// Rescaled KYC character score, [1, 5].
    pub character: Decimal,
}

impl FuzzyInputs {
    pub fn new(
        dti: Decimal,
        volatility: Decimal,
        min_balance: Decimal,
        debt_honesty: Decimal,
        character: Decimal,
    ) -> Self {
        Self {
            dti: clamp(dti, Decimal::ZERO, Decimal::ONE),
            volatility: clamp(volatility, Decimal::ZERO, Decimal::ONE),
            min_balance: clamp(min_balance, Decimal::ZERO, Decimal::ONE),
            debt_honesty: clamp(debt_honesty, dec!(1), dec!(5)),
            character: clamp(character, dec!(1), dec!(5)),
        }
    }
}

fn clamp(x: Decimal, lo: Decimal, hi: Decimal) -> Decimal {
    x.max(lo).min(hi)
}

/// Raw model output and the applicant-facing inverted score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Crisp defuzzified risk, [0, 1], 1 = high-risk dominant.
    pub risk_score_output: Decimal,
    /// `1 - risk_score_output`; higher is better.
    pub user_risk_score: Decimal,
}

/// The three linguistic terms of one variable, from its low end to its
/// high end (stable/moderate/volatile, poor/fair/good, and so on).
#[derive(Debug, Clone, Copy)]
struct Terms {
    low: TriangularMf,
    mid: TriangularMf,
    high: TriangularMf,
}

/// Immutable Mamdani evaluator.
///
/// Construction wires the fixed membership functions; evaluation holds no
/// internal state, so one instance may be built once and shared across
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct RiskEvaluator {
    dti: Terms,
    volatility: Terms,
    min_balance: Terms,
    debt_honesty: Terms,
    character: Terms,
    risk: Terms,
}

impl Default for RiskEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskEvaluator {
    pub fn new() -> Self {
        let ratio_terms = Terms {
            low: TriangularMf::new(dec!(0), dec!(0), dec!(0.3)),
            mid: TriangularMf::new(dec!(0.2), dec!(0.5), dec!(0.8)),
            high: TriangularMf::new(dec!(0.6), dec!(1), dec!(1)),
        };
        let score_terms = Terms {
            low: TriangularMf::new(dec!(1), dec!(1), dec!(3)),
            mid: TriangularMf::new(dec!(2), dec!(3), dec!(4)),
            high: TriangularMf::new(dec!(3), dec!(5), dec!(5)),
        };
        Self {
            dti: ratio_terms,
            volatility: Terms {
                low: TriangularMf::new(dec!(0), dec!(0), dec!(0.4)),
                mid: TriangularMf::new(dec!(0.3), dec!(0.5), dec!(0.7)),
                high: TriangularMf::new(dec!(0.6), dec!(1), dec!(1)),
            },
            min_balance: ratio_terms,
            debt_honesty: score_terms,
            character: score_terms,
            risk: Terms {
                low: TriangularMf::new(dec!(0), dec!(0), dec!(0.4)),
                mid: TriangularMf::new(dec!(0.3), dec!(0.5), dec!(0.7)),
                high: TriangularMf::new(dec!(0.6), dec!(1), dec!(1)),
            },
        }
    }

    /// Clipped consequent strengths for (low, medium, high) risk.
    fn rule_activations(&self, inputs: &FuzzyInputs) -> (Decimal, Decimal, Decimal) {
        let dti_low = self.dti.low.membership(inputs.dti);
        let dti_med = self.dti.mid.membership(inputs.dti);
        let dti_high = self.dti.high.membership(inputs.dti);

        let vol_stable = self.volatility.low.membership(inputs.volatility);
        let vol_moderate = self.volatility.mid.membership(inputs.volatility);
        let vol_volatile = self.volatility.high.membership(inputs.volatility);

        let min_balance_low = self.min_balance.low.membership(inputs.min_balance);

        let honesty_poor = self.debt_honesty.low.membership(inputs.debt_honesty);
        let honesty_fair = self.debt_honesty.mid.membership(inputs.debt_honesty);
        let honesty_good = self.debt_honesty.high.membership(inputs.debt_honesty);

        let character_weak = self.character.low.membership(inputs.character);
        let character_average = self.character.mid.membership(inputs.character);
        let character_strong = self.character.high.membership(inputs.character);

        // R1: DTI high or Volatility volatile -> risk high.
        let r1 = dti_high.max(vol_volatile);
        // R2: MinBalance low and (DTI med or Volatility moderate) -> risk medium.
        let r2 = min_balance_low.min(dti_med.max(vol_moderate));
        // R3: DebtHonesty good and Character strong and DTI low -> risk low.
        let r3 = honesty_good.min(character_strong).min(dti_low);
        // R4: DebtHonesty poor or Character weak -> risk high.
        let r4 = honesty_poor.max(character_weak);
        // R5: DebtHonesty fair and Character average and Volatility stable -> risk medium.
        let r5 = honesty_fair.min(character_average).min(vol_stable);

        (r3, r2.max(r5), r1.max(r4))
    }

    /// Run Mamdani inference and return the crisp risk score in [0, 1].
    pub fn evaluate(&self, inputs: &FuzzyInputs) -> CreditEngineResult<Decimal> {
        let (act_low, act_medium, act_high) = self.rule_activations(inputs);

        let step = dec!(0.01);
        let mut weighted = Decimal::ZERO;
        let mut mass = Decimal::ZERO;
        for i in 0..=OUTPUT_STEPS {
            let x = Decimal::from(i) * step;
            let mu = act_low
                .min(self.risk.low.membership(x))
                .max(act_medium.min(self.risk.mid.membership(x)))
                .max(act_high.min(self.risk.high.membership(x)));
            weighted += x * mu;
            mass += mu;
        }

        if mass.is_zero() {
            return Err(CreditEngineError::Compute(
                "aggregated risk region is empty; no rule fired for the given inputs".into(),
            ));
        }
        Ok(weighted / mass)
    }

    /// Inference plus the applicant-facing inversion.
    pub fn assess(&self, inputs: &FuzzyInputs) -> CreditEngineResult<RiskAssessment> {
        let risk_score_output = self.evaluate(inputs)?;
        Ok(RiskAssessment {
            risk_score_output,
            user_risk_score: Decimal::ONE - risk_score_output,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
