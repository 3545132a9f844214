//! Mamdani fuzzy-inference risk model.
//!
//! Covers:
//! 1. **Membership** -- triangular functions over each variable's universe.
//! 2. **Rule base** -- five fixed rules (OR = max, AND = min).
//! 3. **Inference** -- min-clip implication, max aggregation.
//! 4. **Defuzzification** -- centroid over the discretized output universe.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

pub mod engine;
pub mod membership;

pub use engine::{FuzzyInputs, RiskAssessment, RiskEvaluator};
pub use membership::TriangularMf;
