use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use credit_limit_core::fuzzy::{FuzzyInputs, RiskEvaluator};
use credit_limit_core::limit::calculate_initial_limit;
use credit_limit_core::types::{CreditProfile, EngineConfig};

use crate::input;

/// Arguments for a direct fuzzy risk evaluation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RiskArgs {
    /// Debt-to-income ratio, [0, 1]
    #[arg(long)]
    pub dti: Decimal,

    /// Normalized balance volatility, [0, 1]
    #[arg(long)]
    pub volatility: Decimal,

    /// Normalized minimum balance, [0, 1]
    #[arg(long)]
    pub min_balance: Decimal,

    /// Rescaled KYC capacity score, [1, 5]
    #[arg(long)]
    pub debt_honesty: Decimal,

    /// Rescaled KYC character score, [1, 5]
    #[arg(long)]
    pub character: Decimal,
}

/// Arguments for the credit limit calculation
#[derive(Args)]
pub struct LimitArgs {
    /// Path to the credit profile JSON (or pipe JSON via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Confidence scalar applied to disposable income
    #[arg(long)]
    pub confidence_score: Option<Decimal>,

    /// Lower business bound on the limit
    #[arg(long)]
    pub minimum_limit: Option<Decimal>,

    /// Upper business bound on the limit
    #[arg(long)]
    pub maximum_limit: Option<Decimal>,

    /// Model version tag stamped on the result
    #[arg(long)]
    pub model_version: Option<String>,
}

pub fn run_risk(args: RiskArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = FuzzyInputs::new(
        args.dti,
        args.volatility,
        args.min_balance,
        args.debt_honesty,
        args.character,
    );
    let assessment = RiskEvaluator::new().assess(&inputs)?;
    Ok(serde_json::to_value(assessment)?)
}

pub fn run_limit(args: LimitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile: CreditProfile = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe a profile via stdin)".into());
    };

    let mut config = EngineConfig::default();
    if let Some(confidence) = args.confidence_score {
        config.confidence_score = confidence;
    }
    if let Some(minimum) = args.minimum_limit {
        config.minimum_credit_limit = minimum;
    }
    if let Some(maximum) = args.maximum_limit {
        config.maximum_credit_limit = maximum;
    }
    if let Some(version) = args.model_version {
        config.model_version = version;
    }

    let calculation = calculate_initial_limit(&profile, &config, Utc::now())?;
    Ok(serde_json::to_value(calculation)?)
}
