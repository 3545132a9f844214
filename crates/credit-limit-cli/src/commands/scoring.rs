use clap::Args;
use serde_json::Value;

use credit_limit_core::kyc::calculate_kyc_scores;
use credit_limit_core::types::KycAnswers;

use crate::input;

/// Arguments for KYC questionnaire scoring
#[derive(Args)]
pub struct KycScoreArgs {
    /// Path to a JSON file of KYC answers (or pipe JSON via stdin);
    /// omitted entirely, the neutral fallback pair is returned
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_kyc_score(args: KycScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let answers: Option<KycAnswers> = if let Some(ref path) = args.input {
        Some(input::file::read_json(path)?)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Some(serde_json::from_value(data)?)
    } else {
        None
    };

    let scores = calculate_kyc_scores(answers.as_ref());
    Ok(serde_json::to_value(scores)?)
}
