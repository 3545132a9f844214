use clap::{Args, ValueEnum};
use serde_json::Value;
use std::path::Path;

use chrono::Utc;
use credit_limit_core::statement::{analyze_statement, StatementAnalysisInput};
use credit_limit_core::types::{StatementRecord, StatementType};

/// Arguments for statement analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to the decoded statement export (CSV text)
    #[arg(long)]
    pub statement: String,

    /// Statement provider
    #[arg(long, value_enum)]
    pub statement_type: StatementKind,

    /// Applicant identifier, carried for diagnostics and record ownership
    #[arg(long)]
    pub user_id: String,

    /// Statement record id; defaults to the statement file name
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatementKind {
    Bank,
    MomoMtn,
}

impl From<StatementKind> for StatementType {
    fn from(kind: StatementKind) -> Self {
        match kind {
            StatementKind::Bank => StatementType::Bank,
            StatementKind::MomoMtn => StatementType::MomoMtn,
        }
    }
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.statement)
        .map_err(|e| format!("Failed to read '{}': {}", args.statement, e))?;

    let statement_type = StatementType::from(args.statement_type);
    let analysis_input = StatementAnalysisInput {
        statement_type,
        content,
        user_id: args.user_id,
    };
    let metrics = analyze_statement(&analysis_input)?;

    let file_name = Path::new(&args.statement)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(args.statement.as_str())
        .to_string();
    let record = StatementRecord::new(
        args.id.unwrap_or(file_name),
        args.statement,
        statement_type,
        Utc::now(),
        metrics,
    );

    Ok(serde_json::to_value(record)?)
}
