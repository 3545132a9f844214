mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::limit::{LimitArgs, RiskArgs};
use commands::scoring::KycScoreArgs;
use commands::statement::AnalyzeArgs;

/// Statement analysis and fuzzy credit-limit scoring
#[derive(Parser)]
#[command(
    name = "cle",
    version,
    about = "Statement analysis and fuzzy credit-limit scoring",
    long_about = "A CLI for turning bank and mobile-money statement exports into \
                  normalized financial metrics and running the fuzzy-logic credit \
                  limit engine, with decimal precision throughout."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a statement export into monthly financial metrics
    Analyze(AnalyzeArgs),
    /// Score KYC questionnaire answers on the character and capacity axes
    KycScore(KycScoreArgs),
    /// Run the fuzzy risk model on normalized inputs
    Risk(RiskArgs),
    /// Calculate the initial credit limit for a profile
    Limit(LimitArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::statement::run_analyze(args),
        Commands::KycScore(args) => commands::scoring::run_kyc_score(args),
        Commands::Risk(args) => commands::limit::run_risk(args),
        Commands::Limit(args) => commands::limit::run_limit(args),
        Commands::Version => {
            println!("cle {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
