use clap::Args;
use serde_json::Value;

use loan_engine_core::red_flags;
use loan_engine_core::{with_metadata, Loan};

use super::{load_thresholds, LoanFlags};
use crate::input;

/// Arguments for red-flag detection
#[derive(Args)]
pub struct RedFlagsArgs {
    /// Path to a JSON/YAML loan file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanFlags,

    /// Path to a JSON/YAML red-flag thresholds file
    #[arg(long)]
    pub thresholds: Option<String>,
}

pub fn run_red_flags(args: RedFlagsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: Loan = match input::load(args.input.as_deref())? {
        Some(loan) => loan,
        None => args.loan.into_loan()?,
    };
    let thresholds = load_thresholds(args.thresholds.as_deref())?;

    let flags = red_flags::evaluate_with_thresholds(&loan, &thresholds)?;
    tracing::info!("{} red flag(s) for loan {}", flags.len(), loan.id);

    let output = with_metadata(
        "Heuristic red-flag screen (advisory)",
        &thresholds,
        Vec::new(),
        flags,
    );
    Ok(serde_json::to_value(output)?)
}
