use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use loan_engine_core::comparison::{self, ComparisonOptions};
use loan_engine_core::{with_metadata, Loan};

use super::load_thresholds;
use crate::input;

#[derive(Deserialize)]
struct CompareRequest {
    loans: Vec<Loan>,
    #[serde(default)]
    options: Option<ComparisonOptions>,
}

/// Arguments for a side-by-side loan comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON/YAML file with a `loans` array
    #[arg(long)]
    pub input: Option<String>,

    /// Months between chart checkpoints
    #[arg(long)]
    pub interval: Option<u32>,

    /// Path to a JSON/YAML red-flag thresholds file
    #[arg(long)]
    pub thresholds: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: CompareRequest = input::load(args.input.as_deref())?
        .ok_or("--input <file> or stdin with a `loans` array required for compare")?;

    let mut options = request.options.unwrap_or_default();
    if let Some(interval) = args.interval {
        options.checkpoint_interval = interval;
    }
    if args.thresholds.is_some() {
        options.thresholds = load_thresholds(args.thresholds.as_deref())?;
    }

    let result = comparison::compare_with_options(&request.loans, &options)?;

    let warnings = result
        .summaries
        .iter()
        .flat_map(|s| s.warnings.iter().map(move |w| format!("{}: {}", s.loan_id, w.message)))
        .collect();

    let output = with_metadata(
        "Loan comparison against the first loan",
        &options,
        warnings,
        result,
    );
    Ok(serde_json::to_value(output)?)
}
