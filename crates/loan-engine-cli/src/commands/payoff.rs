use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use loan_engine_core::payoff::{self, PlanOptions, Strategy};
use loan_engine_core::{with_metadata, Loan, Money};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Snowball,
    Avalanche,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Snowball => Strategy::Snowball,
            StrategyArg::Avalanche => Strategy::Avalanche,
        }
    }
}

#[derive(Deserialize)]
struct PlanRequest {
    loans: Vec<Loan>,
    #[serde(default)]
    monthly_extra: Option<Money>,
    #[serde(default)]
    strategy: Option<Strategy>,
    #[serde(default)]
    options: Option<PlanOptions>,
}

/// Arguments for a multi-loan payoff plan
#[derive(Args)]
pub struct PlanArgs {
    /// Path to a JSON/YAML file with a `loans` array
    #[arg(long)]
    pub input: Option<String>,

    /// Extra budget applied every month on top of minimum payments
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Payoff ordering
    #[arg(long)]
    pub strategy: Option<StrategyArg>,

    /// Months to simulate before giving up
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Add freed minimum payments of retired loans to the extra budget
    #[arg(long)]
    pub rollover: bool,

    /// Print only the summary and payoff timeline, not every month
    #[arg(long)]
    pub summary_only: bool,
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PlanRequest = input::load(args.input.as_deref())?
        .ok_or("--input <file> or stdin with a `loans` array required for plan")?;

    let monthly_extra = args
        .extra
        .or(request.monthly_extra)
        .unwrap_or(Decimal::ZERO);
    let strategy = args
        .strategy
        .map(Strategy::from)
        .or(request.strategy)
        .unwrap_or(Strategy::Avalanche);
    let mut options = request.options.unwrap_or_default();
    if let Some(horizon) = args.horizon {
        options.horizon_months = horizon;
    }
    if args.rollover {
        options.rollover_freed_minimums = true;
    }

    let plan = payoff::plan_with_options(&request.loans, monthly_extra, strategy, &options)?;

    let mut warnings = Vec::new();
    if plan.summary.baseline_months_to_payoff.is_none() {
        warnings.push(format!(
            "Minimum payments alone never retire these loans within {} months",
            options.horizon_months
        ));
    }

    let assumptions = serde_json::json!({
        "strategy": strategy,
        "monthly_extra": monthly_extra.to_string(),
        "options": options,
    });
    let methodology = format!("{strategy} payoff simulation with minimum-only baseline");

    let value = if args.summary_only {
        serde_json::to_value(with_metadata(
            &methodology,
            &assumptions,
            warnings,
            serde_json::json!({
                "summary": plan.summary,
                "payoffs": plan.payoffs,
            }),
        ))?
    } else {
        serde_json::to_value(with_metadata(&methodology, &assumptions, warnings, plan))?
    };
    Ok(value)
}
