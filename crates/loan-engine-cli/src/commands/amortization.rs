use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use loan_engine_core::amortization::{self, AmortizationOptions};
use loan_engine_core::{with_metadata, Loan, Money};

use super::LoanFlags;
use crate::input;

/// Loan plus schedule options, as read from a file or stdin
#[derive(Deserialize)]
struct AmortizeRequest {
    #[serde(flatten)]
    loan: Loan,
    #[serde(default)]
    extra_monthly_payment: Money,
}

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to a JSON/YAML loan file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanFlags,

    /// Extra principal paid every month
    #[arg(long)]
    pub extra: Option<Decimal>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = match input::load::<AmortizeRequest>(args.input.as_deref())? {
        Some(req) => req,
        None => AmortizeRequest {
            loan: args.loan.into_loan()?,
            extra_monthly_payment: Decimal::ZERO,
        },
    };
    let options = AmortizationOptions {
        extra_monthly_payment: args.extra.unwrap_or(request.extra_monthly_payment),
    };

    let result = amortization::amortize_with_options(&request.loan, &options)?;

    let mut warnings = Vec::new();
    if result.payoff_period < request.loan.term_months {
        warnings.push(format!(
            "Extra payments retire the loan in {} of {} months",
            result.payoff_period, request.loan.term_months
        ));
    }

    let output = with_metadata(
        "Level-payment amortization (cents rounding, final period absorbs residue)",
        &serde_json::json!({
            "loan": request.loan,
            "extra_monthly_payment": options.extra_monthly_payment.to_string(),
        }),
        warnings,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

/// Arguments for effective APR
#[derive(Args)]
pub struct AprArgs {
    /// Path to a JSON/YAML loan file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanFlags,
}

pub fn run_apr(args: AprArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: Loan = match input::load(args.input.as_deref())? {
        Some(loan) => loan,
        None => args.loan.into_loan()?,
    };

    let apr = amortization::effective_apr(&loan)?;
    let output = with_metadata(
        "Effective APR: annualized IRR of payments against net proceeds",
        &loan,
        Vec::new(),
        serde_json::json!({
            "loan_id": loan.id,
            "nominal_rate_percent": loan.annual_rate_percent,
            "effective_apr_percent": apr,
            "apr_gap_percent": apr - loan.annual_rate_percent,
        }),
    );
    Ok(serde_json::to_value(output)?)
}
