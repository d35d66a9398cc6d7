use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use loan_engine_core::amortization::{self, AmortizationOptions};
use loan_engine_core::comparison::{self, ComparisonOptions};
use loan_engine_core::payoff::{self, PlanOptions, Strategy};
use loan_engine_core::red_flags::{self, RedFlagThresholds};
use loan_engine_core::Loan;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct AmortizeInput {
    #[serde(flatten)]
    loan: Loan,
    #[serde(default)]
    extra_monthly_payment: Decimal,
}

#[derive(Deserialize)]
struct CompareInput {
    loans: Vec<Loan>,
    #[serde(default)]
    options: ComparisonOptions,
}

#[derive(Deserialize)]
struct PlanInput {
    loans: Vec<Loan>,
    #[serde(default)]
    monthly_extra: Decimal,
    strategy: Strategy,
    #[serde(default)]
    options: PlanOptions,
}

#[derive(Deserialize)]
struct RedFlagInput {
    loan: Loan,
    #[serde(default)]
    thresholds: RedFlagThresholds,
}

// ---------------------------------------------------------------------------
// Single loan
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize_loan(input_json: String) -> NapiResult<String> {
    let input: AmortizeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let options = AmortizationOptions {
        extra_monthly_payment: input.extra_monthly_payment,
    };
    let output =
        amortization::amortize_with_options(&input.loan, &options).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn effective_apr(input_json: String) -> NapiResult<String> {
    let loan: Loan = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let apr = amortization::effective_apr(&loan).map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({
        "loan_id": loan.id,
        "effective_apr_percent": apr,
    }))
    .map_err(to_napi_error)
}

#[napi]
pub fn evaluate_red_flags(input_json: String) -> NapiResult<String> {
    let input: RedFlagInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = red_flags::evaluate_with_thresholds(&input.loan, &input.thresholds)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Multiple loans
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_loans(input_json: String) -> NapiResult<String> {
    let input: CompareInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        comparison::compare_with_options(&input.loans, &input.options).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn plan_payoff(input_json: String) -> NapiResult<String> {
    let input: PlanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payoff::plan_with_options(
        &input.loans,
        input.monthly_extra,
        input.strategy,
        &input.options,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
