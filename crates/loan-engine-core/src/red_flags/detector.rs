use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::effective_apr;
use crate::error::LoanEngineError;
use crate::loan::Loan;
use crate::red_flags::thresholds::RedFlagThresholds;
use crate::types::*;
use crate::LoanResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    FeeLoad,
    HighRate,
    ExcessiveFees,
    PrepaymentPenalty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    /// Measured value that tripped the flag.
    pub observed: Decimal,
    pub threshold: Decimal,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Severity escalates once the observed value doubles the threshold.
fn grade(observed: Decimal, threshold: Decimal) -> Severity {
    if threshold.is_zero() || observed >= threshold * dec!(2) {
        Severity::High
    } else {
        Severity::Medium
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate a loan against the default thresholds.
pub fn evaluate(loan: &Loan) -> LoanResult<Vec<Warning>> {
    evaluate_with_thresholds(loan, &RedFlagThresholds::default())
}

/// Evaluate a loan's terms against every heuristic.
///
/// Warnings are returned in flag-definition order: fee load, high rate,
/// excessive fees, prepayment penalty.
pub fn evaluate_with_thresholds(
    loan: &Loan,
    thresholds: &RedFlagThresholds,
) -> LoanResult<Vec<Warning>> {
    loan.validate()?;
    thresholds.validate()?;

    let mut warnings = Vec::new();

    // --- Fee load: effective APR vs nominal rate ---
    match effective_apr(loan) {
        Ok(apr) => {
            let gap = apr - loan.annual_rate_percent;
            if gap > thresholds.apr_gap_percent {
                warnings.push(Warning {
                    kind: WarningKind::FeeLoad,
                    severity: grade(gap, thresholds.apr_gap_percent),
                    message: format!(
                        "Effective APR {apr}% exceeds the stated {}% by {gap} points",
                        loan.annual_rate_percent
                    ),
                    observed: gap,
                    threshold: thresholds.apr_gap_percent,
                });
            }
        }
        // Advisory: a solver failure skips the fee-load check
        Err(e @ LoanEngineError::ConvergenceFailure { .. }) => {
            log::warn!("fee-load check skipped for loan {}: {e}", loan.id);
        }
        Err(e) => return Err(e),
    }

    // --- Nominal rate ceiling ---
    if loan.annual_rate_percent > thresholds.high_rate_ceiling_percent {
        warnings.push(Warning {
            kind: WarningKind::HighRate,
            severity: Severity::High,
            message: format!(
                "Annual rate {}% is above the {}% ceiling",
                loan.annual_rate_percent, thresholds.high_rate_ceiling_percent
            ),
            observed: loan.annual_rate_percent,
            threshold: thresholds.high_rate_ceiling_percent,
        });
    }

    // --- Fee ratio ---
    let fee_ratio = loan.fees() / loan.principal;
    if fee_ratio > thresholds.max_fee_ratio {
        warnings.push(Warning {
            kind: WarningKind::ExcessiveFees,
            severity: grade(fee_ratio, thresholds.max_fee_ratio),
            message: format!(
                "Upfront fees of {} are {}% of the principal",
                loan.fees(),
                round_percent(fee_ratio * dec!(100))
            ),
            observed: fee_ratio,
            threshold: thresholds.max_fee_ratio,
        });
    }

    // --- Prepayment penalty ---
    if let Some(penalty) = loan.prepayment_penalty_percent {
        if penalty > thresholds.max_prepayment_penalty_percent {
            warnings.push(Warning {
                kind: WarningKind::PrepaymentPenalty,
                severity: grade(penalty, thresholds.max_prepayment_penalty_percent)
                    .min(Severity::Medium),
                message: format!("Early payoff is penalised at {penalty}% of the prepaid balance"),
                observed: penalty,
                threshold: thresholds.max_prepayment_penalty_percent,
            });
        }
    }

    if !warnings.is_empty() {
        log::debug!("loan {} raised {} red flag(s)", loan.id, warnings.len());
    }

    Ok(warnings)
}
