//! Side-by-side comparison of two or more loans.

pub mod diff;
pub mod resample;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{amortize, effective_apr};
use crate::error::LoanEngineError;
use crate::loan::{validate_all, Loan};
use crate::red_flags::{evaluate_with_thresholds, RedFlagThresholds, Warning};
use crate::types::*;
use crate::LoanResult;

pub use diff::{ComparisonMetric, MetricDifference};
pub use resample::{checkpoints, LoanSeries, SeriesPoint};

/// Default spacing between chart checkpoints, in months.
pub const DEFAULT_CHECKPOINT_INTERVAL: u32 = 6;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    pub checkpoint_interval: u32,
    pub thresholds: RedFlagThresholds,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        ComparisonOptions {
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            thresholds: RedFlagThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub loan_id: String,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub effective_apr_percent: Percent,
    pub payoff_period: u32,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanComparison {
    /// Shared checkpoint periods every series is sampled at.
    pub checkpoints: Vec<u32>,
    pub series: Vec<LoanSeries>,
    pub summaries: Vec<LoanSummary>,
    /// Loan every other loan is measured against (the first supplied).
    pub reference_id: String,
    pub differences: Vec<MetricDifference>,
    pub highest_total_interest_id: String,
    pub highest_effective_apr_id: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare loans with the default checkpoint interval and thresholds.
pub fn compare(loans: &[Loan]) -> LoanResult<LoanComparison> {
    compare_with_options(loans, &ComparisonOptions::default())
}

/// Amortize every loan, align the schedules on common checkpoints and diff
/// each loan against the first.
pub fn compare_with_options(
    loans: &[Loan],
    options: &ComparisonOptions,
) -> LoanResult<LoanComparison> {
    if loans.len() < 2 {
        return Err(LoanEngineError::InsufficientLoans {
            required: 2,
            supplied: loans.len(),
        });
    }
    if options.checkpoint_interval == 0 {
        return Err(LoanEngineError::InvalidInput {
            field: "checkpoint_interval".into(),
            reason: "Checkpoint interval must be at least 1 month".into(),
        });
    }
    validate_all(loans)?;

    let mut schedules = Vec::with_capacity(loans.len());
    let mut summaries = Vec::with_capacity(loans.len());
    for loan in loans {
        let schedule = amortize(loan)?;
        summaries.push(LoanSummary {
            loan_id: loan.id.clone(),
            monthly_payment: schedule.monthly_payment,
            total_interest: schedule.total_interest,
            total_paid: schedule.total_paid,
            effective_apr_percent: effective_apr(loan)?,
            payoff_period: schedule.payoff_period,
            warnings: evaluate_with_thresholds(loan, &options.thresholds)?,
        });
        schedules.push(schedule);
    }

    let shortest = loans
        .iter()
        .map(|l| l.term_months)
        .min()
        .unwrap_or(options.checkpoint_interval);
    let points = checkpoints(shortest, options.checkpoint_interval);
    let series = schedules
        .iter()
        .map(|s| resample::resample(s, &points))
        .collect();

    let reference = &summaries[0];
    let differences = summaries[1..]
        .iter()
        .flat_map(|other| diff::diff_summaries(reference, other))
        .collect();

    let highest_total_interest_id = highest_by(&summaries, |s| s.total_interest);
    let highest_effective_apr_id = highest_by(&summaries, |s| s.effective_apr_percent);

    log::debug!(
        "compared {} loans over {} checkpoints",
        loans.len(),
        points.len()
    );

    Ok(LoanComparison {
        checkpoints: points,
        series,
        reference_id: reference.loan_id.clone(),
        summaries,
        differences,
        highest_total_interest_id,
        highest_effective_apr_id,
    })
}

/// Id of the summary with the largest metric; the earliest wins ties.
fn highest_by(summaries: &[LoanSummary], metric: impl Fn(&LoanSummary) -> Decimal) -> String {
    let mut best: Option<&LoanSummary> = None;
    for s in summaries {
        match best {
            Some(b) if metric(s) <= metric(b) => {}
            _ => best = Some(s),
        }
    }
    best.map(|s| s.loan_id.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pair() -> Vec<Loan> {
        vec![
            Loan::new("a", dec!(10000), dec!(6), 36),
            Loan::new("b", dec!(10000), dec!(9), 36),
        ]
    }

    #[test]
    fn test_requires_two_loans() {
        let one = vec![Loan::new("a", dec!(10000), dec!(6), 36)];
        assert!(matches!(
            compare(&one),
            Err(LoanEngineError::InsufficientLoans {
                required: 2,
                supplied: 1
            })
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let options = ComparisonOptions {
            checkpoint_interval: 0,
            ..Default::default()
        };
        assert!(compare_with_options(&pair(), &options).is_err());
    }

    #[test]
    fn test_highest_ids() {
        let result = compare(&pair()).unwrap();
        assert_eq!(result.reference_id, "a");
        assert_eq!(result.highest_total_interest_id, "b");
        assert_eq!(result.highest_effective_apr_id, "b");
        assert_eq!(result.checkpoints, vec![6, 12, 18, 24, 30, 36]);
    }
}
