use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::comparison::LoanSummary;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMetric {
    TotalInterest,
    EffectiveApr,
    MonthlyPayment,
    TotalPaid,
}

impl ComparisonMetric {
    pub const ALL: [ComparisonMetric; 4] = [
        ComparisonMetric::TotalInterest,
        ComparisonMetric::EffectiveApr,
        ComparisonMetric::MonthlyPayment,
        ComparisonMetric::TotalPaid,
    ];

    fn value(self, summary: &LoanSummary) -> Decimal {
        match self {
            ComparisonMetric::TotalInterest => summary.total_interest,
            ComparisonMetric::EffectiveApr => summary.effective_apr_percent,
            ComparisonMetric::MonthlyPayment => summary.monthly_payment,
            ComparisonMetric::TotalPaid => summary.total_paid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDifference {
    pub metric: ComparisonMetric,
    pub reference_id: String,
    pub other_id: String,
    pub reference_value: Decimal,
    pub other_value: Decimal,
    /// `other - reference`; positive when the other loan is higher.
    pub absolute: Decimal,
    /// Absolute difference as a percentage of the reference value.
    pub percentage: Option<Percent>,
    /// Id of the loan with the higher value, `None` on a tie.
    pub higher_id: Option<String>,
}

pub(crate) fn diff_summaries(reference: &LoanSummary, other: &LoanSummary) -> Vec<MetricDifference> {
    ComparisonMetric::ALL
        .iter()
        .map(|&metric| {
            let reference_value = metric.value(reference);
            let other_value = metric.value(other);
            let absolute = other_value - reference_value;
            let percentage = if reference_value.is_zero() {
                None
            } else {
                Some(round_percent(absolute / reference_value * dec!(100)))
            };
            let higher_id = if absolute > Decimal::ZERO {
                Some(other.loan_id.clone())
            } else if absolute < Decimal::ZERO {
                Some(reference.loan_id.clone())
            } else {
                None
            };
            MetricDifference {
                metric,
                reference_id: reference.loan_id.clone(),
                other_id: other.loan_id.clone(),
                reference_value,
                other_value,
                absolute,
                percentage,
                higher_id,
            }
        })
        .collect()
}
