use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::AmortizationResult;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: u32,
    pub remaining_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSeries {
    pub loan_id: String,
    pub points: Vec<SeriesPoint>,
}

/// Checkpoint periods `interval, 2·interval, …` up to `cap`, always ending on `cap`.
pub fn checkpoints(cap: u32, interval: u32) -> Vec<u32> {
    if cap == 0 || interval == 0 {
        return Vec::new();
    }
    let mut points: Vec<u32> = (interval..=cap).step_by(interval as usize).collect();
    if points.last() != Some(&cap) {
        points.push(cap);
    }
    points
}

/// Sample a schedule at the given periods. Periods past payoff report a
/// settled loan.
pub fn resample(schedule: &AmortizationResult, periods: &[u32]) -> LoanSeries {
    let mut points = Vec::with_capacity(periods.len());
    let mut cumulative_interest = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;
    let mut rows = schedule.rows.iter().peekable();
    let mut balance = schedule.principal_basis;

    for &period in periods {
        while let Some(row) = rows.next_if(|r| r.period <= period) {
            cumulative_interest += row.interest_portion;
            cumulative_principal += row.principal_portion;
            balance = row.remaining_balance;
        }
        points.push(SeriesPoint {
            period,
            remaining_balance: balance,
            cumulative_interest,
            cumulative_principal,
        });
    }

    LoanSeries {
        loan_id: schedule.loan_id.clone(),
        points,
    }
}
