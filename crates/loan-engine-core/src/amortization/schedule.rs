use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanEngineError;
use crate::loan::Loan;
use crate::types::*;
use crate::LoanResult;

/// Upper bound on rows reserved ahead of the period loop (50 years).
const MAX_PREALLOCATED_ROWS: u32 = 600;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationOptions {
    /// Additional principal paid every period on top of the level payment.
    #[serde(default)]
    pub extra_monthly_payment: Money,
}

/// A single period in the amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub loan_id: String,
    /// Standard level payment, rounded to cents.
    pub monthly_payment: Money,
    pub principal_basis: Money,
    pub rows: Vec<AmortizationRow>,
    pub total_interest: Money,
    pub total_paid: Money,
    pub payoff_period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

impl AmortizationResult {
    /// Sum of the principal portions across all rows.
    pub fn total_principal(&self) -> Money {
        self.rows.iter().map(|r| r.principal_portion).sum()
    }

    /// Row for `period`, or `None` past payoff.
    pub fn row(&self, period: u32) -> Option<&AmortizationRow> {
        period
            .checked_sub(1)
            .and_then(|idx| self.rows.get(idx as usize))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the full amortization schedule for a loan.
pub fn amortize(loan: &Loan) -> LoanResult<AmortizationResult> {
    amortize_with_options(loan, &AmortizationOptions::default())
}

/// Build the amortization schedule with a recurring extra principal payment.
///
/// Interest is rounded to cents each period and the level payment is rounded
/// up to the cent. The last period pays the exact remaining balance, so
/// principal portions always sum to the principal basis. Sub-cent level
/// payments therefore retire the loan before the end of the term.
pub fn amortize_with_options(
    loan: &Loan,
    options: &AmortizationOptions,
) -> LoanResult<AmortizationResult> {
    loan.validate()?;
    if options.extra_monthly_payment < Decimal::ZERO {
        return Err(LoanEngineError::InvalidBudget(format!(
            "Extra monthly payment must be non-negative, got {}",
            options.extra_monthly_payment
        )));
    }

    let rate = loan.periodic_rate();
    let payment = loan.standard_payment()?;
    let extra = options.extra_monthly_payment;
    let basis = loan.principal_basis();

    let mut rows = Vec::with_capacity(loan.term_months.min(MAX_PREALLOCATED_ROWS) as usize);
    let mut balance = basis;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for period in 1..=loan.term_months {
        let interest = round_money(balance * rate);
        let is_final = period == loan.term_months || balance + interest <= payment + extra;

        let principal_portion = if is_final {
            balance
        } else {
            // Strictly below the balance when not final
            payment + extra - interest
        };
        let payment_amount = principal_portion + interest;
        balance -= principal_portion;

        total_interest += interest;
        total_paid += payment_amount;

        rows.push(AmortizationRow {
            period,
            date: period_date(loan.start_date, period)?,
            payment_amount,
            principal_portion,
            interest_portion: interest,
            remaining_balance: balance,
        });

        if is_final {
            break;
        }
    }

    let payoff_period = rows.len() as u32;
    log::debug!(
        "amortized loan {}: payment {}, {} periods, interest {}",
        loan.id,
        payment,
        payoff_period,
        total_interest
    );

    Ok(AmortizationResult {
        loan_id: loan.id.clone(),
        monthly_payment: payment,
        principal_basis: basis,
        rows,
        total_interest,
        total_paid,
        payoff_period,
        payoff_date: period_date(loan.start_date, payoff_period)?,
    })
}

/// Calendar date of a payment period relative to the loan's start date.
pub(crate) fn period_date(start: Option<NaiveDate>, period: u32) -> LoanResult<Option<NaiveDate>> {
    match start {
        None => Ok(None),
        Some(date) => date
            .checked_add_months(Months::new(period))
            .map(Some)
            .ok_or_else(|| LoanEngineError::InvalidInput {
                field: "start_date".into(),
                reason: format!("Period {period} falls outside the supported date range"),
            }),
    }
}
