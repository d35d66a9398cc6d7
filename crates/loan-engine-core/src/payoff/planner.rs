use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanEngineError;
use crate::loan::{validate_all, Loan};
use crate::payoff::strategy::{Candidate, Strategy};
use crate::types::*;
use crate::LoanResult;

/// Months simulated before a plan is declared unreachable.
pub const DEFAULT_HORIZON_MONTHS: u32 = 1200;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanOptions {
    pub horizon_months: u32,
    /// Add the minimum payment of every retired loan to the extra budget
    /// from the following month.
    pub rollover_freed_minimums: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        PlanOptions {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            rollover_freed_minimums: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanBalance {
    pub loan_id: String,
    /// Scheduled (minimum) payment made this month.
    pub payment: Money,
    /// Share of the extra budget applied this month.
    pub extra_applied: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSnapshot {
    pub month: u32,
    /// One entry per loan, in input order.
    pub balances: Vec<LoanBalance>,
    pub total_interest_paid_to_date: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPayoff {
    pub loan_id: String,
    pub payoff_month: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffSummary {
    pub strategy: Strategy,
    pub monthly_extra: Money,
    pub months_to_payoff: u32,
    pub total_interest_paid: Money,
    /// Minimum-only baseline; `None` when minimums alone never retire the debts.
    pub baseline_months_to_payoff: Option<u32>,
    pub baseline_total_interest: Option<Money>,
    pub interest_saved_vs_minimum_only: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffPlan {
    pub months: Vec<MonthSnapshot>,
    /// Payoff timeline, earliest first.
    pub payoffs: Vec<LoanPayoff>,
    pub summary: PayoffSummary,
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

struct Debt<'a> {
    loan: &'a Loan,
    rate: Rate,
    minimum: Money,
    /// Month the standard schedule clears any rounding residue; only loans
    /// paying their standard payment have one.
    final_month: Option<u32>,
    balance: Money,
    interest_paid: Money,
    principal_paid: Money,
    payoff_month: Option<u32>,
}

impl<'a> Debt<'a> {
    fn new(loan: &'a Loan) -> LoanResult<Self> {
        Ok(Debt {
            loan,
            rate: loan.periodic_rate(),
            minimum: loan.effective_minimum_payment()?,
            final_month: match loan.minimum_payment {
                None => Some(loan.term_months),
                Some(_) => None,
            },
            balance: loan.principal_basis(),
            interest_paid: Decimal::ZERO,
            principal_paid: Decimal::ZERO,
            payoff_month: None,
        })
    }

    fn is_active(&self) -> bool {
        self.payoff_month.is_none()
    }

    fn candidate(&self) -> Candidate<'_> {
        Candidate {
            id: &self.loan.id,
            balance: self.balance,
            annual_rate_percent: self.loan.annual_rate_percent,
        }
    }
}

struct Outcome<'a> {
    months: Vec<MonthSnapshot>,
    debts: Vec<Debt<'a>>,
    total_interest: Money,
}

fn unreachable(horizon_months: u32, debts: &[Debt<'_>]) -> LoanEngineError {
    let remaining_balance = debts
        .iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(d.balance));
    LoanEngineError::PayoffUnreachable {
        horizon_months,
        remaining_balance,
    }
}

/// Run the month-by-month state machine until every debt is retired.
fn simulate<'a>(
    loans: &'a [Loan],
    monthly_extra: Money,
    strategy: Strategy,
    options: &PlanOptions,
) -> LoanResult<Outcome<'a>> {
    let mut debts = loans.iter().map(Debt::new).collect::<LoanResult<Vec<_>>>()?;
    let mut months = Vec::new();
    let mut total_interest = Decimal::ZERO;
    let mut rollover_pool = Decimal::ZERO;

    for month in 1..=options.horizon_months {
        let mut payments = vec![Decimal::ZERO; debts.len()];
        let mut extras = vec![Decimal::ZERO; debts.len()];

        // 1. Minimum payments against interest accrued on the current balance
        let mut overflowed = false;
        for (i, debt) in debts.iter_mut().enumerate().filter(|(_, d)| d.is_active()) {
            let due = debt
                .balance
                .checked_mul(debt.rate)
                .map(round_money)
                .and_then(|interest| debt.balance.checked_add(interest).map(|due| (interest, due)));
            let Some((interest, due)) = due else {
                overflowed = true;
                break;
            };
            let payment = if debt.final_month == Some(month) {
                due
            } else {
                debt.minimum.min(due)
            };
            debt.balance = due - payment;
            debt.interest_paid += interest;
            debt.principal_paid += payment - interest;
            total_interest += interest;
            payments[i] = payment;
        }
        if overflowed {
            return Err(unreachable(options.horizon_months, &debts));
        }

        // 2. Priority order of debts still carrying a balance
        let mut order: Vec<usize> = (0..debts.len())
            .filter(|&i| debts[i].is_active() && debts[i].balance > Decimal::ZERO)
            .collect();
        order.sort_by(|&a, &b| strategy.order(&debts[a].candidate(), &debts[b].candidate()));

        // 3. Extra budget to the first debt, cascading any remainder
        let mut budget = monthly_extra + rollover_pool;
        for i in order {
            if budget <= Decimal::ZERO {
                break;
            }
            let debt = &mut debts[i];
            let applied = budget.min(debt.balance);
            debt.balance -= applied;
            debt.principal_paid += applied;
            extras[i] = applied;
            budget -= applied;
        }

        // 4. Retire paid-off debts
        for debt in debts.iter_mut().filter(|d| d.is_active()) {
            if debt.balance <= Decimal::ZERO {
                debt.balance = Decimal::ZERO;
                debt.payoff_month = Some(month);
                if options.rollover_freed_minimums {
                    rollover_pool += debt.minimum;
                }
                log::debug!("loan {} retired in month {month}", debt.loan.id);
            }
        }

        months.push(MonthSnapshot {
            month,
            balances: debts
                .iter()
                .enumerate()
                .map(|(i, d)| LoanBalance {
                    loan_id: d.loan.id.clone(),
                    payment: payments[i],
                    extra_applied: extras[i],
                    remaining_balance: d.balance,
                })
                .collect(),
            total_interest_paid_to_date: total_interest,
        });

        if debts.iter().all(|d| !d.is_active()) {
            return Ok(Outcome {
                months,
                debts,
                total_interest,
            });
        }
    }

    Err(unreachable(options.horizon_months, &debts))
}

fn validate_inputs(loans: &[Loan], monthly_extra: Money, options: &PlanOptions) -> LoanResult<()> {
    if loans.is_empty() {
        return Err(LoanEngineError::InsufficientLoans {
            required: 1,
            supplied: 0,
        });
    }
    if monthly_extra < Decimal::ZERO {
        return Err(LoanEngineError::InvalidBudget(format!(
            "Monthly extra payment must be non-negative, got {monthly_extra}"
        )));
    }
    if options.horizon_months == 0 {
        return Err(LoanEngineError::InvalidInput {
            field: "horizon_months".into(),
            reason: "Horizon must be at least 1 month".into(),
        });
    }

    validate_all(loans)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate paying off `loans` with a shared monthly extra budget.
pub fn plan(loans: &[Loan], monthly_extra: Money, strategy: Strategy) -> LoanResult<PayoffPlan> {
    plan_with_options(loans, monthly_extra, strategy, &PlanOptions::default())
}

/// Simulate a payoff plan and compare it with the minimum-only baseline.
pub fn plan_with_options(
    loans: &[Loan],
    monthly_extra: Money,
    strategy: Strategy,
    options: &PlanOptions,
) -> LoanResult<PayoffPlan> {
    validate_inputs(loans, monthly_extra, options)?;

    let outcome = simulate(loans, monthly_extra, strategy, options)?;

    let baseline_options = PlanOptions {
        horizon_months: options.horizon_months,
        rollover_freed_minimums: false,
    };
    let baseline = match simulate(loans, Decimal::ZERO, strategy, &baseline_options) {
        Ok(b) => Some((b.months.len() as u32, b.total_interest)),
        Err(LoanEngineError::PayoffUnreachable { .. }) => {
            log::warn!(
                "minimum payments alone do not retire the debts within {} months",
                options.horizon_months
            );
            None
        }
        Err(e) => return Err(e),
    };

    let mut payoffs: Vec<LoanPayoff> = outcome
        .debts
        .iter()
        .map(|d| LoanPayoff {
            loan_id: d.loan.id.clone(),
            payoff_month: d.payoff_month.unwrap_or(0),
            interest_paid: d.interest_paid,
            principal_paid: d.principal_paid,
        })
        .collect();
    // Stable: loans retired in the same month keep input order
    payoffs.sort_by_key(|p| p.payoff_month);

    let months_to_payoff = outcome.months.len() as u32;
    log::debug!(
        "{strategy} plan for {} loans: {months_to_payoff} months, interest {}",
        loans.len(),
        outcome.total_interest
    );

    Ok(PayoffPlan {
        summary: PayoffSummary {
            strategy,
            monthly_extra,
            months_to_payoff,
            total_interest_paid: outcome.total_interest,
            baseline_months_to_payoff: baseline.map(|(m, _)| m),
            baseline_total_interest: baseline.map(|(_, i)| i),
            interest_saved_vs_minimum_only: baseline.map(|(_, i)| i - outcome.total_interest),
        },
        months: outcome.months,
        payoffs,
    })
}
