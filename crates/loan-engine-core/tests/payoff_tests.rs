use loan_engine_core::amortization;
use loan_engine_core::payoff::{self, PlanOptions, Strategy};
use loan_engine_core::{Loan, LoanEngineError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn card_and_student() -> Vec<Loan> {
    vec![
        Loan::new("card", dec!(5000), dec!(20), 24),
        Loan::new("student", dec!(2000), dec!(5), 24),
    ]
}

fn balance_of<'a>(snapshot: &'a payoff::MonthSnapshot, id: &str) -> &'a payoff::LoanBalance {
    snapshot.balances.iter().find(|b| b.loan_id == id).unwrap()
}

// ===========================================================================
// Strategy ordering
// ===========================================================================

#[test]
fn test_avalanche_targets_highest_rate_until_retired() {
    let plan = payoff::plan(&card_and_student(), dec!(100), Strategy::Avalanche).unwrap();

    assert_eq!(balance_of(&plan.months[0], "card").extra_applied, dec!(100));
    assert_eq!(balance_of(&plan.months[0], "student").extra_applied, Decimal::ZERO);

    for month in &plan.months {
        let card = balance_of(month, "card");
        let student = balance_of(month, "student");
        if student.extra_applied > Decimal::ZERO {
            assert_eq!(
                card.remaining_balance,
                Decimal::ZERO,
                "student received extra in month {} while card was open",
                month.month
            );
        }
    }

    assert_eq!(plan.payoffs[0].loan_id, "card");
}

#[test]
fn test_snowball_targets_smallest_balance() {
    let plan = payoff::plan(&card_and_student(), dec!(100), Strategy::Snowball).unwrap();
    assert_eq!(balance_of(&plan.months[0], "student").extra_applied, dec!(100));
    assert_eq!(balance_of(&plan.months[0], "card").extra_applied, Decimal::ZERO);
    assert_eq!(plan.payoffs[0].loan_id, "student");
}

#[test]
fn test_avalanche_cheaper_than_snowball_here() {
    let avalanche = payoff::plan(&card_and_student(), dec!(100), Strategy::Avalanche).unwrap();
    let snowball = payoff::plan(&card_and_student(), dec!(100), Strategy::Snowball).unwrap();
    assert!(avalanche.summary.total_interest_paid < snowball.summary.total_interest_paid);
}

#[test]
fn test_leftover_extra_cascades_in_same_month() {
    // The tiny loan is cleared by the first 100 of extra; the rest flows on
    let loans = vec![
        Loan::new("tiny", dec!(30), dec!(10), 12),
        Loan::new("big", dec!(3000), dec!(10), 36),
    ];
    let plan = payoff::plan(&loans, dec!(100), Strategy::Snowball).unwrap();
    let first = &plan.months[0];
    let tiny = balance_of(first, "tiny");
    let big = balance_of(first, "big");
    assert_eq!(tiny.remaining_balance, Decimal::ZERO);
    assert_eq!(tiny.extra_applied + big.extra_applied, dec!(100));
    assert!(big.extra_applied > Decimal::ZERO);
}

// ===========================================================================
// Baseline and totals
// ===========================================================================

#[test]
fn test_baseline_reproduces_amortization() {
    let loans = card_and_student();
    let plan = payoff::plan(&loans, dec!(100), Strategy::Avalanche).unwrap();
    let expected: Decimal = loans
        .iter()
        .map(|l| amortization::amortize(l).unwrap().total_interest)
        .sum();
    assert_eq!(plan.summary.baseline_total_interest, Some(expected));
    assert_eq!(plan.summary.baseline_months_to_payoff, Some(24));
    assert_eq!(
        plan.summary.interest_saved_vs_minimum_only,
        Some(expected - plan.summary.total_interest_paid)
    );
    assert!(plan.summary.interest_saved_vs_minimum_only.unwrap() > Decimal::ZERO);
}

#[test]
fn test_strategies_retire_same_principal() {
    let loans = card_and_student();
    for strategy in [Strategy::Snowball, Strategy::Avalanche] {
        let plan = payoff::plan(&loans, dec!(150), strategy).unwrap();
        let retired: Decimal = plan.payoffs.iter().map(|p| p.principal_paid).sum();
        assert_eq!(retired, dec!(7000));
        let last = plan.months.last().unwrap();
        assert!(last
            .balances
            .iter()
            .all(|b| b.remaining_balance == Decimal::ZERO));
    }
}

#[test]
fn test_interest_to_date_is_monotonic() {
    let plan = payoff::plan(&card_and_student(), dec!(50), Strategy::Snowball).unwrap();
    let mut previous = Decimal::ZERO;
    for month in &plan.months {
        assert!(month.total_interest_paid_to_date >= previous);
        previous = month.total_interest_paid_to_date;
    }
    assert_eq!(previous, plan.summary.total_interest_paid);
}

#[test]
fn test_retired_balances_stay_locked() {
    let plan = payoff::plan(&card_and_student(), dec!(300), Strategy::Snowball).unwrap();
    let student_payoff = plan
        .payoffs
        .iter()
        .find(|p| p.loan_id == "student")
        .unwrap()
        .payoff_month;
    for month in plan.months.iter().filter(|m| m.month > student_payoff) {
        let student = balance_of(month, "student");
        assert_eq!(student.remaining_balance, Decimal::ZERO);
        assert_eq!(student.payment, Decimal::ZERO);
        assert_eq!(student.extra_applied, Decimal::ZERO);
    }
}

#[test]
fn test_explicit_minimum_payment_used() {
    let loans = vec![Loan::new("card", dec!(1000), dec!(24), 36).with_minimum_payment(dec!(100))];
    let plan = payoff::plan(&loans, Decimal::ZERO, Strategy::Avalanche).unwrap();
    assert_eq!(plan.months[0].balances[0].payment, dec!(100));
    assert!(plan.summary.months_to_payoff < 36);
}

#[test]
fn test_single_loan_plan() {
    let loans = vec![Loan::new("only", dec!(1200), Decimal::ZERO, 12)];
    let plan = payoff::plan(&loans, dec!(100), Strategy::Snowball).unwrap();
    assert_eq!(plan.summary.months_to_payoff, 6);
    assert_eq!(plan.summary.total_interest_paid, Decimal::ZERO);
}

// ===========================================================================
// Failure modes
// ===========================================================================

#[test]
fn test_unreachable_within_horizon() {
    let loans = vec![Loan::new("trap", dec!(5000), dec!(30), 60).with_minimum_payment(dec!(100))];
    let options = PlanOptions {
        horizon_months: 240,
        ..Default::default()
    };
    let err = payoff::plan_with_options(&loans, dec!(10), Strategy::Avalanche, &options).unwrap_err();
    match err {
        LoanEngineError::PayoffUnreachable {
            horizon_months,
            remaining_balance,
        } => {
            assert_eq!(horizon_months, 240);
            assert!(remaining_balance > dec!(5000));
        }
        other => panic!("expected PayoffUnreachable, got {other:?}"),
    }
}

#[test]
fn test_invalid_loan_in_set() {
    let mut loans = card_and_student();
    loans[1].term_months = 0;
    assert!(matches!(
        payoff::plan(&loans, dec!(100), Strategy::Snowball),
        Err(LoanEngineError::InvalidLoanTerms { .. })
    ));
}
