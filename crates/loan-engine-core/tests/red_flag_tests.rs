use loan_engine_core::red_flags::{self, RedFlagThresholds, Severity, WarningKind};
use loan_engine_core::{FeeTreatment, Loan};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

#[test]
fn test_five_percent_fees_flagged() {
    let loan = Loan::new("personal", dec!(10000), dec!(9), 48).with_fees(dec!(500), FeeTreatment::Upfront);
    let warnings = red_flags::evaluate(&loan).unwrap();
    assert!(warnings.iter().any(|w| w.kind == WarningKind::ExcessiveFees));
}

#[test]
fn test_typical_loan_without_fees_is_clean() {
    let loan = Loan::new("auto", dec!(25000), dec!(6.5), 60);
    assert!(red_flags::evaluate(&loan).unwrap().is_empty());
}

#[test]
fn test_fees_at_threshold_not_flagged() {
    // Exactly 3% does not exceed the default ratio
    let loan = Loan::new("edge", dec!(10000), dec!(6), 120).with_fees(dec!(300), FeeTreatment::Upfront);
    let warnings = red_flags::evaluate(&loan).unwrap();
    assert!(warnings.iter().all(|w| w.kind != WarningKind::ExcessiveFees));
}

#[test]
fn test_financed_fees_still_counted() {
    let loan = Loan::new("rolled", dec!(10000), dec!(6), 36).with_fees(dec!(700), FeeTreatment::Financed);
    let kinds: Vec<WarningKind> = red_flags::evaluate(&loan)
        .unwrap()
        .into_iter()
        .map(|w| w.kind)
        .collect();
    assert_eq!(kinds, vec![WarningKind::FeeLoad, WarningKind::ExcessiveFees]);
}

#[test]
fn test_custom_rate_ceiling() {
    let loan = Loan::new("store-card", dec!(1500), dec!(26.99), 24);
    assert!(red_flags::evaluate(&loan).unwrap().is_empty());

    let strict = RedFlagThresholds {
        high_rate_ceiling_percent: dec!(18),
        ..Default::default()
    };
    let warnings = red_flags::evaluate_with_thresholds(&loan, &strict).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::HighRate);
    assert_eq!(warnings[0].threshold, dec!(18));
    assert_eq!(warnings[0].severity, Severity::High);
}

#[test]
fn test_severity_escalates_with_fee_ratio() {
    let loan = Loan::new("heavy", dec!(10000), dec!(6), 36).with_fees(dec!(900), FeeTreatment::Upfront);
    let warnings = red_flags::evaluate(&loan).unwrap();
    let fees = warnings
        .iter()
        .find(|w| w.kind == WarningKind::ExcessiveFees)
        .unwrap();
    assert_eq!(fees.severity, Severity::High);
}

#[test]
fn test_prepayment_penalty_tolerance() {
    let loan = Loan::new("mortgage", dec!(200000), dec!(6), 360).with_prepayment_penalty(dec!(1));
    let warnings = red_flags::evaluate(&loan).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::PrepaymentPenalty);

    let tolerant = RedFlagThresholds {
        max_prepayment_penalty_percent: dec!(2),
        ..Default::default()
    };
    assert!(red_flags::evaluate_with_thresholds(&loan, &tolerant)
        .unwrap()
        .is_empty());
}

#[test]
fn test_evaluation_is_deterministic() {
    let loan = Loan::new("bad", dec!(3000), dec!(45), 12).with_fees(dec!(400), FeeTreatment::Upfront);
    assert_eq!(
        red_flags::evaluate(&loan).unwrap(),
        red_flags::evaluate(&loan).unwrap()
    );
}

#[test]
fn test_fee_swallowing_loan_still_evaluated() {
    let loan = Loan::new("junk", dec!(1000), dec!(6), 360).with_fees(dec!(999), FeeTreatment::Upfront);
    let warnings = red_flags::evaluate(&loan).unwrap();
    let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::FeeLoad, WarningKind::ExcessiveFees]);
    assert!(warnings.iter().all(|w| w.severity == Severity::High));
}
