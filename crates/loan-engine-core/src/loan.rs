//! The loan entity and its invariants.
//!
//! A [`Loan`] is a plain value describing one loan's terms. Every engine
//! operation calls [`Loan::validate`] before computing and rejects invalid
//! terms instead of clamping them.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanEngineError;
use crate::time_value;
use crate::types::*;
use crate::LoanResult;

/// How upfront fees interact with the amortized balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTreatment {
    /// Fees are deducted from the proceeds at closing; the schedule
    /// amortizes the principal only.
    #[default]
    Upfront,
    /// Fees are added to the amortized balance.
    Financed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees_upfront: Option<Money>,
    #[serde(default)]
    pub fee_treatment: FeeTreatment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_payment: Option<Money>,
    /// Penalty on early payoff, percent of the prepaid balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment_penalty_percent: Option<Percent>,
    /// Date the schedule is anchored to; period `k` falls `k` months later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl Loan {
    pub fn new(
        id: impl Into<String>,
        principal: Money,
        annual_rate_percent: Percent,
        term_months: u32,
    ) -> Self {
        Loan {
            id: id.into(),
            principal,
            annual_rate_percent,
            term_months,
            fees_upfront: None,
            fee_treatment: FeeTreatment::default(),
            minimum_payment: None,
            prepayment_penalty_percent: None,
            start_date: None,
        }
    }

    pub fn with_fees(mut self, fees: Money, treatment: FeeTreatment) -> Self {
        self.fees_upfront = Some(fees);
        self.fee_treatment = treatment;
        self
    }

    pub fn with_minimum_payment(mut self, payment: Money) -> Self {
        self.minimum_payment = Some(payment);
        self
    }

    pub fn with_prepayment_penalty(mut self, percent: Percent) -> Self {
        self.prepayment_penalty_percent = Some(percent);
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Check every invariant of the loan's terms.
    pub fn validate(&self) -> LoanResult<()> {
        if self.id.trim().is_empty() {
            return Err(LoanEngineError::terms("id", "Loan id must not be empty"));
        }
        if self.principal <= Decimal::ZERO {
            return Err(LoanEngineError::terms(
                "principal",
                format!("Principal must be positive, got {}", self.principal),
            ));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(LoanEngineError::terms(
                "annual_rate_percent",
                format!(
                    "Annual rate must be non-negative, got {}",
                    self.annual_rate_percent
                ),
            ));
        }
        if self.term_months == 0 {
            return Err(LoanEngineError::terms(
                "term_months",
                "Term must be at least 1 month",
            ));
        }
        if let Some(fees) = self.fees_upfront {
            if fees < Decimal::ZERO {
                return Err(LoanEngineError::terms(
                    "fees_upfront",
                    format!("Fees must be non-negative, got {fees}"),
                ));
            }
            if self.fee_treatment == FeeTreatment::Upfront && fees >= self.principal {
                return Err(LoanEngineError::terms(
                    "fees_upfront",
                    "Upfront fees must be less than the principal",
                ));
            }
        }
        if let Some(min) = self.minimum_payment {
            if min <= Decimal::ZERO {
                return Err(LoanEngineError::terms(
                    "minimum_payment",
                    format!("Minimum payment must be positive, got {min}"),
                ));
            }
        }
        if let Some(penalty) = self.prepayment_penalty_percent {
            if penalty < Decimal::ZERO {
                return Err(LoanEngineError::terms(
                    "prepayment_penalty_percent",
                    format!("Prepayment penalty must be non-negative, got {penalty}"),
                ));
            }
        }
        Ok(())
    }

    pub fn fees(&self) -> Money {
        self.fees_upfront.unwrap_or(Decimal::ZERO)
    }

    /// Monthly periodic rate as a decimal.
    pub fn periodic_rate(&self) -> Rate {
        time_value::periodic_rate(self.annual_rate_percent)
    }

    /// Balance the schedule amortizes.
    pub fn principal_basis(&self) -> Money {
        match self.fee_treatment {
            FeeTreatment::Upfront => self.principal,
            FeeTreatment::Financed => self.principal + self.fees(),
        }
    }

    /// Amount the borrower actually receives at closing.
    pub fn net_proceeds(&self) -> Money {
        match self.fee_treatment {
            FeeTreatment::Upfront => self.principal - self.fees(),
            FeeTreatment::Financed => self.principal,
        }
    }

    /// Standard level payment over the full term, rounded up to the cent.
    pub fn standard_payment(&self) -> LoanResult<Money> {
        self.validate()?;
        let payment =
            time_value::level_payment(self.principal_basis(), self.periodic_rate(), self.term_months)?;
        Ok(round_payment(payment))
    }

    /// Payment used by payoff planning: the stated minimum, or the standard
    /// payment when none is given.
    pub fn effective_minimum_payment(&self) -> LoanResult<Money> {
        match self.minimum_payment {
            Some(min) => {
                self.validate()?;
                Ok(min)
            }
            None => self.standard_payment(),
        }
    }
}

/// Validate every loan and reject ids used more than once.
pub(crate) fn validate_all(loans: &[Loan]) -> LoanResult<()> {
    let mut seen = HashSet::with_capacity(loans.len());
    for loan in loans {
        loan.validate()?;
        if !seen.insert(loan.id.as_str()) {
            return Err(LoanEngineError::terms(
                "id",
                format!("Duplicate loan id '{}'", loan.id),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base() -> Loan {
        Loan::new("a", dec!(10000), dec!(6), 36)
    }

    #[test]
    fn test_valid_loan() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_validate_all_rejects_duplicate_ids() {
        let mut other = base();
        other.annual_rate_percent = dec!(9);
        assert!(matches!(
            validate_all(&[base(), other]),
            Err(LoanEngineError::InvalidLoanTerms { ref field, .. }) if field == "id"
        ));
        let renamed = Loan::new("b", dec!(5000), dec!(9), 24);
        assert!(validate_all(&[base(), renamed]).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let mut loan = base();
        loan.principal = Decimal::ZERO;
        assert!(matches!(
            loan.validate(),
            Err(LoanEngineError::InvalidLoanTerms { ref field, .. }) if field == "principal"
        ));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let mut loan = base();
        loan.annual_rate_percent = dec!(-0.5);
        assert!(loan.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_term() {
        let mut loan = base();
        loan.term_months = 0;
        assert!(loan.validate().is_err());
    }

    #[test]
    fn test_rejects_fees_consuming_principal() {
        let loan = base().with_fees(dec!(10000), FeeTreatment::Upfront);
        assert!(loan.validate().is_err());
        // Financed fees do not reduce the proceeds
        let financed = base().with_fees(dec!(10000), FeeTreatment::Financed);
        assert!(financed.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_minimum() {
        let loan = base().with_minimum_payment(Decimal::ZERO);
        assert!(loan.validate().is_err());
    }

    #[test]
    fn test_principal_basis_and_proceeds() {
        let upfront = base().with_fees(dec!(300), FeeTreatment::Upfront);
        assert_eq!(upfront.principal_basis(), dec!(10000));
        assert_eq!(upfront.net_proceeds(), dec!(9700));

        let financed = base().with_fees(dec!(300), FeeTreatment::Financed);
        assert_eq!(financed.principal_basis(), dec!(10300));
        assert_eq!(financed.net_proceeds(), dec!(10000));
    }

    #[test]
    fn test_effective_minimum_defaults_to_standard() {
        let loan = base();
        assert_eq!(loan.effective_minimum_payment().unwrap(), dec!(304.22));
        let stated = base().with_minimum_payment(dec!(400));
        assert_eq!(stated.effective_minimum_payment().unwrap(), dec!(400));
    }

    #[test]
    fn test_deserialize_defaults() {
        let loan: Loan = serde_json::from_str(
            r#"{"id":"car","principal":"15000","annual_rate_percent":"4.5","term_months":60}"#,
        )
        .unwrap();
        assert_eq!(loan.fee_treatment, FeeTreatment::Upfront);
        assert!(loan.fees_upfront.is_none());
        assert_eq!(loan.principal, dec!(15000));
    }
}
