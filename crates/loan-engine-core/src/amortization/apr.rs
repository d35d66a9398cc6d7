use rust_decimal::Decimal;

use crate::amortization::schedule::amortize;
use crate::loan::Loan;
use crate::time_value;
use crate::types::*;
use crate::LoanResult;

/// Effective APR in percent, including upfront fees.
///
/// The annualized periodic rate at which the scheduled payments discount to
/// the amount the borrower actually receives. Loans without fees report the
/// nominal rate unchanged.
pub fn effective_apr(loan: &Loan) -> LoanResult<Percent> {
    loan.validate()?;

    if loan.fees().is_zero() {
        return Ok(loan.annual_rate_percent);
    }

    let schedule = amortize(loan)?;
    let mut flows = Vec::with_capacity(schedule.rows.len() + 1);
    flows.push(-loan.net_proceeds());
    flows.extend(schedule.rows.iter().map(|r| r.payment_amount));

    let periodic = time_value::irr(&flows)?;
    let apr = round_percent(time_value::annualized_percent(periodic));
    log::debug!(
        "effective APR for loan {}: {}% (nominal {}%)",
        loan.id,
        apr,
        loan.annual_rate_percent
    );
    Ok(apr.max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::FeeTreatment;
    use rust_decimal_macros::dec;

    #[test]
    fn test_no_fees_equals_nominal() {
        let loan = Loan::new("a", dec!(10000), dec!(6), 36);
        assert_eq!(effective_apr(&loan).unwrap(), dec!(6));
    }

    #[test]
    fn test_upfront_fees_raise_apr() {
        let loan = Loan::new("a", dec!(10000), dec!(6), 36).with_fees(dec!(500), FeeTreatment::Upfront);
        let apr = effective_apr(&loan).unwrap();
        // 5% of principal spread over three years adds roughly 3.4 points
        assert!(apr > dec!(9) && apr < dec!(10), "apr = {apr}");
    }

    #[test]
    fn test_financed_fees_raise_apr() {
        let loan = Loan::new("a", dec!(10000), dec!(6), 36).with_fees(dec!(500), FeeTreatment::Financed);
        let apr = effective_apr(&loan).unwrap();
        assert!(apr > dec!(9) && apr < dec!(10), "apr = {apr}");
    }

    #[test]
    fn test_zero_rate_with_fees() {
        let loan = Loan::new("a", dec!(1200), Decimal::ZERO, 12).with_fees(dec!(12), FeeTreatment::Upfront);
        let apr = effective_apr(&loan).unwrap();
        assert!(apr > Decimal::ZERO && apr < dec!(2.5), "apr = {apr}");
    }
}
