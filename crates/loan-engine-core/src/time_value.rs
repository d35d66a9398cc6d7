use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanEngineError;
use crate::types::{Money, Percent, Rate};
use crate::LoanResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 200;
const BRACKET_TOLERANCE: Decimal = dec!(0.000000000001);
/// Periodic rates searched by `irr`.
const IRR_LOWER_BOUND: Rate = dec!(-0.99);
const IRR_UPPER_BOUND: Rate = dec!(1000);
const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

/// Monthly periodic rate for a nominal annual rate in percent.
pub fn periodic_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / MONTHS_PER_YEAR / HUNDRED
}

/// Nominal annual percentage for a monthly periodic rate.
pub fn annualized_percent(periodic: Rate) -> Percent {
    periodic * MONTHS_PER_YEAR * HUNDRED
}

/// Level payment that retires `principal` over `nper` periods at `rate`.
///
/// Unrounded. Zero-rate loans divide the principal evenly and single-period
/// loans repay `principal * (1 + rate)`.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> LoanResult<Money> {
    if nper == 0 {
        return Err(LoanEngineError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }
    if nper == 1 {
        return Ok(principal * (Decimal::ONE + rate));
    }

    let factor = (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| LoanEngineError::InvalidInput {
            field: "nper".into(),
            reason: format!("Compounding factor overflows over {nper} periods"),
        })?;
    let growth = factor - Decimal::ONE;

    // Rates too small to register in the factor behave like zero-rate loans
    if growth.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    Ok(principal * rate * factor / growth)
}

/// Net Present Value of a series of cash flows, the first at t = 0.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> LoanResult<Money> {
    Ok(npv_with_slope(rate, cash_flows)?.0)
}

/// NPV and its derivative with respect to the rate.
///
/// Flows past the point where the discount factor overflows contribute
/// nothing and are skipped. Any other overflow is an error.
fn npv_with_slope(rate: Rate, cash_flows: &[Money]) -> LoanResult<(Money, Decimal)> {
    if rate <= dec!(-1) {
        return Err(LoanEngineError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let overflow = || LoanEngineError::InvalidInput {
        field: "rate".into(),
        reason: format!("Present value overflows at rate {rate}"),
    };
    let one_plus_r = Decimal::ONE + rate;
    let mut value = Decimal::ZERO;
    let mut slope = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = match discount.checked_mul(one_plus_r) {
                Some(d) => d,
                None => break,
            };
        }
        value = cf
            .checked_div(discount)
            .and_then(|pv| value.checked_add(pv))
            .ok_or_else(overflow)?;
        if t > 0 {
            // d/dr of cf / (1 + r)^t
            let term = match discount.checked_mul(one_plus_r) {
                Some(d) => Decimal::from(t as u64)
                    .checked_mul(*cf)
                    .and_then(|weighted| weighted.checked_div(d))
                    .ok_or_else(overflow)?,
                None => break,
            };
            slope = slope.checked_sub(term).ok_or_else(overflow)?;
        }
    }

    Ok((value, slope))
}

/// Periodic Internal Rate of Return for a conventional series (outflow
/// first, inflows after), whose NPV falls as the rate rises.
///
/// Newton-Raphson from a zero guess, kept inside a bracket that every
/// evaluation narrows; steps that leave the bracket fall back to bisection.
pub fn irr(cash_flows: &[Money]) -> LoanResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(LoanEngineError::InvalidInput {
            field: "cash_flows".into(),
            reason: "IRR requires at least 2 cash flows".into(),
        });
    }

    let mut lo = IRR_LOWER_BOUND;
    let mut hi = IRR_UPPER_BOUND;
    let mut rate = Decimal::ZERO;
    let mut last_delta = Decimal::MAX;

    for _ in 0..MAX_IRR_ITERATIONS {
        let newton = match npv_with_slope(rate, cash_flows) {
            Ok((value, slope)) => {
                if value.abs() < CONVERGENCE_THRESHOLD {
                    return Ok(rate);
                }
                last_delta = value;
                if value > Decimal::ZERO {
                    lo = rate;
                } else {
                    hi = rate;
                }
                value.checked_div(slope).and_then(|step| rate.checked_sub(step))
            }
            // Only deep negative rates overflow: the root lies above
            Err(_) => {
                lo = rate;
                None
            }
        };

        let bracketed = lo > IRR_LOWER_BOUND && hi < IRR_UPPER_BOUND;
        if bracketed && hi - lo < BRACKET_TOLERANCE {
            return Ok(rate);
        }

        rate = match newton {
            Some(next) if next > lo && next < hi => next,
            _ => (lo + hi) / dec!(2),
        };
    }

    Err(LoanEngineError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta,
    })
}
