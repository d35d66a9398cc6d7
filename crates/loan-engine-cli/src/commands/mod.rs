pub mod amortization;
pub mod comparison;
pub mod payoff;
pub mod red_flags;

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use loan_engine_core::red_flags::RedFlagThresholds;
use loan_engine_core::{FeeTreatment, Loan};

use crate::input;

/// Loan terms given as individual flags
#[derive(Args)]
pub struct LoanFlags {
    /// Loan identifier
    #[arg(long, default_value = "loan")]
    pub id: String,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate in percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Upfront fees
    #[arg(long)]
    pub fees: Option<Decimal>,

    /// Roll the fees into the amortized balance instead of deducting them at closing
    #[arg(long)]
    pub financed_fees: bool,

    /// Prepayment penalty in percent of the prepaid balance
    #[arg(long)]
    pub prepayment_penalty: Option<Decimal>,

    /// Origination date (YYYY-MM-DD) used to date each payment
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

impl LoanFlags {
    pub fn into_loan(self) -> Result<Loan, Box<dyn std::error::Error>> {
        let principal = self
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let rate = self.rate.ok_or("--rate is required (or provide --input)")?;
        let term = self.term.ok_or("--term is required (or provide --input)")?;

        let mut loan = Loan::new(self.id, principal, rate, term);
        if let Some(fees) = self.fees {
            let treatment = if self.financed_fees {
                FeeTreatment::Financed
            } else {
                FeeTreatment::Upfront
            };
            loan = loan.with_fees(fees, treatment);
        }
        if let Some(penalty) = self.prepayment_penalty {
            loan = loan.with_prepayment_penalty(penalty);
        }
        if let Some(date) = self.start_date {
            loan = loan.with_start_date(date);
        }
        Ok(loan)
    }
}

/// Thresholds from `--thresholds <file>`, or the defaults.
pub fn load_thresholds(path: Option<&str>) -> Result<RedFlagThresholds, Box<dyn std::error::Error>> {
    match path {
        Some(p) => input::file::read_input(p),
        None => Ok(RedFlagThresholds::default()),
    }
}
