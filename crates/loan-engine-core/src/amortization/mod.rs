//! Single-loan amortization: level payment, schedule, totals and effective APR.

pub mod apr;
pub mod schedule;

pub use apr::effective_apr;
pub use schedule::{
    amortize, amortize_with_options, AmortizationOptions, AmortizationResult, AmortizationRow,
};
