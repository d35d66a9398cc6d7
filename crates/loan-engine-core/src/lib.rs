pub mod amortization;
pub mod error;
pub mod loan;
pub mod time_value;
pub mod types;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "payoff")]
pub mod payoff;

#[cfg(feature = "red_flags")]
pub mod red_flags;

pub use error::LoanEngineError;
pub use loan::{FeeTreatment, Loan};
pub use types::*;

/// Standard result type for all loan-engine operations
pub type LoanResult<T> = Result<T, LoanEngineError>;
