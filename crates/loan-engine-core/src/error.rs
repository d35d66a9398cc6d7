use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanEngineError {
    #[error("Invalid loan terms: {field} — {reason}")]
    InvalidLoanTerms { field: String, reason: String },

    #[error("Insufficient loans: at least {required} required, {supplied} supplied")]
    InsufficientLoans { required: usize, supplied: usize },

    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Payoff unreachable: {remaining_balance} still outstanding after {horizon_months} months")]
    PayoffUnreachable {
        horizon_months: u32,
        remaining_balance: Decimal,
    },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanEngineError {
    pub(crate) fn terms(field: &str, reason: impl Into<String>) -> Self {
        LoanEngineError::InvalidLoanTerms {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoanEngineError {
    fn from(e: serde_json::Error) -> Self {
        LoanEngineError::SerializationError(e.to_string())
    }
}
