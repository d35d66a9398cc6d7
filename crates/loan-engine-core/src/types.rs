use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.005 = 0.5% per period).
pub type Rate = Decimal;

/// Rates expressed as percentage points (6 = 6% per year).
pub type Percent = Decimal;

/// Decimal places kept for monetary amounts.
pub const MONEY_DP: u32 = 2;

/// Decimal places kept for reported rates and percentages.
pub const PERCENT_DP: u32 = 4;

/// Round a monetary amount to cents, midpoint away from zero.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a scheduled payment up to the next cent, so every period retires
/// some principal however small the loan.
pub fn round_payment(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::AwayFromZero)
}

/// Round a percentage for reporting.
pub fn round_percent(value: Percent) -> Percent {
    value.round_dp_with_strategy(PERCENT_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope used by the CLI and bindings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
    pub rounding: String,
}

/// Helper to wrap computation results with metadata.
///
/// The envelope carries no timing data, so identical inputs always
/// serialise to identical output.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
            rounding: "cents_midpoint_away_from_zero".to_string(),
        },
    }
}
