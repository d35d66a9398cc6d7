use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanEngineError;
use crate::types::*;
use crate::LoanResult;

/// Default maximum gap between effective APR and the nominal rate, in points.
pub const DEFAULT_APR_GAP_PERCENT: Percent = dec!(1.0);

/// Default nominal rate ceiling, in percent. 36% is the common statutory cap
/// for consumer installment lending.
pub const DEFAULT_HIGH_RATE_CEILING_PERCENT: Percent = dec!(36.0);

/// Default maximum ratio of upfront fees to principal.
pub const DEFAULT_MAX_FEE_RATIO: Rate = dec!(0.03);

/// Default maximum prepayment penalty, in percent of the prepaid balance.
pub const DEFAULT_MAX_PREPAYMENT_PENALTY_PERCENT: Percent = Decimal::ZERO;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedFlagThresholds {
    pub apr_gap_percent: Percent,
    pub high_rate_ceiling_percent: Percent,
    pub max_fee_ratio: Rate,
    pub max_prepayment_penalty_percent: Percent,
}

impl Default for RedFlagThresholds {
    fn default() -> Self {
        RedFlagThresholds {
            apr_gap_percent: DEFAULT_APR_GAP_PERCENT,
            high_rate_ceiling_percent: DEFAULT_HIGH_RATE_CEILING_PERCENT,
            max_fee_ratio: DEFAULT_MAX_FEE_RATIO,
            max_prepayment_penalty_percent: DEFAULT_MAX_PREPAYMENT_PENALTY_PERCENT,
        }
    }
}

impl RedFlagThresholds {
    pub fn validate(&self) -> LoanResult<()> {
        let checks = [
            ("apr_gap_percent", self.apr_gap_percent),
            ("high_rate_ceiling_percent", self.high_rate_ceiling_percent),
            ("max_fee_ratio", self.max_fee_ratio),
            (
                "max_prepayment_penalty_percent",
                self.max_prepayment_penalty_percent,
            ),
        ];
        for (field, value) in checks {
            if value < Decimal::ZERO {
                return Err(LoanEngineError::InvalidInput {
                    field: field.into(),
                    reason: format!("Threshold must be non-negative, got {value}"),
                });
            }
        }
        Ok(())
    }
}
