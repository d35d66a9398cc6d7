use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoanEngineError;
use crate::types::*;

/// Order in which extra payments are directed at active debts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Smallest remaining balance first
    Snowball,
    /// Highest annual rate first
    Avalanche,
}

/// What the ordering needs to know about an active debt.
pub(crate) struct Candidate<'a> {
    pub id: &'a str,
    pub balance: Money,
    pub annual_rate_percent: Percent,
}

impl Strategy {
    /// Priority ordering between two active debts; ties fall back to the id.
    pub(crate) fn order(self, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
        let primary = match self {
            Strategy::Snowball => a.balance.cmp(&b.balance),
            Strategy::Avalanche => b.annual_rate_percent.cmp(&a.annual_rate_percent),
        };
        primary.then_with(|| a.id.cmp(b.id))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Snowball => write!(f, "snowball"),
            Strategy::Avalanche => write!(f, "avalanche"),
        }
    }
}

impl FromStr for Strategy {
    type Err = LoanEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snowball" => Ok(Strategy::Snowball),
            "avalanche" => Ok(Strategy::Avalanche),
            other => Err(LoanEngineError::InvalidInput {
                field: "strategy".into(),
                reason: format!("Must be 'snowball' or 'avalanche', got '{other}'"),
            }),
        }
    }
}
