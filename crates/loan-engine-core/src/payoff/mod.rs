//! Multi-debt payoff simulation under snowball or avalanche ordering.

pub mod planner;
pub mod strategy;

pub use planner::{
    plan, plan_with_options, LoanBalance, LoanPayoff, MonthSnapshot, PayoffPlan, PayoffSummary,
    PlanOptions, DEFAULT_HORIZON_MONTHS,
};
pub use strategy::Strategy;
