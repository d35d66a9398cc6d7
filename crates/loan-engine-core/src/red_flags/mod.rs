//! Heuristic red-flag detection for loan terms.
//!
//! Advisory only: warnings annotate a loan, they never block a calculation.
//! Thresholds live in [`RedFlagThresholds`] and can be overridden per call.

pub mod detector;
pub mod thresholds;

pub use detector::{evaluate, evaluate_with_thresholds, Severity, Warning, WarningKind};
pub use thresholds::RedFlagThresholds;
