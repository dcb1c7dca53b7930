//! SSA Benefits - Social Security retirement benefit and filing strategy engine
//!
//! This library provides:
//! - Exact integer-cent money and month-granularity date arithmetic
//! - Wage indexing, AIME and the bend-point PIA formula with COLA chaining
//! - Personal, spousal and survivor benefit rules by filing date
//! - Net present value of a couple's filing strategy
//! - Exhaustive filing-age optimization (sequential, memoized or parallel)
//! - Per-month alternatives reports for a single recipient

pub mod error;
pub mod money;
pub mod month_time;
pub mod birthdate;
pub mod constants;
pub mod earnings;
pub mod recipient;
pub mod strategy;

// Re-export commonly used types
pub use error::{BenefitError, Result};
pub use money::Money;
pub use month_time::{MonthDate, MonthDuration, MonthDurationRange};
pub use birthdate::Birthdate;
pub use earnings::{EarningRecord, load_earnings_csv};
pub use recipient::{Recipient, PrimaryInsuranceAmount};
pub use strategy::{
    CalculationConfig, Couple, OptimalStrategy, OptimizerMethod, StrategyOptimizer,
};
