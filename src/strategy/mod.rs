//! Filing strategy calculation for one or two recipients
//!
//! A strategy is a filing age per recipient. This module:
//! - **Composes** the personal, spousal and survivor benefit periods a
//!   strategy produces
//! - **Values** those periods as an NPV as of an evaluation date
//! - **Searches** every filing-age pair for the highest NPV
//! - **Reports** how every single-recipient filing month compares with the
//!   optimum
//!
//! # Example
//!
//! ```rust,ignore
//! use ssa_benefits::strategy::{CalculationConfig, Couple, OptimizerMethod, StrategyOptimizer};
//!
//! let couple = Couple::new([&alex, &sam], [alex_final, sam_final]);
//! let config = CalculationConfig::discounted(MonthDate::from_years_months(2023, 0), 0.025)
//!     .with_method(OptimizerMethod::Parallel);
//! let best = StrategyOptimizer::new(couple, config).optimize()?;
//! println!("{} / {}: {}", best.filing_ages[0], best.filing_ages[1], best.npv);
//! ```

mod alternatives;
mod discount;
mod npv;
mod optimizer;
mod periods;
mod personal_benefits;

pub use periods::{
    compose_periods, personal_benefit_periods, push_personal_periods, strategy_sum_periods,
    sum_benefit_periods, BenefitLookup, BenefitPeriod, BenefitType, Couple, CoupleRoles,
    DirectBenefits, PersonalAmounts,
};

pub use discount::{
    monthly_discount_rate, DirectDiscount, DiscountCache, DiscountFactors, PVCalculator,
};

pub use npv::{
    periods_npv_cents, strategy_sum_cents, strategy_sum_cents_single, strategy_sum_total_periods,
};

pub use personal_benefits::{strategy_age_range, RecipientPersonalBenefits};

pub use optimizer::{
    earliest_filing, optimal_strategy, OptimalStrategy, OptimizerMethod, StrategyOptimizer,
};

pub use alternatives::{
    calculate_alternative_strategies, format_filing_age, AlternativeResult, PlaceholderReason,
    StrategyColor, YearGroup,
};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_YEAR;
use crate::error::Result;
use crate::month_time::MonthDate;
use crate::recipient::Recipient;

/// Settings shared by every strategy calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    /// Evaluation date; payments before the following month are excluded
    pub current_date: MonthDate,

    /// Annual discount rate, e.g. 0.025
    pub annual_discount_rate: f64,

    pub method: OptimizerMethod,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            current_date: MonthDate::from_years_months(MAX_YEAR, 0),
            annual_discount_rate: 0.0,
            method: OptimizerMethod::default(),
        }
    }
}

impl CalculationConfig {
    /// Plain lifetime totals as of `current_date`
    pub fn undiscounted(current_date: MonthDate) -> Self {
        Self {
            current_date,
            ..Default::default()
        }
    }

    pub fn discounted(current_date: MonthDate, annual_discount_rate: f64) -> Self {
        Self {
            current_date,
            annual_discount_rate,
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: OptimizerMethod) -> Self {
        self.method = method;
        self
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Stamp the evaluation year on a recipient so COLAs run through it
    pub fn apply_current_year(&self, recipient: &mut Recipient) {
        recipient.set_current_year(self.current_date.year());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birthdate::Birthdate;
    use crate::money::Money;

    #[test]
    fn test_config_defaults() {
        let config = CalculationConfig::default();
        assert_eq!(config.current_date, MonthDate::from_years_months(MAX_YEAR, 0));
        assert_eq!(config.annual_discount_rate, 0.0);
        assert_eq!(config.method, OptimizerMethod::Memoized);

        let config = CalculationConfig::discounted(MonthDate::from_years_months(2024, 3), 0.03)
            .with_method(OptimizerMethod::BruteForce);
        assert_eq!(config.annual_discount_rate, 0.03);
        assert_eq!(config.method, OptimizerMethod::BruteForce);
    }

    #[test]
    fn test_config_json() {
        let config: CalculationConfig =
            serde_json::from_str(r#"{"current_date": "2024-07", "method": "Parallel"}"#).unwrap();
        assert_eq!(config.current_date, MonthDate::from_years_months(2024, 6));
        assert_eq!(config.annual_discount_rate, 0.0);
        assert_eq!(config.method, OptimizerMethod::Parallel);

        let json = serde_json::to_string(&config).unwrap();
        let back: CalculationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_config_from_missing_file() {
        assert!(CalculationConfig::from_json_file("/nonexistent/ssa-config.json").is_err());
    }

    #[test]
    fn test_apply_current_year() {
        let mut r = Recipient::with_pia(Birthdate::from_ymd(1960, 0, 5).unwrap(), Money::from_cents(1000_00));
        CalculationConfig::undiscounted(MonthDate::from_years_months(2030, 4)).apply_current_year(&mut r);
        assert_eq!(r.current_year(), 2030);
    }
}
