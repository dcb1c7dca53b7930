//! Per-month filing alternatives for one recipient
//!
//! Every filing month from the earliest permissible month through 70 is
//! valued on its own and compared with the optimal strategy's NPV. Months
//! already in the past and months before eligibility in the first year are
//! kept as placeholders so each year row lines up by calendar month.

use serde::Serialize;

use super::npv::strategy_sum_cents_single;
use crate::constants::MAX_FILING_AGE_YEARS;
use crate::error::Result;
use crate::money::Money;
use crate::month_time::{MonthDate, MonthDuration, MONTHS_IN_YEAR};
use crate::recipient::Recipient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaceholderReason {
    AlreadyPassed,
    NotYetEligible,
}

impl PlaceholderReason {
    pub fn label(&self) -> &'static str {
        match self {
            PlaceholderReason::AlreadyPassed => "Already passed",
            PlaceholderReason::NotYetEligible => "Not yet eligible",
        }
    }
}

/// One filing month in the alternatives table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeResult {
    pub filing_age: MonthDuration,
    pub npv: Money,

    /// NPV as a percentage of the optimal NPV
    pub percent_of_optimal: f64,

    pub is_optimal: bool,

    /// Set for months that cannot be chosen
    pub placeholder: Option<PlaceholderReason>,
}

impl AlternativeResult {
    fn placeholder(filing_age: MonthDuration, reason: PlaceholderReason) -> Self {
        Self {
            filing_age,
            npv: Money::zero(),
            percent_of_optimal: 0.0,
            is_optimal: false,
            placeholder: Some(reason),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    pub fn color(&self) -> StrategyColor {
        StrategyColor::for_result(self.percent_of_optimal, self.is_optimal)
    }
}

/// Alternatives for filing ages within one year of age
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearGroup {
    pub year: i32,
    pub results: Vec<AlternativeResult>,
}

/// Closeness-to-optimal bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyColor {
    Optimal,
    /// 99% or better
    VeryClose,
    /// 95% or better
    Close,
    /// 90% or better
    Fair,
    /// 85% or better
    Distant,
    /// 80% or better
    Far,
    Poor,
}

impl StrategyColor {
    pub fn for_result(percent_of_optimal: f64, is_optimal: bool) -> Self {
        if is_optimal {
            return StrategyColor::Optimal;
        }
        match percent_of_optimal {
            p if p >= 99.0 => StrategyColor::VeryClose,
            p if p >= 95.0 => StrategyColor::Close,
            p if p >= 90.0 => StrategyColor::Fair,
            p if p >= 85.0 => StrategyColor::Distant,
            p if p >= 80.0 => StrategyColor::Far,
            _ => StrategyColor::Poor,
        }
    }

    pub fn rgb(&self) -> &'static str {
        match self {
            StrategyColor::Optimal => "rgb(0, 100, 0)",
            StrategyColor::VeryClose => "rgb(34, 139, 34)",
            StrategyColor::Close => "rgb(100, 170, 50)",
            StrategyColor::Fair => "rgb(190, 210, 50)",
            StrategyColor::Distant => "rgb(255, 215, 0)",
            StrategyColor::Far => "rgb(255, 165, 0)",
            StrategyColor::Poor => "rgb(220, 20, 60)",
        }
    }
}

/// Compact age label: "62y" or "62y3m"
pub fn format_filing_age(filing_age: MonthDuration) -> String {
    let years = filing_age.years();
    let months = filing_age.mod_months();
    if months == 0 {
        format!("{}y", years)
    } else {
        format!("{}y{}m", years, months)
    }
}

/// Value every filing month for `recipient`, grouped by year of age
pub fn calculate_alternative_strategies(
    recipient: &Recipient,
    death_age: MonthDuration,
    annual_rate: f64,
    optimal_npv: Money,
    optimal_filing_age: MonthDuration,
    current: MonthDate,
) -> Result<Vec<YearGroup>> {
    let final_date = recipient.birthdate().date_at_lay_age(death_age);
    let current_age = recipient.birthdate().age_at_ssa_date(current);
    let earliest = recipient.birthdate().earliest_filing_month().as_months();
    let latest = MAX_FILING_AGE_YEARS * MONTHS_IN_YEAR;

    let mut groups: Vec<YearGroup> = Vec::new();
    for months in earliest..=latest {
        let filing_age = MonthDuration::new(months);
        if filing_age > death_age {
            continue;
        }

        let result = if filing_age < current_age {
            AlternativeResult::placeholder(filing_age, PlaceholderReason::AlreadyPassed)
        } else {
            let cents = strategy_sum_cents_single(recipient, final_date, current, annual_rate, filing_age)?;
            let percent_of_optimal = if optimal_npv.cents() > 0 {
                cents as f64 / optimal_npv.cents() as f64 * 100.0
            } else {
                0.0
            };
            AlternativeResult {
                filing_age,
                npv: Money::from_cents(cents),
                percent_of_optimal,
                is_optimal: filing_age == optimal_filing_age,
                placeholder: None,
            }
        };

        // Ages only increase, so a new year always starts a new group
        let year = filing_age.years();
        match groups.last_mut() {
            Some(group) if group.year == year => group.results.push(result),
            _ => groups.push(YearGroup {
                year,
                results: vec![result],
            }),
        }
    }

    if let Some(first) = groups.first_mut() {
        let first_month = first.results.first().map(|r| r.filing_age.mod_months()).unwrap_or(0);
        if first_month > 0 {
            let year = first.year;
            let mut padded: Vec<AlternativeResult> = (0..first_month)
                .map(|m| {
                    AlternativeResult::placeholder(
                        MonthDuration::from_years_months(year, m),
                        PlaceholderReason::NotYetEligible,
                    )
                })
                .collect();
            padded.append(&mut first.results);
            first.results = padded;
        }
    }

    Ok(groups)
}
