//! Precomputed personal benefit amounts by filing month
//!
//! A personal benefit only ever takes two values once filed: the filing-year
//! amount and the amount from the following January. Both depend on nothing
//! but the filing month, so one table per recipient covers the whole search.

use super::periods::PersonalAmounts;
use crate::birthdate::EARLIEST_FILING_AGE_YEARS;
use crate::constants::MAX_FILING_AGE_YEARS;
use crate::money::Money;
use crate::month_time::{MonthDate, MonthDuration, MonthDurationRange, MONTHS_IN_YEAR};
use crate::recipient::Recipient;

/// Filing ages covered by a table
pub fn strategy_age_range() -> MonthDurationRange {
    MonthDurationRange::new(
        MonthDuration::from_years_months(EARLIEST_FILING_AGE_YEARS, 0),
        MonthDuration::from_years_months(MAX_FILING_AGE_YEARS, 0),
    )
}

/// Personal amounts for one recipient at every filing age in a range
#[derive(Debug, Clone)]
pub struct RecipientPersonalBenefits {
    ages: MonthDurationRange,
    amounts: Vec<PersonalAmounts>,
}

impl RecipientPersonalBenefits {
    /// Table over every age from 62 through 70
    pub fn new(recipient: &Recipient) -> Self {
        Self::for_ages(recipient, strategy_age_range())
    }

    pub fn for_ages(recipient: &Recipient, ages: MonthDurationRange) -> Self {
        let birthdate = recipient.birthdate();
        let amounts = ages
            .iter()
            .map(|age| PersonalAmounts::compute(recipient, birthdate.date_at_ssa_age(age)))
            .collect();
        Self { ages, amounts }
    }

    pub fn ages(&self) -> MonthDurationRange {
        self.ages
    }

    pub fn get(&self, filing_age: MonthDuration) -> Option<PersonalAmounts> {
        self.ages
            .duration_to_index(filing_age)
            .and_then(|i| self.amounts.get(i).copied())
    }

    /// Undiscounted personal total from filing through `final_date`
    pub fn strategy_sum(&self, filing_age: MonthDuration, filing: MonthDate, final_date: MonthDate) -> Option<Money> {
        let amounts = self.get(filing_age)?;
        let total_months = final_date.subtract_date(filing).as_months() + 1;
        if total_months <= 0 {
            return Some(Money::zero());
        }
        let first_months = (MONTHS_IN_YEAR - filing.month_index()).min(total_months) as i64;
        let later_months = total_months as i64 - first_months;
        Some(Money::from_cents(
            amounts.first_year.cents() * first_months + amounts.later.cents() * later_months,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birthdate::Birthdate;
    use crate::strategy::periods::{personal_benefit_periods, sum_benefit_periods};

    fn recipient() -> Recipient {
        Recipient::with_pia(Birthdate::from_ymd(1960, 6, 5).unwrap(), Money::from_cents(1000_00))
    }

    #[test]
    fn test_table_matches_direct() {
        let r = recipient();
        let table = RecipientPersonalBenefits::new(&r);
        assert_eq!(table.ages().len(), 97);

        for age in table.ages().iter() {
            let filing = r.birthdate().date_at_ssa_age(age);
            assert_eq!(table.get(age), Some(PersonalAmounts::compute(&r, filing)));
        }
    }

    #[test]
    fn test_out_of_range() {
        let table = RecipientPersonalBenefits::new(&recipient());
        assert!(table.get(MonthDuration::from_years_months(61, 11)).is_none());
        assert!(table.get(MonthDuration::from_years_months(70, 1)).is_none());
    }

    #[test]
    fn test_delayed_january_bump() {
        let table = RecipientPersonalBenefits::new(&recipient());
        let amounts = table.get(MonthDuration::from_years_months(69, 11)).unwrap();
        assert_eq!(amounts.first_year, Money::from_cents(1200_00));
        assert_eq!(amounts.later, Money::from_cents(1233_00));
    }

    #[test]
    fn test_strategy_sum_matches_periods() {
        let r = recipient();
        let table = RecipientPersonalBenefits::new(&r);
        let final_date = MonthDate::from_years_months(2044, 3);
        for age in [(62, 0), (66, 5), (69, 11), (70, 0)] {
            let age = MonthDuration::from_years_months(age.0, age.1);
            let filing = r.birthdate().date_at_ssa_age(age);
            let periods = personal_benefit_periods(&r, filing, final_date, 0);
            assert_eq!(
                table.strategy_sum(age, filing, final_date),
                Some(sum_benefit_periods(&periods))
            );
        }
    }
}
