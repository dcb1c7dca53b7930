//! Lay birthdate and SSA birthdate
//!
//! SSA treats a person as attaining an age on the day before their birthday,
//! so the SSA birthdate is the lay birthdate minus one day. Someone born on
//! the 1st of a month is therefore an SSA birth month earlier.

use crate::error::{BenefitError, Result};
use crate::month_time::{MonthDate, MonthDuration, MONTH_NAMES};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Earliest age at which personal benefits may start
pub const EARLIEST_FILING_AGE_YEARS: i32 = 62;

/// A person's birthdate, replaced wholesale on edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct Birthdate {
    lay_birthdate: NaiveDate,
    ssa_birthdate: NaiveDate,
}

/// Worked example for explaining SSA age attainment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleSsaAge {
    pub age: i32,
    pub day: u32,
    pub month: &'static str,
    pub year: i32,
}

impl Birthdate {
    /// Build from a year, a 0-based month and a day of month
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(1900..=2200).contains(&year) {
            return Err(BenefitError::InvalidBirthdate {
                field: "year",
                value: year as i64,
            });
        }
        if month > 11 {
            return Err(BenefitError::InvalidBirthdate {
                field: "month",
                value: month as i64,
            });
        }
        if !(1..=31).contains(&day) {
            return Err(BenefitError::InvalidBirthdate {
                field: "day",
                value: day as i64,
            });
        }
        let date = NaiveDate::from_ymd_opt(year, month + 1, day).ok_or(BenefitError::InvalidBirthdate {
            field: "day",
            value: day as i64,
        })?;
        Self::from_naive_date(date)
    }

    pub fn from_naive_date(lay_birthdate: NaiveDate) -> Result<Self> {
        let ssa_birthdate = lay_birthdate.pred_opt().ok_or(BenefitError::InvalidBirthdate {
            field: "year",
            value: lay_birthdate.year() as i64,
        })?;
        Ok(Self {
            lay_birthdate,
            ssa_birthdate,
        })
    }

    pub fn lay_birthdate(&self) -> NaiveDate {
        self.lay_birthdate
    }

    pub fn ssa_birthdate(&self) -> NaiveDate {
        self.ssa_birthdate
    }

    /// "Jan 1, 2000"
    pub fn lay_birthdate_string(&self) -> String {
        format!(
            "{} {}, {}",
            MONTH_NAMES[self.lay_birthdate.month0() as usize],
            self.lay_birthdate.day(),
            self.lay_birthdate.year()
        )
    }

    pub fn is_first_of_month(&self) -> bool {
        self.lay_birthdate.day() == 1
    }

    pub fn lay_birth_year(&self) -> i32 {
        self.lay_birthdate.year()
    }

    /// 0-based month
    pub fn lay_birth_month(&self) -> u32 {
        self.lay_birthdate.month0()
    }

    pub fn lay_birth_day_of_month(&self) -> u32 {
        self.lay_birthdate.day()
    }

    pub fn lay_birth_month_date(&self) -> MonthDate {
        MonthDate::from_years_months(self.lay_birthdate.year(), self.lay_birthdate.month0() as i32)
    }

    pub fn ssa_birth_month_date(&self) -> MonthDate {
        MonthDate::from_years_months(self.ssa_birthdate.year(), self.ssa_birthdate.month0() as i32)
    }

    pub fn ssa_birth_year(&self) -> i32 {
        self.ssa_birthdate.year()
    }

    /// 0-based month
    pub fn ssa_birth_month(&self) -> u32 {
        self.ssa_birthdate.month0()
    }

    pub fn date_at_lay_age(&self, age: MonthDuration) -> MonthDate {
        self.lay_birth_month_date().add_duration(age)
    }

    pub fn date_at_ssa_age(&self, age: MonthDuration) -> MonthDate {
        self.ssa_birth_month_date().add_duration(age)
    }

    pub fn age_at_ssa_date(&self, date: MonthDate) -> MonthDuration {
        date.subtract_date(self.ssa_birth_month_date())
    }

    /// Calendar year in which the person attains `years_old` for SSA purposes
    pub fn year_turning_ssa_age(&self, years_old: i32) -> i32 {
        self.date_at_ssa_age(MonthDuration::from_years_months(years_old, 0))
            .year()
    }

    /// First month in which benefits may be received: the person must be 62
    /// for the whole month, which only the 1st and 2nd of the month satisfy
    /// in the month they turn 62
    pub fn earliest_filing_month(&self) -> MonthDuration {
        let mut month = MonthDuration::from_years_months(EARLIEST_FILING_AGE_YEARS, 0);
        if self.lay_birth_day_of_month() > 2 {
            month.increment();
        }
        month
    }

    /// Age in whole lay years on `as_of`
    pub fn current_age(&self, as_of: NaiveDate) -> i32 {
        let year_diff = as_of.year() - self.lay_birth_year();
        let before_birthday = (as_of.month0(), as_of.day())
            < (self.lay_birth_month(), self.lay_birth_day_of_month());
        if before_birthday {
            year_diff - 1
        } else {
            year_diff
        }
    }

    pub fn example_ssa_age(&self, year: i32) -> ExampleSsaAge {
        ExampleSsaAge {
            age: year - self.ssa_birth_year(),
            day: self.ssa_birthdate.day(),
            month: self.ssa_birth_month_date().month_full_name(),
            year,
        }
    }
}

impl Default for Birthdate {
    fn default() -> Self {
        // 1980-01-01 is a valid date with a valid predecessor
        let lay = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap_or_default();
        Self {
            lay_birthdate: lay,
            ssa_birthdate: lay.pred_opt().unwrap_or(lay),
        }
    }
}

impl TryFrom<NaiveDate> for Birthdate {
    type Error = BenefitError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        Birthdate::from_naive_date(date)
    }
}

impl From<Birthdate> for NaiveDate {
    fn from(birthdate: Birthdate) -> Self {
        birthdate.lay_birthdate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(Birthdate::from_ymd(1899, 0, 1).is_err());
        assert!(Birthdate::from_ymd(2201, 0, 1).is_err());
        assert!(Birthdate::from_ymd(1960, 12, 1).is_err());
        assert!(Birthdate::from_ymd(1960, 0, 0).is_err());
        assert!(Birthdate::from_ymd(1960, 0, 32).is_err());
        assert!(Birthdate::from_ymd(1961, 1, 29).is_err());
        assert!(Birthdate::from_ymd(1960, 1, 29).is_ok());
    }

    #[test]
    fn test_ssa_birthdate_is_previous_day() {
        let b = Birthdate::from_ymd(1960, 0, 1).unwrap();
        assert!(b.is_first_of_month());
        assert_eq!(b.lay_birth_year(), 1960);
        assert_eq!(b.ssa_birth_year(), 1959);
        assert_eq!(b.ssa_birth_month(), 11);
        assert_eq!(b.lay_birth_month_date(), MonthDate::from_years_months(1960, 0));
        assert_eq!(b.ssa_birth_month_date(), MonthDate::from_years_months(1959, 11));

        let b = Birthdate::from_ymd(1960, 0, 2).unwrap();
        assert!(!b.is_first_of_month());
        assert_eq!(b.ssa_birth_month_date(), MonthDate::from_years_months(1960, 0));
    }

    #[test]
    fn test_age_conversions() {
        let b = Birthdate::from_ymd(1960, 6, 15).unwrap();
        let age = MonthDuration::from_years_months(62, 3);
        let date = b.date_at_ssa_age(age);
        assert_eq!(date, MonthDate::from_years_months(2022, 9));
        assert_eq!(b.age_at_ssa_date(date), age);
        assert_eq!(b.date_at_lay_age(MonthDuration::from_years_months(85, 0)),
            MonthDate::from_years_months(2045, 6));
        assert_eq!(b.year_turning_ssa_age(60), 2020);
    }

    #[test]
    fn test_year_turning_age_first_of_january() {
        // SSA birthdate is Dec 31 1959
        let b = Birthdate::from_ymd(1960, 0, 1).unwrap();
        assert_eq!(b.year_turning_ssa_age(62), 2021);
    }

    #[test]
    fn test_earliest_filing_month() {
        let first = Birthdate::from_ymd(1960, 3, 1).unwrap();
        let second = Birthdate::from_ymd(1960, 3, 2).unwrap();
        let third = Birthdate::from_ymd(1960, 3, 3).unwrap();
        assert_eq!(first.earliest_filing_month(), MonthDuration::from_years_months(62, 0));
        assert_eq!(second.earliest_filing_month(), MonthDuration::from_years_months(62, 0));
        assert_eq!(third.earliest_filing_month(), MonthDuration::from_years_months(62, 1));
    }

    #[test]
    fn test_current_age() {
        let b = Birthdate::from_ymd(1960, 6, 15).unwrap();
        let day_before = NaiveDate::from_ymd_opt(2020, 7, 14).unwrap();
        let birthday = NaiveDate::from_ymd_opt(2020, 7, 15).unwrap();
        assert_eq!(b.current_age(day_before), 59);
        assert_eq!(b.current_age(birthday), 60);
    }

    #[test]
    fn test_formatting() {
        let b = Birthdate::from_ymd(2000, 0, 1).unwrap();
        assert_eq!(b.lay_birthdate_string(), "Jan 1, 2000");

        let example = b.example_ssa_age(2062);
        assert_eq!(example.age, 63);
        assert_eq!(example.day, 31);
        assert_eq!(example.month, "December");
        assert_eq!(example.year, 2062);
    }

    #[test]
    fn test_default() {
        let b = Birthdate::default();
        assert_eq!(b.lay_birth_year(), 1980);
        assert_eq!(b.ssa_birth_year(), 1979);
    }
}
