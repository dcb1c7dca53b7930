//! Calendar arithmetic at month granularity
//!
//! Benefit rules only care about months, so day-of-month is never modeled:
//! - `MonthDate`: months since January of year 0 (January = month 0)
//! - `MonthDuration`: a signed count of months
//! - `MonthDurationRange`: an inclusive range of ages, e.g. filing ages 62..=70

use crate::error::BenefitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MONTHS_IN_YEAR: i32 = 12;

/// Three letter month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const MONTH_FULL_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ============================================================================
// MonthDate
// ============================================================================

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDate {
    months_since_epoch: i32,
}

impl MonthDate {
    pub const fn new(months_since_epoch: i32) -> Self {
        Self { months_since_epoch }
    }

    /// `from_years_months(2000, 0)` is January 2000
    pub const fn from_years_months(years: i32, months: i32) -> Self {
        Self::new(years * MONTHS_IN_YEAR + months)
    }

    /// Build from a year and a three letter month name such as "Jan"
    pub fn from_year_month_name(years: i32, month: &str) -> Option<Self> {
        MONTH_NAMES
            .iter()
            .position(|name| *name == month)
            .map(|index| Self::from_years_months(years, index as i32))
    }

    pub const fn months_since_epoch(&self) -> i32 {
        self.months_since_epoch
    }

    pub fn year(&self) -> i32 {
        self.months_since_epoch.div_euclid(MONTHS_IN_YEAR)
    }

    /// 0 for January through 11 for December
    pub fn month_index(&self) -> i32 {
        self.months_since_epoch.rem_euclid(MONTHS_IN_YEAR)
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month_index() as usize]
    }

    pub fn month_full_name(&self) -> &'static str {
        MONTH_FULL_NAMES[self.month_index() as usize]
    }

    /// Duration from `other` to `self`
    pub fn subtract_date(&self, other: MonthDate) -> MonthDuration {
        MonthDuration::new(self.months_since_epoch - other.months_since_epoch)
    }

    pub fn add_duration(&self, duration: MonthDuration) -> MonthDate {
        MonthDate::new(self.months_since_epoch + duration.as_months())
    }

    pub fn subtract_duration(&self, duration: MonthDuration) -> MonthDate {
        MonthDate::new(self.months_since_epoch - duration.as_months())
    }

    /// Shorthand for `add_duration(MonthDuration::new(months))`
    pub fn add_months(&self, months: i32) -> MonthDate {
        MonthDate::new(self.months_since_epoch + months)
    }

    /// January of the same year
    pub fn january(&self) -> MonthDate {
        MonthDate::from_years_months(self.year(), 0)
    }
}

impl fmt::Display for MonthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year())
    }
}

/// Parses `YYYY-MM` with a 1-based month
impl FromStr for MonthDate {
    type Err = BenefitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| BenefitError::invalid_input(format!("expected YYYY-MM, got '{}'", s)))?;
        let year: i32 = year
            .parse()
            .map_err(|_| BenefitError::invalid_input(format!("bad year in '{}'", s)))?;
        let month: i32 = month
            .parse()
            .map_err(|_| BenefitError::invalid_input(format!("bad month in '{}'", s)))?;
        if !(1..=12).contains(&month) {
            return Err(BenefitError::invalid_input(format!("month out of range in '{}'", s)));
        }
        Ok(MonthDate::from_years_months(year, month - 1))
    }
}

impl TryFrom<String> for MonthDate {
    type Error = BenefitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthDate> for String {
    fn from(date: MonthDate) -> Self {
        format!("{:04}-{:02}", date.year(), date.month_index() + 1)
    }
}

// ============================================================================
// MonthDuration
// ============================================================================

/// A signed number of months, e.g. an age or a gap between two dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthDuration {
    months: i32,
}

impl MonthDuration {
    pub const fn new(months: i32) -> Self {
        Self { months }
    }

    pub const fn from_years_months(years: i32, months: i32) -> Self {
        Self::new(years * MONTHS_IN_YEAR + months)
    }

    pub const fn one_year() -> Self {
        Self::new(MONTHS_IN_YEAR)
    }

    pub const fn as_months(&self) -> i32 {
        self.months
    }

    /// Whole years, floored
    pub fn years(&self) -> i32 {
        self.months.div_euclid(MONTHS_IN_YEAR)
    }

    /// Months left after removing whole years; carries the sign of the duration
    pub fn mod_months(&self) -> i32 {
        self.months % MONTHS_IN_YEAR
    }

    pub fn add(&self, other: MonthDuration) -> MonthDuration {
        MonthDuration::new(self.months + other.months)
    }

    pub fn subtract(&self, other: MonthDuration) -> MonthDuration {
        MonthDuration::new(self.months - other.months)
    }

    pub fn increment(&mut self) {
        self.months += 1;
    }
}

impl fmt::Display for MonthDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years {} months", self.years(), self.months.rem_euclid(MONTHS_IN_YEAR))
    }
}

// ============================================================================
// MonthDurationRange
// ============================================================================

/// Inclusive range of durations, typically the filing ages under consideration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDurationRange {
    pub start: MonthDuration,
    pub end: MonthDuration,
}

impl MonthDurationRange {
    pub fn new(start: MonthDuration, end: MonthDuration) -> Self {
        Self { start, end }
    }

    /// Number of months in the range; zero when `end < start`
    pub fn len(&self) -> usize {
        (self.end.as_months() - self.start.as_months() + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, duration: MonthDuration) -> bool {
        duration >= self.start && duration <= self.end
    }

    pub fn index_to_duration(&self, index: usize) -> MonthDuration {
        self.start.add(MonthDuration::new(index as i32))
    }

    pub fn duration_to_index(&self, duration: MonthDuration) -> Option<usize> {
        if self.contains(duration) {
            Some(duration.subtract(self.start).as_months() as usize)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = MonthDuration> {
        (self.start.as_months()..=self.end.as_months()).map(MonthDuration::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_date_components() {
        let date = MonthDate::from_years_months(2030, 5);
        assert_eq!(date.year(), 2030);
        assert_eq!(date.month_index(), 5);
        assert_eq!(date.month_name(), "Jun");
        assert_eq!(date.month_full_name(), "June");
        assert_eq!(date.months_since_epoch(), 2030 * 12 + 5);
        assert_eq!(date.to_string(), "Jun 2030");
        assert_eq!(date.january(), MonthDate::from_years_months(2030, 0));
    }

    #[test]
    fn test_month_date_from_name() {
        assert_eq!(
            MonthDate::from_year_month_name(2000, "Dec"),
            Some(MonthDate::from_years_months(2000, 11))
        );
        assert_eq!(MonthDate::from_year_month_name(2000, "December"), None);
    }

    #[test]
    fn test_month_date_arithmetic() {
        let a = MonthDate::from_years_months(2030, 1);
        let b = MonthDate::from_years_months(2028, 11);
        assert_eq!(a.subtract_date(b).as_months(), 14);
        assert_eq!(b.subtract_date(a).as_months(), -14);
        assert_eq!(b.add_duration(MonthDuration::new(14)), a);
        assert_eq!(a.subtract_duration(MonthDuration::new(14)), b);
        assert_eq!(b.add_months(1), MonthDate::from_years_months(2029, 0));
        assert!(b < a);
        assert_eq!(a.max(b), a);
        assert_eq!(a.min(b), b);
    }

    #[test]
    fn test_month_date_parse() {
        let date: MonthDate = "2026-10".parse().unwrap();
        assert_eq!(date, MonthDate::from_years_months(2026, 9));
        assert_eq!(String::from(date), "2026-10");
        assert!("2026-13".parse::<MonthDate>().is_err());
        assert!("2026".parse::<MonthDate>().is_err());

        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2026-10\"");
        let back: MonthDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn test_duration_components() {
        let d = MonthDuration::from_years_months(62, 3);
        assert_eq!(d.as_months(), 747);
        assert_eq!(d.years(), 62);
        assert_eq!(d.mod_months(), 3);
        assert_eq!(d.to_string(), "62 years 3 months");

        let negative = MonthDuration::new(-13);
        assert_eq!(negative.years(), -2);
        assert_eq!(negative.mod_months(), -1);
    }

    #[test]
    fn test_duration_arithmetic() {
        let mut d = MonthDuration::from_years_months(62, 0);
        d.increment();
        assert_eq!(d.as_months(), 62 * 12 + 1);
        assert_eq!(d.add(MonthDuration::one_year()).years(), 63);
        assert_eq!(d.subtract(MonthDuration::new(2)).mod_months(), 11);
    }

    #[test]
    fn test_duration_range() {
        let range = MonthDurationRange::new(
            MonthDuration::from_years_months(62, 1),
            MonthDuration::from_years_months(70, 0),
        );
        assert_eq!(range.len(), 96);
        assert!(range.contains(MonthDuration::from_years_months(66, 0)));
        assert!(!range.contains(MonthDuration::from_years_months(62, 0)));
        assert_eq!(range.index_to_duration(0), range.start);
        assert_eq!(range.index_to_duration(95), range.end);
        assert_eq!(range.duration_to_index(range.end), Some(95));
        assert_eq!(range.iter().count(), 96);

        let empty = MonthDurationRange::new(MonthDuration::new(5), MonthDuration::new(4));
        assert!(empty.is_empty());
    }
}
