//! Exact currency values stored as integer cents
//!
//! All benefit arithmetic flows through `Money` so floating-point drift never
//! reaches a currency amount:
//! - `times` rounds to the nearest cent, `floor_times` floors to the cent
//! - Dollar and dime rounding helpers mirror SSA rounding rules
//! - Formatting produces `$1,234.56` and `$1,235` strings

use crate::error::{BenefitError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

/// Tolerance applied before flooring so products like 69999.99999999 cents
/// land on 70000
const FLOOR_TOLERANCE: f64 = 1e-6;

/// An amount of U.S. currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Create from a dollar amount, rounding to the nearest cent
    pub fn from_dollars(dollars: f64) -> Result<Self> {
        if !dollars.is_finite() {
            return Err(BenefitError::invalid_amount(format!("{} dollars", dollars)));
        }
        Ok(Self {
            cents: (dollars * 100.0).round() as i64,
        })
    }

    /// Create from a whole number of cents
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Create from a fractional cent amount, rounding to the nearest cent
    pub fn from_cents_f64(cents: f64) -> Result<Self> {
        if !cents.is_finite() {
            return Err(BenefitError::invalid_amount(format!("{} cents", cents)));
        }
        Ok(Self {
            cents: cents.round() as i64,
        })
    }

    pub const fn zero() -> Self {
        Self { cents: 0 }
    }

    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Value in dollars
    pub fn value(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    pub fn plus(self, other: Money) -> Money {
        Money::from_cents(self.cents + other.cents)
    }

    pub fn sub(self, other: Money) -> Money {
        Money::from_cents(self.cents - other.cents)
    }

    /// Multiply by a factor, rounding to the nearest cent
    pub fn times(self, factor: f64) -> Money {
        Money::from_cents((self.cents as f64 * factor).round() as i64)
    }

    /// Multiply by a factor, flooring to the cent
    pub fn floor_times(self, factor: f64) -> Money {
        Money::from_cents((self.cents as f64 * factor + FLOOR_TOLERANCE).floor() as i64)
    }

    /// Divide by a factor, rounding to the nearest cent
    pub fn div(self, factor: f64) -> Result<Money> {
        if factor == 0.0 {
            return Err(BenefitError::DivisionByZero);
        }
        let cents = self.cents as f64 / factor;
        Money::from_cents_f64(cents)
    }

    /// Ratio between two amounts
    pub fn div_money(self, other: Money) -> Result<f64> {
        if other.cents == 0 {
            return Err(BenefitError::DivisionByZero);
        }
        Ok(self.cents as f64 / other.cents as f64)
    }

    pub fn min(a: Money, b: Money) -> Money {
        if a.cents <= b.cents {
            a
        } else {
            b
        }
    }

    pub fn max(a: Money, b: Money) -> Money {
        if a.cents >= b.cents {
            a
        } else {
            b
        }
    }

    /// Round to the nearest whole dollar (half away from zero)
    pub fn round_to_dollar(self) -> Money {
        let dollars = (self.cents as f64 / 100.0).round() as i64;
        Money::from_cents(dollars * 100)
    }

    /// Floor to the whole dollar
    pub fn floor_to_dollar(self) -> Money {
        Money::from_cents(self.cents.div_euclid(100) * 100)
    }

    /// Floor to the dime; PIA amounts are always truncated this way
    pub fn floor_to_dime(self) -> Money {
        Money::from_cents(self.cents.div_euclid(10) * 10)
    }

    /// Format as `$1,234.56`
    pub fn string(&self) -> String {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        format!("{}${}.{:02}", sign, group_thousands(abs / 100), abs % 100)
    }

    /// Format rounded to whole dollars as `$1,235`
    pub fn whole_dollars(&self) -> String {
        let dollars = self.round_to_dollar().cents / 100;
        let sign = if dollars < 0 { "-" } else { "" };
        format!("{}${}", sign, group_thousands(dollars.unsigned_abs()))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.plus(other)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Money::from_cents(self.cents - other.cents)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Money::from_cents(-self.cents)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::plus)
    }
}
