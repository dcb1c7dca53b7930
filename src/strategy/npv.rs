//! Net present value of benefit periods
//!
//! Each covered month is paid one month later. A period is valued from the
//! later of its first payment and the month after the evaluation date:
//!
//! `NPV = amount × pvFactor(n, r) × (1 + r)^-k`
//!
//! with `n` remaining payments and `k` months until the first of them.

use super::discount::{monthly_discount_rate, DirectDiscount, DiscountFactors};
use super::periods::{personal_benefit_periods, strategy_sum_periods, BenefitPeriod, Couple};
use crate::error::Result;
use crate::money::Money;
use crate::month_time::{MonthDate, MonthDuration};
use crate::recipient::Recipient;

/// NPV in fractional cents of a list of periods as of `current`
pub fn periods_npv_cents<D: DiscountFactors>(
    periods: &[BenefitPeriod],
    current: MonthDate,
    factors: &mut D,
) -> f64 {
    let earliest_payment = current.add_months(1);
    let undiscounted = factors.monthly_rate() == 0.0;
    let mut total = 0.0;

    for period in periods {
        let first_payment = period.start_date.add_months(1);
        let last_payment = period.end_date.add_months(1);
        let effective_first = first_payment.max(earliest_payment);
        if effective_first > last_payment {
            continue;
        }

        let payments = last_payment.subtract_date(effective_first).as_months() + 1;
        let cents = period.amount.cents() as f64;
        if undiscounted {
            total += cents * payments as f64;
        } else {
            let months_to_first = effective_first.subtract_date(current).as_months();
            total += cents * factors.pv_factor(payments) * factors.discount(months_to_first);
        }
    }
    total
}

/// NPV of a couple's strategy at a monthly discount rate
pub fn strategy_sum_total_periods(
    couple: &Couple<'_>,
    current: MonthDate,
    monthly_rate: f64,
    filing_ages: [MonthDuration; 2],
) -> Money {
    let periods = strategy_sum_periods(couple, filing_ages);
    let cents = periods_npv_cents(&periods, current, &mut DirectDiscount::new(monthly_rate));
    Money::from_cents(cents.round() as i64)
}

/// NPV in whole cents of a couple's strategy at an annual discount rate
pub fn strategy_sum_cents(
    couple: &Couple<'_>,
    current: MonthDate,
    annual_rate: f64,
    filing_ages: [MonthDuration; 2],
) -> Result<i64> {
    let monthly_rate = monthly_discount_rate(annual_rate)?;
    Ok(strategy_sum_total_periods(couple, current, monthly_rate, filing_ages).cents())
}

/// NPV in whole cents of one recipient's personal benefit alone
pub fn strategy_sum_cents_single(
    recipient: &Recipient,
    final_date: MonthDate,
    current: MonthDate,
    annual_rate: f64,
    filing_age: MonthDuration,
) -> Result<i64> {
    let monthly_rate = monthly_discount_rate(annual_rate)?;
    let filing = recipient.birthdate().date_at_ssa_age(filing_age);
    let periods = personal_benefit_periods(recipient, filing, final_date, 0);
    let cents = periods_npv_cents(&periods, current, &mut DirectDiscount::new(monthly_rate));
    Ok(cents.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birthdate::Birthdate;
    use crate::strategy::discount::DiscountCache;
    use crate::strategy::periods::BenefitType;

    fn dollars(d: i64) -> Money {
        Money::from_cents(d * 100)
    }

    fn date(year: i32, month: i32) -> MonthDate {
        MonthDate::from_years_months(year, month)
    }

    fn period(amount: i64, start: MonthDate, end: MonthDate) -> BenefitPeriod {
        BenefitPeriod {
            recipient_index: 0,
            benefit_type: BenefitType::Personal,
            amount: dollars(amount),
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_undiscounted_counts_payments() {
        let periods = [period(100, date(2030, 0), date(2030, 11))];
        let npv = periods_npv_cents(&periods, date(2025, 0), &mut DirectDiscount::new(0.0));
        assert_eq!(npv, 1200_00.0);
    }

    #[test]
    fn test_partially_paid_period() {
        // payments Feb 2030..Jan 2031; only those after Jun 2030 remain
        let periods = [period(100, date(2030, 0), date(2030, 11))];
        let npv = periods_npv_cents(&periods, date(2030, 5), &mut DirectDiscount::new(0.0));
        assert_eq!(npv, 700_00.0);

        // fully paid out before the evaluation date
        let npv = periods_npv_cents(&periods, date(2031, 0), &mut DirectDiscount::new(0.0));
        assert_eq!(npv, 0.0);
    }

    #[test]
    fn test_discounted_single_payment() {
        let rate = 0.01;
        let periods = [period(100, date(2030, 0), date(2030, 0))];
        // one payment in Feb 2030, 13 months after Jan 2029
        let npv = periods_npv_cents(&periods, date(2029, 0), &mut DirectDiscount::new(rate));
        let expected = 100_00.0 * (1.0 / 1.01) * 1.01f64.powi(-13);
        assert!((npv - expected).abs() < 1e-6);
    }

    #[test]
    fn test_cache_and_direct_agree() {
        let periods = [
            period(1200, date(2030, 5), date(2030, 11)),
            period(1233, date(2031, 0), date(2050, 3)),
        ];
        let rate = monthly_discount_rate(0.04).unwrap();
        let direct = periods_npv_cents(&periods, date(2023, 0), &mut DirectDiscount::new(rate));
        let mut cache = DiscountCache::new(rate);
        let cached = periods_npv_cents(&periods, date(2023, 0), &mut cache);
        let again = periods_npv_cents(&periods, date(2023, 0), &mut cache);
        assert_eq!(direct, cached);
        assert_eq!(cached, again);
        assert!(cache.cache_hits > 0);
    }

    #[test]
    fn test_strategy_sum_cents_undiscounted() {
        let a = Recipient::with_pia(Birthdate::from_ymd(1960, 0, 15).unwrap(), dollars(1000));
        let b = Recipient::with_pia(Birthdate::from_ymd(1960, 0, 15).unwrap(), dollars(1000));
        let couple = Couple::new([&a, &b], [date(2045, 11), date(2045, 11)]);
        let seventy = MonthDuration::from_years_months(70, 0);
        let cents = strategy_sum_cents(&couple, date(2023, 0), 0.0, [seventy, seventy]).unwrap();
        assert_eq!(cents, 476_160_00);
    }

    #[test]
    fn test_discounting_lowers_value() {
        let a = Recipient::with_pia(Birthdate::from_ymd(1960, 0, 15).unwrap(), dollars(1000));
        let b = Recipient::with_pia(Birthdate::from_ymd(1962, 4, 15).unwrap(), dollars(600));
        let couple = Couple::new([&a, &b], [date(2045, 11), date(2050, 11)]);
        let ages = [MonthDuration::from_years_months(67, 0), MonthDuration::from_years_months(65, 0)];
        let flat = strategy_sum_cents(&couple, date(2023, 0), 0.0, ages).unwrap();
        let discounted = strategy_sum_cents(&couple, date(2023, 0), 0.03, ages).unwrap();
        assert!(discounted < flat);
        assert!(discounted > 0);
        assert!(strategy_sum_cents(&couple, date(2023, 0), f64::INFINITY, ages).is_err());
    }

    #[test]
    fn test_single_recipient_npv() {
        let r = Recipient::with_pia(Birthdate::from_ymd(1960, 0, 15).unwrap(), dollars(1000));
        // file at 70 in Jan 2030, last month Dec 2045
        let cents = strategy_sum_cents_single(
            &r,
            date(2045, 11),
            date(2023, 0),
            0.0,
            MonthDuration::from_years_months(70, 0),
        )
        .unwrap();
        assert_eq!(cents, 238_080_00);
    }
}
