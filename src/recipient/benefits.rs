//! Personal, spousal and survivor benefit rules
//!
//! - Personal: reduced 5/9% per month for the first 36 months before NRA and
//!   5/12% per month beyond that; increased by the cohort's delayed credit
//!   for each month after NRA. Delayed credits earned in the filing year are
//!   paid from the following January.
//! - Spousal: up to half the earner's PIA less the dependent's own PIA,
//!   reduced 25/36% per month for 36 months and 5/12% per month beyond,
//!   never increased after NRA.
//! - Survivor: the deceased's benefit (at least 82.5% of PIA when they filed
//!   early), reduced linearly up to 28.5% when claimed at 60.

use super::{Recipient, EARLY_REDUCTION_INFLECTION_MONTHS};
use crate::constants::MAX_FILING_AGE_YEARS;
use crate::money::Money;
use crate::month_time::{MonthDate, MonthDuration, MONTHS_IN_YEAR};

/// Earliest survivor filing age
const SURVIVOR_MIN_AGE_YEARS: i32 = 60;

/// Reduction for survivor benefits claimed at the earliest age
const SURVIVOR_MAX_REDUCTION: f64 = 0.285;

/// Survivor floor when the deceased filed before NRA
const SURVIVOR_EARLY_FILER_FLOOR: f64 = 0.825;

/// Two-tier early reduction: `first_rate` per month for up to 36 months,
/// 5/12% per month after that
fn early_reduction(months_early: i32, first_rate: f64) -> f64 {
    let first = months_early.min(EARLY_REDUCTION_INFLECTION_MONTHS) as f64 * first_rate;
    let rest = (months_early - EARLY_REDUCTION_INFLECTION_MONTHS).max(0) as f64 * 5.0 / 1200.0;
    first + rest
}

impl Recipient {
    // ========================================================================
    // Personal
    // ========================================================================

    /// Fractional change to the PIA when filing at `age`
    pub fn benefit_multiplier_at_age(&self, age: MonthDuration) -> f64 {
        let nra = self.normal_retirement_age();
        if nra > age {
            let before = nra.subtract(age).as_months();
            -early_reduction(before, 5.0 / 900.0)
        } else {
            let after = age.subtract(nra).as_months();
            self.delayed_retirement_increase() / 12.0 * after as f64
        }
    }

    /// Monthly personal benefit when filing at `age`, in whole dollars
    pub fn benefit_at_age(&self, age: MonthDuration) -> Money {
        self.primary_insurance_amount()
            .floor_to_dollar()
            .floor_times(1.0 + self.benefit_multiplier_at_age(age))
            .floor_to_dollar()
    }

    /// Personal benefit paid in month `at` after filing in `filing`
    ///
    /// Delayed credits from the filing year are withheld until January,
    /// unless filing in January or at 70.
    pub fn benefit_on_date(&self, filing: MonthDate, at: MonthDate) -> Money {
        if filing > at {
            return Money::zero();
        }

        let filing_age = self.birthdate().age_at_ssa_date(filing);
        let filing_age_benefit = self.benefit_at_age(filing_age);

        if filing_age.years() >= MAX_FILING_AGE_YEARS {
            return filing_age_benefit;
        }
        if filing <= self.normal_retirement_date() {
            return filing_age_benefit;
        }
        if filing.month_index() == 0 {
            return filing_age_benefit;
        }
        if filing.year() < at.year() {
            return filing_age_benefit;
        }

        let computation_date = self.normal_retirement_date().max(filing.january());
        self.benefit_at_age(self.birthdate().age_at_ssa_date(computation_date))
    }

    // ========================================================================
    // Spousal
    // ========================================================================

    /// Spousal benefit before any early reduction
    fn spousal_excess(&self, spouse: &Recipient) -> Money {
        spouse.primary_insurance_amount().times(0.5).sub(self.primary_insurance_amount())
    }

    pub fn eligible_for_spousal_benefit(&self, spouse: &Recipient) -> bool {
        !self.higher_earnings_than(spouse) && self.spousal_excess(spouse) > Money::zero()
    }

    /// Fraction of the spousal benefit paid when it starts on `start`
    pub fn spousal_benefit_multiplier(&self, start: MonthDate) -> f64 {
        let nra_date = self.normal_retirement_date();
        if start >= nra_date {
            1.0
        } else {
            let before = nra_date.subtract_date(start).as_months();
            1.0 - early_reduction(before, 25.0 / 3600.0)
        }
    }

    /// Spousal benefit in month `at`; zero until both spouses have filed
    pub fn spousal_benefit_on_date(
        &self,
        spouse: &Recipient,
        spouse_filing: MonthDate,
        filing: MonthDate,
        at: MonthDate,
    ) -> Money {
        if spouse_filing > at || filing > at {
            return Money::zero();
        }
        self.spousal_benefit_on_date_given_start_date(spouse, spouse_filing, filing, at)
    }

    /// Spousal benefit for a spousal period starting on `start`
    ///
    /// The benefit begins once both spouses have filed, so the effective
    /// start is never before either filing date.
    pub fn spousal_benefit_on_date_given_start_date(
        &self,
        spouse: &Recipient,
        spouse_filing: MonthDate,
        filing: MonthDate,
        start: MonthDate,
    ) -> Money {
        if self.higher_earnings_than(spouse) {
            return Money::zero();
        }
        let excess = self.spousal_excess(spouse);
        if excess <= Money::zero() {
            return Money::zero();
        }
        let effective_start = start.max(spouse_filing).max(filing);
        // Paid in whole dollars, like the personal benefit
        excess
            .floor_times(self.spousal_benefit_multiplier(effective_start))
            .floor_to_dollar()
    }

    // ========================================================================
    // Survivor
    // ========================================================================

    /// Survivor benefit for `self` after `deceased` dies
    ///
    /// `deceased_filing` later than `deceased_death` means the deceased never
    /// filed.
    pub fn survivor_benefit(
        &self,
        deceased: &Recipient,
        deceased_filing: MonthDate,
        deceased_death: MonthDate,
        survivor_filing: MonthDate,
    ) -> Money {
        let deceased_pia = deceased.primary_insurance_amount().floor_to_dollar();
        let deceased_birthdate = deceased.birthdate();

        let base = if deceased_filing > deceased_death {
            if deceased_death < deceased.normal_retirement_date() {
                deceased_pia
            } else {
                deceased.benefit_at_age(deceased_birthdate.age_at_ssa_date(deceased_death))
            }
        } else {
            let filed_benefit =
                deceased.benefit_at_age(deceased_birthdate.age_at_ssa_date(deceased_filing));
            if deceased_filing < deceased.normal_retirement_date() {
                let floor = deceased_pia
                    .floor_times(SURVIVOR_EARLY_FILER_FLOOR)
                    .floor_to_dollar();
                Money::max(filed_benefit, floor)
            } else {
                filed_benefit
            }
        };

        let survivor_nra = self.survivor_normal_retirement_age();
        let survivor_age = self.birthdate().age_at_ssa_date(survivor_filing);
        if survivor_age >= survivor_nra {
            return base;
        }

        let span = survivor_nra.as_months() - SURVIVOR_MIN_AGE_YEARS * MONTHS_IN_YEAR;
        let months_before = survivor_nra.subtract(survivor_age).as_months().min(span);
        let reduction = SURVIVOR_MAX_REDUCTION * months_before as f64 / span as f64;
        base.floor_times(1.0 - reduction).floor_to_dollar()
    }
}
