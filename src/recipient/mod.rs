//! A benefit recipient and the state derived from their earnings
//!
//! `Recipient` owns the inputs (birthdate, earnings history, simulated future
//! earnings, or a directly supplied PIA) and keeps every derived quantity in
//! step with them:
//! - Each setter recomputes indexing year, top-35 selection, AIME inputs,
//!   credits and the COLA-adjusted PIA before returning
//! - `revision()` increases on every change, so owners can detect edits by
//!   comparing revisions instead of subscribing to callbacks
//!
//! Benefit rules live in [`benefits`], the PIA formula in [`pia`].

pub mod benefits;
pub mod pia;

pub use pia::{ColaAdjustment, PrimaryInsuranceAmount};

use crate::birthdate::Birthdate;
use crate::constants::{
    full_retirement_age_band, survivor_normal_retirement_age, RetirementAgeBand, MAXIMUM_EARNINGS,
    MAX_CREDITS, MAX_YEAR, SSA_EARNINGS_YEARS,
};
use crate::earnings::{max_earner_records, EarningRecord};
use crate::error::{BenefitError, Result};
use crate::money::Money;
use crate::month_time::{MonthDate, MonthDuration};
use serde::{Deserialize, Serialize};

/// Age at which wages stop being indexed
pub const INDEXING_AGE_YEARS: i32 = 60;

/// Months of reduction at the steeper early-filing rate
pub const EARLY_REDUCTION_INFLECTION_MONTHS: i32 = 36;

/// Recipient's place in a single or couple calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecipientPosition {
    #[default]
    Only,
    First,
    Second,
}

/// Values recomputed together whenever an input changes
#[derive(Debug, Clone, Default, PartialEq)]
struct DerivedEarnings {
    indexing_year: i32,
    total_indexed_earnings: Money,
    cutoff_indexed_earnings: Money,
    top35_count: usize,
    earned_credits: u32,
    total_credits: u32,
    primary_insurance_amount: Money,
}

/// A person who may receive benefits
#[derive(Debug, Clone)]
pub struct Recipient {
    name: String,
    position: RecipientPosition,
    birthdate: Birthdate,
    earnings: Vec<EarningRecord>,
    future_earnings: Vec<EarningRecord>,
    override_pia: Option<Money>,

    /// Calendar year treated as "now" for COLA chaining and simulation
    current_year: i32,

    revision: u64,
    derived: DerivedEarnings,
}

impl Default for Recipient {
    fn default() -> Self {
        let mut recipient = Self {
            name: String::from("Self"),
            position: RecipientPosition::Only,
            birthdate: Birthdate::default(),
            earnings: Vec::new(),
            future_earnings: Vec::new(),
            override_pia: None,
            current_year: MAX_YEAR,
            revision: 0,
            derived: DerivedEarnings::default(),
        };
        recipient.recompute();
        recipient
    }
}

impl Recipient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipient with a birthdate and earnings history
    pub fn with_earnings(birthdate: Birthdate, earnings: Vec<EarningRecord>) -> Self {
        let mut recipient = Self::default();
        recipient.birthdate = birthdate;
        recipient.earnings = earnings;
        recipient.recompute();
        recipient
    }

    /// Recipient known only by a PIA, e.g. from an SSA statement
    pub fn with_pia(birthdate: Birthdate, pia: Money) -> Self {
        let mut recipient = Self::default();
        recipient.birthdate = birthdate;
        recipient.override_pia = Some(pia);
        recipient.recompute();
        recipient
    }

    /// Someone born Jan 2 of `birth_year` who earned the taxable maximum from
    /// age 22 through the year before `end_year`
    pub fn max_earner(birth_year: i32, end_year: Option<i32>) -> Result<Self> {
        let birthdate = Birthdate::from_ymd(birth_year, 0, 2)?;
        Ok(Self::with_earnings(birthdate, max_earner_records(birth_year, end_year)))
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.revision += 1;
    }

    /// Name truncated to `length` characters, ending in an ellipsis when cut
    pub fn short_name(&self, length: usize) -> String {
        if self.name.chars().count() <= length {
            return self.name.clone();
        }
        let mut short: String = self.name.chars().take(length.saturating_sub(1)).collect();
        short.push('…');
        short
    }

    pub fn position(&self) -> RecipientPosition {
        self.position
    }

    /// True if this is the only recipient
    pub fn is_only(&self) -> bool {
        self.position == RecipientPosition::Only
    }

    /// True if this is the only or the first recipient
    pub fn is_first(&self) -> bool {
        self.position != RecipientPosition::Second
    }

    pub fn mark_first(&mut self) {
        self.position = RecipientPosition::First;
        self.revision += 1;
    }

    pub fn mark_second(&mut self) {
        self.position = RecipientPosition::Second;
        self.revision += 1;
    }

    pub fn birthdate(&self) -> &Birthdate {
        &self.birthdate
    }

    pub fn set_birthdate(&mut self, birthdate: Birthdate) {
        self.birthdate = birthdate;
        self.recompute();
    }

    pub fn earnings(&self) -> &[EarningRecord] {
        &self.earnings
    }

    pub fn set_earnings(&mut self, earnings: Vec<EarningRecord>) -> Result<()> {
        self.ensure_not_pia_only()?;
        self.earnings = earnings;
        self.recompute();
        Ok(())
    }

    pub fn future_earnings(&self) -> &[EarningRecord] {
        &self.future_earnings
    }

    pub fn set_future_earnings(&mut self, future_earnings: Vec<EarningRecord>) -> Result<()> {
        self.ensure_not_pia_only()?;
        self.future_earnings = future_earnings;
        self.recompute();
        Ok(())
    }

    /// Replace future earnings with `num_years` years of `wage`, capped at
    /// each year's taxable maximum
    ///
    /// Simulation starts in the current year, or the year before when that
    /// year's record is marked incomplete, or right after any record already
    /// entered for the current or a later year.
    pub fn simulate_future_earnings_years(&mut self, num_years: u32, wage: Money) -> Result<()> {
        self.ensure_not_pia_only()?;

        let mut start_year = self.current_year;
        if let Some(last) = self.earnings.last() {
            if last.year == self.current_year - 1 && last.incomplete {
                start_year = self.current_year - 1;
            } else if last.year >= self.current_year {
                start_year = last.year + 1;
            }
        }

        self.future_earnings = (0..num_years as i32)
            .map(|i| {
                let year = start_year + i;
                let capped = Money::min(wage, MAXIMUM_EARNINGS.clamped(year));
                EarningRecord::new(year, capped, capped)
            })
            .collect();
        self.recompute();
        Ok(())
    }

    pub fn is_pia_only(&self) -> bool {
        self.override_pia.is_some()
    }

    pub fn override_pia(&self) -> Option<Money> {
        self.override_pia
    }

    /// Use `pia` directly instead of an earnings history
    pub fn set_pia(&mut self, pia: Money) -> Result<()> {
        if !self.earnings.is_empty() || !self.future_earnings.is_empty() {
            return Err(BenefitError::pia_override(
                "cannot set PIA when earnings records are present",
            ));
        }
        self.override_pia = Some(pia);
        self.recompute();
        Ok(())
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn set_current_year(&mut self, year: i32) {
        self.current_year = year;
        self.recompute();
    }

    /// Increases every time an input changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn ensure_not_pia_only(&self) -> Result<()> {
        if self.is_pia_only() {
            return Err(BenefitError::pia_override(
                "cannot set earnings records when PIA is set",
            ));
        }
        Ok(())
    }

    fn ensure_has_earnings(&self, what: &str) -> Result<()> {
        if self.is_pia_only() {
            return Err(BenefitError::pia_override(format!(
                "cannot get {} when PIA is set",
                what
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Derived state
    // ========================================================================

    fn recompute(&mut self) {
        let indexing_year = self.birthdate.year_turning_ssa_age(INDEXING_AGE_YEARS);
        let ssa_birth_year = self.birthdate.ssa_birth_year();
        let mut derived = DerivedEarnings {
            indexing_year,
            ..Default::default()
        };

        if !self.is_pia_only() {
            self.earnings.sort_by_key(|r| r.year);
            self.future_earnings.sort_by_key(|r| r.year);

            // (is_future, index, indexed earnings, year)
            let mut ranked: Vec<(bool, usize, Money, i32)> = Vec::new();
            for (is_future, records) in [(false, &mut self.earnings), (true, &mut self.future_earnings)] {
                for (i, record) in records.iter_mut().enumerate() {
                    record.age = record.year - ssa_birth_year;
                    record.is_top35 = false;
                    // indexing_year comes from a validated birthdate so it is never negative
                    let indexed = record.indexed_earnings(indexing_year).unwrap_or_default();
                    ranked.push((is_future, i, indexed, record.year));
                }
            }

            // Highest indexed earnings first, older years win ties
            ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.3.cmp(&b.3)));
            ranked.truncate(SSA_EARNINGS_YEARS);

            for &(is_future, i, indexed, _) in &ranked {
                let record = if is_future {
                    &mut self.future_earnings[i]
                } else {
                    &mut self.earnings[i]
                };
                record.is_top35 = true;
                derived.total_indexed_earnings = derived.total_indexed_earnings.plus(indexed);
            }
            derived.top35_count = ranked.len();
            derived.cutoff_indexed_earnings = if ranked.len() < SSA_EARNINGS_YEARS {
                Money::zero()
            } else {
                ranked.last().map(|r| r.2).unwrap_or_default()
            };

            let earned: u32 = self.earnings.iter().map(EarningRecord::credits).sum();
            let future: u32 = self.future_earnings.iter().map(EarningRecord::credits).sum();
            derived.earned_credits = earned.min(MAX_CREDITS);
            derived.total_credits = (derived.earned_credits + future).min(MAX_CREDITS);
        } else {
            derived.earned_credits = MAX_CREDITS;
            derived.total_credits = MAX_CREDITS;
        }

        self.derived = derived;
        let pia = self.pia().compute_primary_insurance_amount();
        self.derived.primary_insurance_amount = pia;
        self.revision += 1;

        log::debug!(
            "Recomputed {}: indexing year {}, {} top years, AIME {}, PIA {}",
            self.name,
            self.derived.indexing_year,
            self.derived.top35_count,
            self.monthly_indexed_earnings_unchecked(),
            self.derived.primary_insurance_amount
        );
    }

    /// Year the recipient turns 60, which freezes wage indexing
    pub fn indexing_year(&self) -> i32 {
        self.derived.indexing_year
    }

    pub fn total_indexed_earnings(&self) -> Result<Money> {
        self.ensure_has_earnings("total indexed earnings")?;
        Ok(self.derived.total_indexed_earnings)
    }

    /// AIME before rounding: top-35 total over 420 months, floored to the dollar
    pub fn monthly_indexed_earnings(&self) -> Result<Money> {
        self.ensure_has_earnings("monthly indexed earnings")?;
        Ok(self.monthly_indexed_earnings_unchecked())
    }

    fn monthly_indexed_earnings_unchecked(&self) -> Money {
        let months = 12 * SSA_EARNINGS_YEARS as i64;
        let dollars = self.derived.total_indexed_earnings.cents().div_euclid(months * 100);
        Money::from_cents(dollars * 100)
    }

    /// Smallest indexed earnings still counted in the top 35, or zero when
    /// fewer than 35 years exist
    pub fn cutoff_indexed_earnings(&self) -> Result<Money> {
        self.ensure_has_earnings("cutoff indexed earnings")?;
        Ok(self.derived.cutoff_indexed_earnings)
    }

    pub fn has_earnings_before_1978(&self) -> Result<bool> {
        self.ensure_has_earnings("earnings records")?;
        Ok(self.earnings.first().map(|r| r.year < 1978).unwrap_or(false))
    }

    /// Credits from recorded earnings; PIA-only recipients are assumed fully insured
    pub fn earned_credits(&self) -> u32 {
        self.derived.earned_credits
    }

    /// Credits including simulated future earnings
    pub fn total_credits(&self) -> u32 {
        self.derived.total_credits
    }

    pub fn is_eligible(&self) -> bool {
        self.is_pia_only() || self.derived.total_credits >= MAX_CREDITS
    }

    pub fn pia(&self) -> PrimaryInsuranceAmount<'_> {
        PrimaryInsuranceAmount::new(self)
    }

    /// COLA-adjusted PIA, or the override for PIA-only recipients
    pub fn primary_insurance_amount(&self) -> Money {
        self.derived.primary_insurance_amount
    }

    /// Strictly higher PIA than `other`
    pub fn higher_earnings_than(&self, other: &Recipient) -> bool {
        self.primary_insurance_amount() > other.primary_insurance_amount()
    }

    // ========================================================================
    // Retirement ages
    // ========================================================================

    fn retirement_age_band(&self) -> RetirementAgeBand {
        full_retirement_age_band(self.birthdate.ssa_birth_year())
    }

    pub fn normal_retirement_age(&self) -> MonthDuration {
        self.retirement_age_band().age()
    }

    /// Annual delayed retirement credit
    pub fn delayed_retirement_increase(&self) -> f64 {
        self.retirement_age_band().delayed_increase
    }

    pub fn normal_retirement_date(&self) -> MonthDate {
        self.birthdate.date_at_ssa_age(self.normal_retirement_age())
    }

    /// Age where the early reduction rate changes
    pub fn early_retirement_inflection_age(&self) -> MonthDuration {
        self.normal_retirement_age()
            .subtract(MonthDuration::new(EARLY_REDUCTION_INFLECTION_MONTHS))
    }

    pub fn early_retirement_inflection_date(&self) -> MonthDate {
        self.normal_retirement_date()
            .subtract_duration(MonthDuration::new(EARLY_REDUCTION_INFLECTION_MONTHS))
    }

    pub fn survivor_normal_retirement_age(&self) -> MonthDuration {
        survivor_normal_retirement_age(self.birthdate.ssa_birth_year())
    }
}
