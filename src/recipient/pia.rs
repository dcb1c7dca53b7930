//! Primary Insurance Amount formula
//!
//! PIA = 90% of AIME up to the first bend point, 32% up to the second and
//! 15% above it. Each bracket is floored to the cent, the sum to the dime,
//! and every COLA step from age 62 onward floors to the dime again.

use super::Recipient;
use crate::constants::{
    AFTER_BENDPOINT2_MULTIPLIER, BEFORE_BENDPOINT1_MULTIPLIER, BEFORE_BENDPOINT2_MULTIPLIER,
    BENDPOINT1_IN_1977, BENDPOINT2_IN_1977, BENDPOINT_BASE_YEAR, COLA, MAX_COLA_YEAR,
    MAX_WAGE_INDEX_YEAR, WAGE_INDICES,
};
use crate::error::{BenefitError, Result};
use crate::money::Money;
use serde::Serialize;

/// Number of PIA formula brackets
pub const PIA_BRACKETS: usize = 3;

/// Age at which COLAs start applying to the PIA
const COLA_START_AGE: i32 = 62;

/// One step of the COLA chain, for audit display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColaAdjustment {
    pub year: i32,

    /// Percentage, e.g. 5.9
    pub cola: f64,

    pub start: Money,
    pub end: Money,
}

/// PIA calculator view over a recipient
#[derive(Debug, Clone, Copy)]
pub struct PrimaryInsuranceAmount<'a> {
    recipient: &'a Recipient,
}

impl<'a> PrimaryInsuranceAmount<'a> {
    pub fn new(recipient: &'a Recipient) -> Self {
        Self { recipient }
    }

    /// Wage growth from 1977 to the indexing year
    pub fn wage_ratio(&self) -> f64 {
        let effective_year = self.recipient.indexing_year().min(MAX_WAGE_INDEX_YEAR);
        WAGE_INDICES.clamped(effective_year) / WAGE_INDICES.clamped(BENDPOINT_BASE_YEAR)
    }

    pub fn first_bend_point(&self) -> Money {
        BENDPOINT1_IN_1977.times(self.wage_ratio()).round_to_dollar()
    }

    pub fn second_bend_point(&self) -> Money {
        BENDPOINT2_IN_1977.times(self.wage_ratio()).round_to_dollar()
    }

    /// Portion of the PIA from one formula bracket (0, 1 or 2)
    pub fn primary_insurance_amount_by_bracket(&self, bracket: usize) -> Result<Money> {
        if bracket >= PIA_BRACKETS {
            return Err(BenefitError::InvalidBracket(bracket));
        }
        if self.recipient.is_pia_only() {
            return Err(BenefitError::pia_override(
                "cannot calculate PIA brackets for a PIA-only recipient",
            ));
        }
        if !self.recipient.is_eligible() {
            return Ok(Money::zero());
        }
        let aime = self.recipient.monthly_indexed_earnings()?.round_to_dollar();
        Ok(self.bracket_amount(aime, bracket))
    }

    fn bracket_amount(&self, aime: Money, bracket: usize) -> Money {
        let first_bend = self.first_bend_point();
        let second_bend = self.second_bend_point();

        match bracket {
            0 => Money::min(aime, first_bend).floor_times(BEFORE_BENDPOINT1_MULTIPLIER),
            1 => Money::max(Money::zero(), Money::min(aime, second_bend).sub(first_bend))
                .floor_times(BEFORE_BENDPOINT2_MULTIPLIER),
            _ => Money::max(Money::zero(), aime.sub(second_bend))
                .floor_times(AFTER_BENDPOINT2_MULTIPLIER),
        }
    }

    /// Bracket sum floored to the dime, before any COLA
    pub fn primary_insurance_amount_unadjusted(&self) -> Result<Money> {
        let mut sum = Money::zero();
        for bracket in 0..PIA_BRACKETS {
            sum = sum.plus(self.primary_insurance_amount_by_bracket(bracket)?);
        }
        Ok(sum.floor_to_dime())
    }

    /// COLA-adjusted PIA as of the recipient's current year
    pub fn primary_insurance_amount(&self) -> Money {
        self.recipient.primary_insurance_amount()
    }

    pub(super) fn compute_primary_insurance_amount(&self) -> Money {
        if let Some(pia) = self.recipient.override_pia() {
            return pia;
        }
        let unadjusted = if self.recipient.is_eligible() {
            let aime = self.recipient.monthly_indexed_earnings_unchecked().round_to_dollar();
            self.unadjusted_from_aime(aime)
        } else {
            Money::zero()
        };
        self.apply_colas(unadjusted)
    }

    /// PIA for an arbitrary AIME using this recipient's bend points and COLAs
    pub fn pia_from_aime(&self, aime: Money) -> Money {
        let unadjusted = self.unadjusted_from_aime(aime.round_to_dollar());
        self.apply_colas(unadjusted)
    }

    fn unadjusted_from_aime(&self, aime: Money) -> Money {
        (0..PIA_BRACKETS)
            .map(|bracket| self.bracket_amount(aime, bracket))
            .sum::<Money>()
            .floor_to_dime()
    }

    fn year_turning_62(&self) -> i32 {
        self.recipient.birthdate().year_turning_ssa_age(COLA_START_AGE)
    }

    /// COLAs announced from the age-62 year through last year
    fn apply_colas(&self, unadjusted: Money) -> Money {
        (self.year_turning_62()..self.recipient.current_year())
            .filter_map(|year| COLA.get(year))
            .fold(unadjusted, |pia, cola| {
                pia.floor_times(1.0 + cola / 100.0).floor_to_dime()
            })
    }

    /// False when the recipient turns 62 after the last published COLA
    pub fn should_adjust_for_cola(&self) -> bool {
        self.year_turning_62() <= MAX_COLA_YEAR
    }

    /// Each COLA step from the age-62 year through the current year
    pub fn cola_adjustments(&self) -> Result<Vec<ColaAdjustment>> {
        let mut adjusted = self.primary_insurance_amount_unadjusted()?;
        let mut adjustments = Vec::new();

        for year in self.year_turning_62()..=self.recipient.current_year() {
            if let Some(cola) = COLA.get(year) {
                let end = adjusted.floor_times(1.0 + cola / 100.0).floor_to_dime();
                adjustments.push(ColaAdjustment {
                    year,
                    cola,
                    start: adjusted,
                    end,
                });
                adjusted = end;
            }
        }
        Ok(adjustments)
    }
}
