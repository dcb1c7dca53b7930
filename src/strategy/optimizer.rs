//! Exhaustive filing-age search for a couple
//!
//! Every pair of filing ages from each recipient's earliest permissible
//! month through age 70 is evaluated, earner ages in the outer loop and
//! dependent ages in the inner loop. The first pair reaching the highest
//! NPV (in whole cents) wins.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::discount::{monthly_discount_rate, DiscountCache, DiscountFactors};
use super::npv::{periods_npv_cents, strategy_sum_total_periods};
use super::periods::{
    compose_periods, BenefitLookup, BenefitPeriod, Couple, CoupleRoles, DirectBenefits,
    PersonalAmounts,
};
use super::personal_benefits::RecipientPersonalBenefits;
use super::CalculationConfig;
use crate::constants::MAX_FILING_AGE_YEARS;
use crate::error::{BenefitError, Result};
use crate::money::Money;
use crate::month_time::{MonthDate, MonthDuration, MonthDurationRange};
use crate::recipient::Recipient;

/// Months a claim may be backdated
const MAX_RETROACTIVE_MONTHS: i32 = 6;

/// Optimizer search method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OptimizerMethod {
    /// Rebuild every strategy from scratch
    BruteForce,

    /// Precompute per-couple invariants and memoize discount factors
    #[default]
    Memoized,

    /// Memoized, with earner rows spread over the rayon pool
    Parallel,
}

/// Best filing ages found for a couple
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalStrategy {
    /// Filing age per recipient, in the couple's order
    pub filing_ages: [MonthDuration; 2],

    pub npv: Money,

    /// Number of filing-age pairs evaluated
    pub evaluated: usize,
}

/// Earliest filing age still open to `recipient` as of `current`
///
/// Starts from the month after turning 62 (the 62nd-birthday month for
/// those born on the 1st or 2nd). Past that, a claim may only be backdated
/// to NRA, and never more than six months.
pub fn earliest_filing(recipient: &Recipient, current: MonthDate) -> MonthDuration {
    let mut earliest = recipient.birthdate().earliest_filing_month();
    let current_age = recipient.birthdate().age_at_ssa_date(current);
    if earliest >= current_age {
        return earliest;
    }

    let nra = recipient.normal_retirement_age();
    if nra > earliest {
        earliest = if nra > current_age { current_age } else { nra };
    }

    let six_months_ago = current_age.subtract(MonthDuration::new(MAX_RETROACTIVE_MONTHS));
    if earliest < six_months_ago {
        earliest = six_months_ago;
    }
    earliest
}

/// Find the NPV-maximizing filing ages with the default (memoized) search
pub fn optimal_strategy(
    couple: Couple<'_>,
    current: MonthDate,
    annual_rate: f64,
) -> Result<OptimalStrategy> {
    StrategyOptimizer::new(couple, CalculationConfig::discounted(current, annual_rate)).optimize()
}

// ============================================================================
// Precomputed lookups
// ============================================================================

/// Personal tables and a spousal-by-start-month memo for one couple
struct MemoizedBenefits<'c, 'a> {
    direct: DirectBenefits<'c, 'a>,
    personal: [RecipientPersonalBenefits; 2],
    spousal_base: MonthDate,
    spousal: Vec<Money>,
    couple: &'c Couple<'a>,
}

impl<'c, 'a> MemoizedBenefits<'c, 'a> {
    fn new(couple: &'c Couple<'a>, roles: CoupleRoles, ranges: &[MonthDurationRange; 2]) -> Self {
        let direct = DirectBenefits::new(couple, roles);
        let personal = [
            RecipientPersonalBenefits::new(couple.recipients[0]),
            RecipientPersonalBenefits::new(couple.recipients[1]),
        ];

        let first_dates = [0, 1].map(|i| couple.recipients[i].birthdate().date_at_ssa_age(ranges[i].start));
        let last_dates = [0, 1].map(|i| couple.recipients[i].birthdate().date_at_ssa_age(ranges[i].end));
        let spousal_base = first_dates[0].min(first_dates[1]);
        let spousal_last = last_dates[0].max(last_dates[1]);

        let spousal = if roles.spousal_eligible && spousal_last >= spousal_base {
            let months = spousal_last.subtract_date(spousal_base).as_months() + 1;
            (0..months)
                .map(|offset| {
                    let start = spousal_base.add_months(offset);
                    direct.spousal(start, start, start)
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            direct,
            personal,
            spousal_base,
            spousal,
            couple,
        }
    }
}

impl BenefitLookup for MemoizedBenefits<'_, '_> {
    fn personal(&self, index: usize, filing: MonthDate) -> PersonalAmounts {
        let age = self.couple.recipients[index].birthdate().age_at_ssa_date(filing);
        self.personal[index]
            .get(age)
            .unwrap_or_else(|| self.direct.personal(index, filing))
    }

    fn spousal(&self, earner_filing: MonthDate, dependent_filing: MonthDate, start: MonthDate) -> Money {
        let offset = start.subtract_date(self.spousal_base).as_months();
        let memo = if start >= earner_filing && start >= dependent_filing && offset >= 0 {
            self.spousal.get(offset as usize).copied()
        } else {
            None
        };
        memo.unwrap_or_else(|| self.direct.spousal(earner_filing, dependent_filing, start))
    }
}

// ============================================================================
// Search
// ============================================================================

/// Running best over a slice of the grid; strictly greater replaces
#[derive(Debug, Clone, Copy, Default)]
struct SearchBest {
    best: Option<([MonthDuration; 2], i64)>,
    evaluated: usize,
}

impl SearchBest {
    fn consider(&mut self, filing_ages: [MonthDuration; 2], cents: i64) {
        self.evaluated += 1;
        match self.best {
            Some((_, best)) if cents <= best => {}
            _ => self.best = Some((filing_ages, cents)),
        }
    }

    fn merge(mut self, later: SearchBest) -> SearchBest {
        let evaluated = self.evaluated + later.evaluated;
        if let Some((ages, cents)) = later.best {
            self.consider(ages, cents);
        }
        self.evaluated = evaluated;
        self
    }
}

/// Exhaustive filing-age optimizer for one couple
pub struct StrategyOptimizer<'a> {
    couple: Couple<'a>,
    config: CalculationConfig,
}

impl<'a> StrategyOptimizer<'a> {
    pub fn new(couple: Couple<'a>, config: CalculationConfig) -> Self {
        Self { couple, config }
    }

    pub fn config(&self) -> &CalculationConfig {
        &self.config
    }

    /// Filing ages searched for each recipient, in the couple's order
    pub fn search_ranges(&self) -> [MonthDurationRange; 2] {
        let latest = MonthDuration::from_years_months(MAX_FILING_AGE_YEARS, 0);
        [0, 1].map(|i| {
            MonthDurationRange::new(
                earliest_filing(self.couple.recipients[i], self.config.current_date),
                latest,
            )
        })
    }

    pub fn optimize(&self) -> Result<OptimalStrategy> {
        let monthly_rate = monthly_discount_rate(self.config.annual_discount_rate)?;
        let ranges = self.search_ranges();
        if ranges.iter().any(MonthDurationRange::is_empty) {
            return Err(BenefitError::invalid_input(format!(
                "no filing ages left to search as of {}",
                self.config.current_date
            )));
        }

        let roles = self.couple.roles();
        info!(
            "Optimizing {} x {} filing ages ({:?}, rate {:.4})",
            ranges[roles.earner].len(),
            ranges[roles.dependent].len(),
            self.config.method,
            self.config.annual_discount_rate
        );

        let result = match self.config.method {
            OptimizerMethod::BruteForce => self.brute_force(&ranges, roles, monthly_rate),
            OptimizerMethod::Memoized => self.memoized(&ranges, roles, monthly_rate),
            OptimizerMethod::Parallel => self.parallel(&ranges, roles, monthly_rate),
        };

        let (filing_ages, cents) = result
            .best
            .ok_or_else(|| BenefitError::invalid_input("no filing strategies evaluated"))?;
        info!(
            "Best strategy: {} / {} worth {}",
            filing_ages[0],
            filing_ages[1],
            Money::from_cents(cents)
        );
        Ok(OptimalStrategy {
            filing_ages,
            npv: Money::from_cents(cents),
            evaluated: result.evaluated,
        })
    }

    fn filing_ages(roles: CoupleRoles, earner_age: MonthDuration, dependent_age: MonthDuration) -> [MonthDuration; 2] {
        let mut ages = [earner_age; 2];
        ages[roles.dependent] = dependent_age;
        ages
    }

    fn brute_force(&self, ranges: &[MonthDurationRange; 2], roles: CoupleRoles, monthly_rate: f64) -> SearchBest {
        let current = self.config.current_date;
        let mut best = SearchBest::default();
        for earner_age in ranges[roles.earner].iter() {
            for dependent_age in ranges[roles.dependent].iter() {
                let ages = Self::filing_ages(roles, earner_age, dependent_age);
                let npv = strategy_sum_total_periods(&self.couple, current, monthly_rate, ages);
                best.consider(ages, npv.cents());
            }
        }
        best
    }

    /// One earner row against every dependent age
    fn search_row<L: BenefitLookup, D: DiscountFactors>(
        &self,
        roles: CoupleRoles,
        lookup: &L,
        factors: &mut D,
        earner_age: MonthDuration,
        dependent_range: MonthDurationRange,
        scratch: &mut Vec<BenefitPeriod>,
    ) -> SearchBest {
        let mut best = SearchBest::default();
        for dependent_age in dependent_range.iter() {
            let ages = Self::filing_ages(roles, earner_age, dependent_age);
            scratch.clear();
            compose_periods(&self.couple, roles, lookup, ages, scratch);
            let cents = periods_npv_cents(scratch, self.config.current_date, factors).round() as i64;
            best.consider(ages, cents);
        }
        best
    }

    fn memoized(&self, ranges: &[MonthDurationRange; 2], roles: CoupleRoles, monthly_rate: f64) -> SearchBest {
        let lookup = MemoizedBenefits::new(&self.couple, roles, ranges);
        let mut cache = DiscountCache::new(monthly_rate);
        let mut scratch = Vec::with_capacity(6);

        let best = ranges[roles.earner]
            .iter()
            .map(|earner_age| {
                self.search_row(roles, &lookup, &mut cache, earner_age, ranges[roles.dependent], &mut scratch)
            })
            .fold(SearchBest::default(), SearchBest::merge);

        debug!(
            "Discount cache: {} entries, {} hits, {} misses ({:.1}% hit rate)",
            cache.len(),
            cache.cache_hits,
            cache.cache_misses,
            cache.hit_rate() * 100.0
        );
        best
    }

    fn parallel(&self, ranges: &[MonthDurationRange; 2], roles: CoupleRoles, monthly_rate: f64) -> SearchBest {
        let lookup = MemoizedBenefits::new(&self.couple, roles, ranges);
        let earner_ages: Vec<MonthDuration> = ranges[roles.earner].iter().collect();

        let rows: Vec<SearchBest> = earner_ages
            .par_iter()
            .map(|&earner_age| {
                let mut cache = DiscountCache::new(monthly_rate);
                let mut scratch = Vec::with_capacity(6);
                self.search_row(roles, &lookup, &mut cache, earner_age, ranges[roles.dependent], &mut scratch)
            })
            .collect();

        // Reduce in row order so ties resolve as in the sequential search
        rows.into_iter().fold(SearchBest::default(), SearchBest::merge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birthdate::Birthdate;
    use crate::strategy::npv::strategy_sum_cents;

    fn dollars(d: i64) -> Money {
        Money::from_cents(d * 100)
    }

    fn date(year: i32, month: i32) -> MonthDate {
        MonthDate::from_years_months(year, month)
    }

    fn age(years: i32, months: i32) -> MonthDuration {
        MonthDuration::from_years_months(years, months)
    }

    fn recipient(pia: i64, year: i32, month: u32, day: u32) -> Recipient {
        Recipient::with_pia(Birthdate::from_ymd(year, month, day).unwrap(), dollars(pia))
    }

    #[test]
    fn test_earliest_filing_future() {
        let r = recipient(1000, 1970, 5, 15);
        assert_eq!(earliest_filing(&r, date(2023, 0)), age(62, 1));

        let r = recipient(1000, 1970, 5, 2);
        assert_eq!(earliest_filing(&r, date(2023, 0)), age(62, 0));
    }

    #[test]
    fn test_earliest_filing_before_nra() {
        // 64 years 3 months old, NRA 67: can only file from now
        let r = recipient(1000, 1960, 0, 15);
        let current = r.birthdate().date_at_ssa_age(age(64, 3));
        assert_eq!(earliest_filing(&r, current), age(64, 3));
    }

    #[test]
    fn test_earliest_filing_retroactive() {
        let r = recipient(1000, 1960, 0, 15);
        // two months past NRA: backdate to NRA
        let current = r.birthdate().date_at_ssa_age(age(67, 2));
        assert_eq!(earliest_filing(&r, current), age(67, 0));

        // two years past NRA: six months at most
        let current = r.birthdate().date_at_ssa_age(age(69, 0));
        assert_eq!(earliest_filing(&r, current), age(68, 6));
    }

    #[test]
    fn test_methods_agree() {
        let a = recipient(2400, 1962, 3, 10);
        let b = recipient(900, 1964, 9, 1);
        let couple = Couple::new([&a, &b], [date(2045, 5), date(2052, 8)]);

        let results: Vec<_> = [
            OptimizerMethod::BruteForce,
            OptimizerMethod::Memoized,
            OptimizerMethod::Parallel,
        ]
        .iter()
        .map(|&method| {
            let config = CalculationConfig::discounted(date(2023, 0), 0.025).with_method(method);
            StrategyOptimizer::new(couple, config).optimize().unwrap()
        })
        .collect();

        assert_eq!(results[0], results[1]);
        assert_eq!(results[1], results[2]);
    }

    #[test]
    fn test_result_within_bounds_and_reproducible() {
        let a = recipient(1800, 1961, 6, 20);
        let b = recipient(700, 1963, 1, 11);
        let couple = Couple::new([&a, &b], [date(2046, 6), date(2055, 1)]);
        let current = date(2023, 0);
        let optimizer = StrategyOptimizer::new(couple, CalculationConfig::discounted(current, 0.02));
        let result = optimizer.optimize().unwrap();

        let ranges = optimizer.search_ranges();
        for i in 0..2 {
            assert!(ranges[i].contains(result.filing_ages[i]));
        }
        assert_eq!(result.evaluated, ranges[0].len() * ranges[1].len());

        let cents = strategy_sum_cents(&couple, current, 0.02, result.filing_ages).unwrap();
        assert_eq!(cents, result.npv.cents());
    }

    #[test]
    fn test_swapping_recipients_keeps_npv() {
        let a = recipient(2100, 1961, 2, 14);
        let b = recipient(800, 1962, 10, 3);
        let forward = Couple::new([&a, &b], [date(2041, 2), date(2049, 10)]);
        let config = CalculationConfig::discounted(date(2023, 0), 0.03);

        let result = StrategyOptimizer::new(forward, config.clone()).optimize().unwrap();
        let swapped = StrategyOptimizer::new(forward.swapped(), config).optimize().unwrap();

        assert_eq!(result.npv, swapped.npv);
        assert_eq!(result.filing_ages[0], swapped.filing_ages[1]);
        assert_eq!(result.filing_ages[1], swapped.filing_ages[0]);
    }

    #[test]
    fn test_long_lives_undiscounted_file_at_70() {
        let a = recipient(1000, 1960, 0, 15);
        let b = recipient(1000, 1960, 0, 15);
        let couple = Couple::new([&a, &b], [date(2060, 11), date(2060, 11)]);
        let result = optimal_strategy(couple, date(2023, 0), 0.0).unwrap();
        assert_eq!(result.filing_ages, [age(70, 0), age(70, 0)]);
    }

    #[test]
    fn test_too_old_to_search() {
        let a = recipient(1000, 1940, 0, 15);
        let b = recipient(1000, 1960, 0, 15);
        let couple = Couple::new([&a, &b], [date(2030, 0), date(2045, 0)]);
        assert!(optimal_strategy(couple, date(2023, 0), 0.0).is_err());
    }

    #[test]
    fn test_memoized_lookup_matches_direct() {
        let a = recipient(2400, 1962, 3, 10);
        let b = recipient(0, 1964, 9, 1);
        let couple = Couple::new([&a, &b], [date(2045, 5), date(2052, 8)]);
        let roles = couple.roles();
        let optimizer = StrategyOptimizer::new(couple, CalculationConfig::undiscounted(date(2023, 0)));
        let ranges = optimizer.search_ranges();
        let memo = MemoizedBenefits::new(&couple, roles, &ranges);
        let direct = DirectBenefits::new(&couple, roles);

        for (i, j) in [(0, 0), (5, 40), (95, 3), (30, 30)] {
            let ages = [ranges[0].index_to_duration(i), ranges[1].index_to_duration(j)];
            let mut left = Vec::new();
            let mut right = Vec::new();
            compose_periods(&couple, roles, &memo, ages, &mut left);
            compose_periods(&couple, roles, &direct, ages, &mut right);
            assert_eq!(left, right);
        }
    }
}
