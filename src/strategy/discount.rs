//! Discounting for strategy NPV
//!
//! Supports:
//! - Annual to monthly rate conversion: `(1 + annual)^(1/12) - 1`
//! - Ordinary annuity factor `(1 - (1+r)^-n) / r` for n level payments
//! - Discount-to-today factor `(1+r)^-k`
//! - A per-run memo of both factors keyed by month counts

use crate::error::{BenefitError, Result};

/// Convert an annual discount rate to the equivalent monthly rate
pub fn monthly_discount_rate(annual_rate: f64) -> Result<f64> {
    if !annual_rate.is_finite() || annual_rate <= -1.0 {
        return Err(BenefitError::invalid_input(format!(
            "discount rate {} must be a finite number above -100%",
            annual_rate
        )));
    }
    if annual_rate == 0.0 {
        Ok(0.0)
    } else {
        Ok((1.0 + annual_rate).powf(1.0 / 12.0) - 1.0)
    }
}

/// Source of present value factors at a fixed monthly rate
pub trait DiscountFactors {
    fn monthly_rate(&self) -> f64;

    /// PV of `n` level payments of 1, first payment one month out
    fn pv_factor(&mut self, n: i32) -> f64;

    /// Value today of 1 paid `k` months from now
    fn discount(&mut self, k: i32) -> f64;
}

/// Helper functions for present value calculations
pub struct PVCalculator;

impl PVCalculator {
    pub fn pv_annuity_ordinary(n_payments: i32, monthly_rate: f64) -> f64 {
        if monthly_rate == 0.0 {
            return n_payments as f64;
        }
        (1.0 - (1.0 + monthly_rate).powi(-n_payments)) / monthly_rate
    }

    pub fn discount_factor(months: i32, monthly_rate: f64) -> f64 {
        (1.0 + monthly_rate).powi(-months)
    }
}

/// Computes every factor on request
#[derive(Debug, Clone, Copy)]
pub struct DirectDiscount {
    monthly_rate: f64,
}

impl DirectDiscount {
    pub fn new(monthly_rate: f64) -> Self {
        Self { monthly_rate }
    }
}

impl DiscountFactors for DirectDiscount {
    fn monthly_rate(&self) -> f64 {
        self.monthly_rate
    }

    fn pv_factor(&mut self, n: i32) -> f64 {
        PVCalculator::pv_annuity_ordinary(n, self.monthly_rate)
    }

    fn discount(&mut self, k: i32) -> f64 {
        PVCalculator::discount_factor(k, self.monthly_rate)
    }
}

/// Memoized factors for one optimizer run
///
/// Keys are small non-negative month counts, so both memos are plain
/// vectors grown on demand. Negative keys bypass the memo.
#[derive(Debug, Clone, Default)]
pub struct DiscountCache {
    monthly_rate: f64,
    pv_factors: Vec<Option<f64>>,
    discounts: Vec<Option<f64>>,

    /// Statistics
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl DiscountCache {
    pub fn new(monthly_rate: f64) -> Self {
        Self {
            monthly_rate,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.pv_factors.iter().chain(self.discounts.iter()).filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    fn lookup(
        memo: &mut Vec<Option<f64>>,
        key: i32,
        hits: &mut u64,
        misses: &mut u64,
        compute: impl FnOnce() -> f64,
    ) -> f64 {
        if key < 0 {
            return compute();
        }
        let index = key as usize;
        if index >= memo.len() {
            memo.resize(index + 1, None);
        }
        match memo[index] {
            Some(value) => {
                *hits += 1;
                value
            }
            None => {
                *misses += 1;
                let value = compute();
                memo[index] = Some(value);
                value
            }
        }
    }
}

impl DiscountFactors for DiscountCache {
    fn monthly_rate(&self) -> f64 {
        self.monthly_rate
    }

    fn pv_factor(&mut self, n: i32) -> f64 {
        let rate = self.monthly_rate;
        Self::lookup(&mut self.pv_factors, n, &mut self.cache_hits, &mut self.cache_misses, || {
            PVCalculator::pv_annuity_ordinary(n, rate)
        })
    }

    fn discount(&mut self, k: i32) -> f64 {
        let rate = self.monthly_rate;
        Self::lookup(&mut self.discounts, k, &mut self.cache_hits, &mut self.cache_misses, || {
            PVCalculator::discount_factor(k, rate)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_discount_rate(0.0).unwrap(), 0.0);
        let monthly = monthly_discount_rate(0.05).unwrap();
        assert_relative_eq!((1.0 + monthly).powi(12), 1.05, epsilon = 1e-12);
        assert!(monthly_discount_rate(f64::NAN).is_err());
        assert!(monthly_discount_rate(-1.0).is_err());
    }

    #[test]
    fn test_pv_annuity() {
        // 12 payments at 0.5% per month
        let pv = PVCalculator::pv_annuity_ordinary(12, 0.005);
        assert!((pv - 11.6189).abs() < 1e-4);
        assert_eq!(PVCalculator::pv_annuity_ordinary(12, 0.0), 12.0);
        assert_relative_eq!(PVCalculator::discount_factor(12, 0.005), 1.005f64.powi(-12));
    }

    #[test]
    fn test_cache_matches_direct() {
        let rate = monthly_discount_rate(0.03).unwrap();
        let mut direct = DirectDiscount::new(rate);
        let mut cache = DiscountCache::new(rate);
        for n in [1, 12, 240, 12, 1] {
            assert_eq!(cache.pv_factor(n), direct.pv_factor(n));
            assert_eq!(cache.discount(n), direct.discount(n));
        }
        assert_eq!(cache.cache_misses, 6);
        assert_eq!(cache.cache_hits, 4);
        assert_eq!(cache.len(), 6);
        assert!((cache.hit_rate() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_cache_negative_keys_bypass_memo() {
        let mut cache = DiscountCache::new(0.01);
        let value = cache.discount(-3);
        assert_relative_eq!(value, 1.01f64.powi(3));
        assert!(cache.is_empty());
    }
}
