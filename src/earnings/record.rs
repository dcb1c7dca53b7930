//! One tax year of covered wages

use crate::constants::{
    EARNINGS_PER_CREDIT, EARNINGS_PER_CREDIT_BEFORE_1978, MAXIMUM_EARNINGS, MAX_CREDITS_PER_YEAR,
    MAX_WAGE_INDEX_YEAR, WAGE_INDICES,
};
use crate::error::{BenefitError, Result};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Sentinel for an indexing year that was never supplied
pub const UNSET_INDEXING_YEAR: i32 = -1;

/// Last year without a published wage index
const LAST_UNINDEXED_YEAR: i32 = 1950;

/// Earnings for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EarningRecordData", into = "EarningRecordData")]
pub struct EarningRecord {
    pub year: i32,

    /// OASDI taxed earnings
    pub taxed_earnings: Money,

    /// Medicare taxed earnings, carried for display only
    pub taxed_medicare_earnings: Money,

    /// Year not yet fully reported
    pub incomplete: bool,

    // ---- Annotations maintained by the owning recipient ----

    /// Counted among the recipient's highest 35 indexed years
    pub is_top35: bool,

    /// Recipient's SSA age at the end of this year
    pub age: i32,
}

/// Persistence shape for an earning record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningRecordData {
    pub year: i32,
    pub taxed_earnings_cents: i64,
    pub taxed_medicare_earnings_cents: i64,
    #[serde(default)]
    pub incomplete: bool,
}

impl EarningRecord {
    pub fn new(year: i32, taxed_earnings: Money, taxed_medicare_earnings: Money) -> Self {
        Self {
            year,
            taxed_earnings,
            taxed_medicare_earnings,
            incomplete: false,
            is_top35: false,
            age: -1,
        }
    }

    pub fn incomplete(mut self) -> Self {
        self.incomplete = true;
        self
    }

    /// Maximum taxable earnings for the record's year
    pub fn earnings_cap(&self) -> Money {
        MAXIMUM_EARNINGS.clamped(self.year)
    }

    pub fn earnings_required_per_credit(&self) -> Money {
        if self.year < EARNINGS_PER_CREDIT.first_year() {
            EARNINGS_PER_CREDIT_BEFORE_1978
        } else {
            EARNINGS_PER_CREDIT.clamped(self.year)
        }
    }

    /// Credits earned this year, at most four
    pub fn credits(&self) -> u32 {
        let per_credit = self.earnings_required_per_credit();
        if per_credit.is_zero() || self.taxed_earnings.cents() <= 0 {
            return 0;
        }
        let earned = self.taxed_earnings.cents() / per_credit.cents();
        (earned as u32).min(MAX_CREDITS_PER_YEAR)
    }

    /// Wage index ratio that brings this year's earnings to `indexing_year`
    pub fn index_factor(&self, indexing_year: i32) -> Result<f64> {
        if indexing_year < 0 {
            return Err(BenefitError::UnsetIndexingYear { year: self.year });
        }

        if self.year >= indexing_year {
            Ok(1.0)
        } else if self.year <= LAST_UNINDEXED_YEAR {
            Ok(0.0)
        } else if self.year > MAX_WAGE_INDEX_YEAR {
            Ok(1.0)
        } else {
            let effective_year = indexing_year.min(MAX_WAGE_INDEX_YEAR);
            Ok(WAGE_INDICES.clamped(effective_year) / WAGE_INDICES.clamped(self.year))
        }
    }

    /// Capped earnings times the index factor, rounded to the cent
    pub fn indexed_earnings(&self, indexing_year: i32) -> Result<Money> {
        let capped = Money::min(self.earnings_cap(), self.taxed_earnings);
        Ok(capped.times(self.index_factor(indexing_year)?))
    }
}

impl From<EarningRecordData> for EarningRecord {
    fn from(data: EarningRecordData) -> Self {
        let mut record = EarningRecord::new(
            data.year,
            Money::from_cents(data.taxed_earnings_cents),
            Money::from_cents(data.taxed_medicare_earnings_cents),
        );
        record.incomplete = data.incomplete;
        record
    }
}

impl From<EarningRecord> for EarningRecordData {
    fn from(record: EarningRecord) -> Self {
        Self {
            year: record.year,
            taxed_earnings_cents: record.taxed_earnings.cents(),
            taxed_medicare_earnings_cents: record.taxed_medicare_earnings.cents(),
            incomplete: record.incomplete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_YEAR, MIN_WAGE_INDEX_YEAR};

    fn test_record(year: i32, earnings: Money) -> EarningRecord {
        EarningRecord::new(year, earnings, earnings)
    }

    fn hundred_k(year: i32) -> EarningRecord {
        test_record(year, Money::from_cents(100_000_00))
    }

    #[test]
    fn test_earnings_cap() {
        assert_eq!(hundred_k(1900).earnings_cap(), MAXIMUM_EARNINGS.clamped(1937));
        assert_eq!(hundred_k(2010).earnings_cap(), Money::from_cents(106_800_00));
        assert_eq!(hundred_k(MAX_YEAR + 5).earnings_cap(), Money::from_cents(160_200_00));
    }

    #[test]
    fn test_credits() {
        // $50 per credit before 1978
        assert_eq!(test_record(1977, Money::from_cents(120_00)).credits(), 2);
        // $1000 per credit in 2007
        assert_eq!(test_record(2007, Money::from_cents(3_900_00)).credits(), 3);
        assert_eq!(hundred_k(2007).credits(), 4);
        assert_eq!(test_record(2007, Money::zero()).credits(), 0);
        assert_eq!(
            hundred_k(MAX_YEAR + 3).earnings_required_per_credit(),
            Money::from_cents(1_640_00)
        );
    }

    #[test]
    fn test_index_factor_after_indexing_year() {
        let record = hundred_k(2010);
        assert_eq!(record.index_factor(2000).unwrap(), 1.0);
        assert_eq!(record.indexed_earnings(2000).unwrap(), Money::from_cents(100_000_00));
    }

    #[test]
    fn test_index_factor_before_1951() {
        let record = hundred_k(MIN_WAGE_INDEX_YEAR - 1);
        assert_eq!(record.index_factor(1990).unwrap(), 0.0);
        assert_eq!(record.indexed_earnings(1990).unwrap(), Money::zero());
    }

    #[test]
    fn test_index_factor_future_wages() {
        let record = hundred_k(MAX_YEAR + 5);
        assert_eq!(record.index_factor(MAX_YEAR + 10).unwrap(), 1.0);
        assert_eq!(record.indexed_earnings(MAX_YEAR + 10).unwrap(), Money::from_cents(100_000_00));
    }

    #[test]
    fn test_indexed_earnings() {
        let record = hundred_k(2010);
        let expected_factor = 55628.60 / 41673.83;
        let factor = record.index_factor(2020).unwrap();
        assert!((factor - expected_factor).abs() < 1e-12);
        assert_eq!(
            record.indexed_earnings(2020).unwrap(),
            record.taxed_earnings.times(expected_factor)
        );
    }

    #[test]
    fn test_indexing_year_past_wage_table() {
        // Indexing years beyond the table use the latest published index
        let record = hundred_k(2010);
        assert_eq!(record.index_factor(2030).unwrap(), record.index_factor(MAX_WAGE_INDEX_YEAR).unwrap());
    }

    #[test]
    fn test_capped_earnings() {
        let record = test_record(MAX_YEAR + 5, Money::from_cents(106_800_00 * 2));
        assert_eq!(record.indexed_earnings(MAX_YEAR).unwrap(), MAXIMUM_EARNINGS.clamped(MAX_YEAR));
    }

    #[test]
    fn test_unset_indexing_year() {
        let record = hundred_k(2010);
        assert!(matches!(
            record.index_factor(UNSET_INDEXING_YEAR),
            Err(BenefitError::UnsetIndexingYear { year: 2010 })
        ));
        assert!(record.indexed_earnings(UNSET_INDEXING_YEAR).is_err());
    }

    #[test]
    fn test_serialization_shape() {
        let record = test_record(2019, Money::from_cents(12_345_67)).incomplete();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["year"], 2019);
        assert_eq!(json["taxedEarningsCents"], 1_234_567);
        assert_eq!(json["taxedMedicareEarningsCents"], 1_234_567);
        assert_eq!(json["incomplete"], true);

        let back: EarningRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
