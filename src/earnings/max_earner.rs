//! Synthetic history of someone who paid the maximum tax every year

use super::EarningRecord;
use crate::constants::{MAXIMUM_EARNINGS, MAX_YEAR};

/// Typical age for entering the workforce after college
pub const MAX_EARNER_START_AGE: i32 = 22;

/// Maximum taxable earnings from age 22 through the year before `end_year`
///
/// Years past the published earnings table are skipped.
pub fn max_earner_records(birth_year: i32, end_year: Option<i32>) -> Vec<EarningRecord> {
    let end_year = end_year.unwrap_or(MAX_YEAR);
    (birth_year + MAX_EARNER_START_AGE..end_year)
        .filter_map(|year| {
            MAXIMUM_EARNINGS
                .get(year)
                .map(|cap| EarningRecord::new(year, cap, cap))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_earner_records() {
        let records = max_earner_records(1960, None);
        assert_eq!(records.first().map(|r| r.year), Some(1982));
        assert_eq!(records.last().map(|r| r.year), Some(MAX_YEAR - 1));
        assert_eq!(records.len(), (MAX_YEAR - 1982) as usize);
        assert!(records.iter().all(|r| r.taxed_earnings == r.earnings_cap()));
    }

    #[test]
    fn test_end_year_past_table() {
        let records = max_earner_records(1990, Some(MAX_YEAR + 10));
        assert_eq!(records.last().map(|r| r.year), Some(MAX_YEAR));
    }
}
