//! Published SSA reference tables
//!
//! Each table is keyed by calendar year. Lookups outside the published range
//! go through [`YearTable::clamped`], which falls back to the nearest
//! published year.

use crate::money::Money;
use crate::month_time::MonthDuration;

/// Latest year covered by the earnings tables
pub const MAX_YEAR: i32 = 2023;

/// Credits needed for retirement eligibility
pub const MAX_CREDITS: u32 = 40;

/// Credits earnable in a single year
pub const MAX_CREDITS_PER_YEAR: u32 = 4;

/// Number of highest-earning years averaged into AIME
pub const SSA_EARNINGS_YEARS: usize = 35;

/// Latest age at which filing still earns delayed credits
pub const MAX_FILING_AGE_YEARS: i32 = 70;

/// Before 1978 a credit was earned per quarter with $50 of wages
pub const EARNINGS_PER_CREDIT_BEFORE_1978: Money = Money::from_cents(50_00);

pub const BENDPOINT1_IN_1977: Money = Money::from_cents(180_00);
pub const BENDPOINT2_IN_1977: Money = Money::from_cents(1085_00);
pub const BEFORE_BENDPOINT1_MULTIPLIER: f64 = 0.9;
pub const BEFORE_BENDPOINT2_MULTIPLIER: f64 = 0.32;
pub const AFTER_BENDPOINT2_MULTIPLIER: f64 = 0.15;

/// Year the bend points are defined against
pub const BENDPOINT_BASE_YEAR: i32 = 1977;

// ============================================================================
// Year table
// ============================================================================

/// Contiguous year-indexed table
#[derive(Debug, Clone, Copy)]
pub struct YearTable<T: 'static> {
    first_year: i32,
    values: &'static [T],
}

impl<T: Copy> YearTable<T> {
    pub const fn new(first_year: i32, values: &'static [T]) -> Self {
        Self { first_year, values }
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn last_year(&self) -> i32 {
        self.first_year + self.values.len() as i32 - 1
    }

    /// Value for exactly `year`, if published
    pub fn get(&self, year: i32) -> Option<T> {
        if year < self.first_year {
            return None;
        }
        self.values.get((year - self.first_year) as usize).copied()
    }

    /// Value for `year`, falling back to the nearest published year
    pub fn clamped(&self, year: i32) -> T {
        let clamped = clamp_year(year, self.first_year(), self.last_year());
        if clamped != year {
            log::trace!("year {} outside table {}..={}, using {}", year, self.first_year(), self.last_year(), clamped);
        }
        self.values[(clamped - self.first_year) as usize]
    }
}

/// Shared nearest-published-year rule
pub fn clamp_year(year: i32, first_year: i32, last_year: i32) -> i32 {
    year.clamp(first_year, last_year)
}

const fn dollars(d: i64) -> Money {
    Money::from_cents(d * 100)
}

// ============================================================================
// Earnings tables
// ============================================================================

/// Earnings required per credit, 1978 onward
pub const EARNINGS_PER_CREDIT: YearTable<Money> = YearTable::new(
    1978,
    &[
        dollars(250), dollars(260), dollars(290), dollars(310), dollars(340), // 1978
        dollars(370), dollars(390), dollars(410), dollars(440), dollars(460), // 1983
        dollars(470), dollars(500), dollars(520), dollars(540), dollars(570), // 1988
        dollars(590), dollars(620), dollars(630), dollars(640), dollars(670), // 1993
        dollars(700), dollars(740), dollars(780), dollars(830), dollars(870), // 1998
        dollars(890), dollars(900), dollars(920), dollars(970), dollars(1000), // 2003
        dollars(1050), dollars(1090), dollars(1120), dollars(1120), dollars(1130), // 2008
        dollars(1160), dollars(1200), dollars(1220), dollars(1260), dollars(1300), // 2013
        dollars(1320), dollars(1360), dollars(1410), dollars(1470), dollars(1510), // 2018
        dollars(1640), // 2023
    ],
);

/// Maximum taxable earnings
pub const MAXIMUM_EARNINGS: YearTable<Money> = YearTable::new(
    1937,
    &[
        dollars(3000), dollars(3000), dollars(3000), dollars(3000), dollars(3000), // 1937
        dollars(3000), dollars(3000), dollars(3000), dollars(3000), dollars(3000), // 1942
        dollars(3000), dollars(3000), dollars(3000), dollars(3000), // 1947
        dollars(3600), dollars(3600), dollars(3600), dollars(3600), // 1951
        dollars(4200), dollars(4200), dollars(4200), dollars(4200), // 1955
        dollars(4800), dollars(4800), dollars(4800), dollars(4800), dollars(4800), // 1959
        dollars(4800), dollars(4800), // 1964
        dollars(6600), dollars(6600), // 1966
        dollars(7800), dollars(7800), dollars(7800), dollars(7800), // 1968
        dollars(9000), dollars(10800), dollars(13200), dollars(14100), dollars(15300), // 1972
        dollars(16500), dollars(17700), dollars(22900), dollars(25900), dollars(29700), // 1977
        dollars(32400), dollars(35700), dollars(37800), dollars(39600), dollars(42000), // 1982
        dollars(43800), dollars(45000), dollars(48000), dollars(51300), dollars(53400), // 1987
        dollars(55500), dollars(57600), dollars(60600), dollars(61200), dollars(62700), // 1992
        dollars(65400), dollars(68400), dollars(72600), dollars(76200), dollars(80400), // 1997
        dollars(84900), dollars(87000), dollars(87900), dollars(90000), dollars(94200), // 2002
        dollars(97500), dollars(102000), dollars(106800), dollars(106800), dollars(106800), // 2007
        dollars(110100), dollars(113700), dollars(117000), dollars(118500), dollars(118500), // 2012
        dollars(127200), dollars(128400), dollars(132900), dollars(137700), dollars(142800), // 2017
        dollars(147000), dollars(160200), // 2022
    ],
);

/// Combined employee OASDI tax rate
pub const TAX_RATES: YearTable<f64> = YearTable::new(
    1956,
    &[
        0.02, 0.02, 0.02, 0.0225, 0.0275, 0.0275, 0.02875, 0.03375, 0.03375, 0.03375, // 1956
        0.035, 0.0355, 0.03325, 0.03725, 0.0365, 0.0405, 0.0405, 0.043, 0.04375, 0.04375, // 1966
        0.04375, 0.04375, 0.04275, 0.0433, 0.052, 0.047, 0.04575, 0.04775, 0.052, 0.052, // 1976
        0.052, 0.052, 0.0553, 0.0553, 0.056, 0.056, 0.056, 0.056, 0.0526, 0.0526, // 1986
        0.0526, 0.0535, 0.0535, 0.0535, 0.053, 0.053, 0.053, 0.053, 0.053, 0.053, // 1996
        0.053, 0.053, 0.053, 0.053, 0.053, 0.053, 0.053, 0.053, 0.053, 0.053, // 2006
        0.0515, 0.0515, 0.0515, 0.053, 0.053, 0.053, 0.053, 0.053, // 2016
    ],
);

// ============================================================================
// Wage indexing and COLA
// ============================================================================

pub const MIN_WAGE_INDEX_YEAR: i32 = 1951;
pub const MAX_WAGE_INDEX_YEAR: i32 = 2021;

/// National average wage index
pub const WAGE_INDICES: YearTable<f64> = YearTable::new(
    MIN_WAGE_INDEX_YEAR,
    &[
        2799.16, 2973.32, 3139.44, 3155.64, 3301.44, 3532.36, 3641.72, 3673.80, 3855.80, 4007.12, // 1951
        4086.76, 4291.40, 4396.64, 4576.32, 4658.72, 4938.36, 5213.44, 5571.76, 5893.76, 6186.24, // 1961
        6497.08, 7133.80, 7580.16, 8030.76, 8630.92, 9226.48, 9779.44, 10556.03, 11479.46, 12513.46, // 1971
        13773.10, 14531.34, 15239.24, 16135.07, 16822.51, 17321.82, 18426.51, 19334.04, 20099.55, 21027.98, // 1981
        21811.60, 22935.42, 23132.67, 23753.53, 24705.66, 25913.90, 27426.00, 28861.44, 30469.84, 32154.82, // 1991
        32921.92, 33252.09, 34064.95, 35648.55, 36952.94, 38651.41, 40405.48, 41334.97, 40711.61, 41673.83, // 2001
        42979.61, 44321.67, 44888.16, 46481.52, 48098.63, 48642.15, 50321.89, 52145.80, 54099.99, 55628.60, // 2011
        60575.07, // 2021
    ],
);

pub const MAX_COLA_YEAR: i32 = 2022;

/// Cost of living adjustment percentages, applied in December of each year
pub const COLA: YearTable<f64> = YearTable::new(
    1975,
    &[
        8.0, 6.4, 5.9, 6.5, 9.9, 14.3, 11.2, 7.4, 3.5, 3.5, // 1975
        3.1, 1.3, 4.2, 4.0, 4.7, 5.4, 3.7, 3.0, 2.6, 2.8, // 1985
        2.6, 2.9, 2.1, 1.3, 2.5, 3.5, 2.6, 1.4, 2.1, 2.7, // 1995
        4.1, 3.3, 2.3, 5.8, 0.0, 0.0, 3.6, 1.7, 1.5, 1.7, // 2005
        0.0, 0.3, 2.0, 2.8, 1.6, 1.3, 5.9, 8.7, // 2015
    ],
);

// ============================================================================
// Retirement age bands
// ============================================================================

/// Normal retirement age for a range of SSA birth years, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetirementAgeBand {
    pub min_year: i32,
    pub max_year: i32,
    pub age_years: i32,
    pub age_months: i32,
    /// Annual delayed retirement credit
    pub delayed_increase: f64,
}

impl RetirementAgeBand {
    const fn new(min_year: i32, max_year: i32, age_years: i32, age_months: i32, delayed_increase: f64) -> Self {
        Self {
            min_year,
            max_year,
            age_years,
            age_months,
            delayed_increase,
        }
    }

    pub fn age(&self) -> MonthDuration {
        MonthDuration::from_years_months(self.age_years, self.age_months)
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.min_year && year <= self.max_year
    }
}

pub const FULL_RETIREMENT_AGE: [RetirementAgeBand; 13] = [
    RetirementAgeBand::new(0, 1937, 65, 0, 0.065),
    RetirementAgeBand::new(1938, 1938, 65, 2, 0.065),
    RetirementAgeBand::new(1939, 1939, 65, 4, 0.07),
    RetirementAgeBand::new(1940, 1940, 65, 6, 0.07),
    RetirementAgeBand::new(1941, 1941, 65, 8, 0.075),
    RetirementAgeBand::new(1942, 1942, 65, 10, 0.075),
    RetirementAgeBand::new(1943, 1954, 66, 0, 0.08),
    RetirementAgeBand::new(1955, 1955, 66, 2, 0.08),
    RetirementAgeBand::new(1956, 1956, 66, 4, 0.08),
    RetirementAgeBand::new(1957, 1957, 66, 6, 0.08),
    RetirementAgeBand::new(1958, 1958, 66, 8, 0.08),
    RetirementAgeBand::new(1959, 1959, 66, 10, 0.08),
    RetirementAgeBand::new(1960, 10000, 67, 0, 0.08),
];

/// Band for an SSA birth year; years outside every band use the nearest band
pub fn full_retirement_age_band(ssa_birth_year: i32) -> RetirementAgeBand {
    let first = FULL_RETIREMENT_AGE[0];
    let last = FULL_RETIREMENT_AGE[FULL_RETIREMENT_AGE.len() - 1];
    let year = clamp_year(ssa_birth_year, first.min_year, last.max_year);
    FULL_RETIREMENT_AGE
        .iter()
        .copied()
        .find(|band| band.contains(year))
        .unwrap_or(last)
}

/// Survivor normal retirement age by SSA birth year
pub fn survivor_normal_retirement_age(ssa_birth_year: i32) -> MonthDuration {
    let (years, months) = match ssa_birth_year {
        y if y <= 1939 => (65, 0),
        1940 => (65, 2),
        1941 => (65, 4),
        1942 => (65, 6),
        1943 => (65, 8),
        1944 => (65, 10),
        1945..=1956 => (66, 0),
        1957 => (66, 2),
        1958 => (66, 4),
        1959 => (66, 6),
        1960 => (66, 8),
        1961 => (66, 10),
        _ => (67, 0),
    };
    MonthDuration::from_years_months(years, months)
}
