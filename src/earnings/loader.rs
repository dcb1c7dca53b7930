//! Load earnings records from CSV or JSON
//!
//! CSV columns: `Year`, `TaxedEarnings`, optional `TaxedMedicareEarnings`
//! and optional `Incomplete`. Dollar columns accept `$12,345.67` style text;
//! anything unparseable is read as zero so one bad row never aborts an import.

use super::EarningRecord;
use crate::error::Result;
use crate::money::Money;
use csv::{Reader, ReaderBuilder, Trim};
use std::path::Path;

/// Raw CSV row matching the earnings export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "TaxedEarnings")]
    taxed_earnings: String,
    #[serde(rename = "TaxedMedicareEarnings", default)]
    taxed_medicare_earnings: Option<String>,
    #[serde(rename = "Incomplete", default)]
    incomplete: Option<String>,
}

impl CsvRow {
    fn to_record(self) -> EarningRecord {
        let taxed = parse_dollars(&self.taxed_earnings, self.year);
        let medicare = self
            .taxed_medicare_earnings
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_dollars(s, self.year))
            .unwrap_or(taxed);
        let incomplete = matches!(
            self.incomplete.as_deref().map(|s| s.trim().to_ascii_lowercase()).as_deref(),
            Some("true") | Some("yes") | Some("1")
        );

        let mut record = EarningRecord::new(self.year, taxed, medicare);
        record.incomplete = incomplete;
        record
    }
}

/// Parse a dollar string, falling back to zero
fn parse_dollars(text: &str, year: i32) -> Money {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    match cleaned.parse::<f64>().ok().and_then(|d| Money::from_dollars(d).ok()) {
        Some(amount) => amount,
        None => {
            log::warn!("Unparseable earnings '{}' for {}, using $0", text, year);
            Money::zero()
        }
    }
}

/// Load earnings records from a CSV file, sorted by year
pub fn load_earnings_csv<P: AsRef<Path>>(path: P) -> Result<Vec<EarningRecord>> {
    let reader = ReaderBuilder::new().trim(Trim::All).from_path(path.as_ref())?;
    let records = collect_rows(reader)?;
    log::info!("Loaded {} earnings records from {}", records.len(), path.as_ref().display());
    Ok(records)
}

/// Load earnings records from any reader (e.g., string buffer, stdin)
pub fn read_earnings_csv<R: std::io::Read>(reader: R) -> Result<Vec<EarningRecord>> {
    collect_rows(ReaderBuilder::new().trim(Trim::All).from_reader(reader))
}

fn collect_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<EarningRecord>> {
    let mut records = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.to_record());
    }

    records.sort_by_key(|r| r.year);
    Ok(records)
}

/// Serialize records in their persistence shape
pub fn records_to_json(records: &[EarningRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

pub fn records_from_json(json: &str) -> Result<Vec<EarningRecord>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_earnings_csv() {
        let data = "\
Year,TaxedEarnings,TaxedMedicareEarnings,Incomplete
2021,\"$52,000.50\",\"$53,000\",
2019,\"41,000\",,
2020,not a number,,
2022,$10,$10,true
";
        let records = read_earnings_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);

        // sorted by year
        let years: Vec<i32> = records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2019, 2020, 2021, 2022]);

        assert_eq!(records[0].taxed_earnings, Money::from_cents(41_000_00));
        assert_eq!(records[0].taxed_medicare_earnings, Money::from_cents(41_000_00));
        assert_eq!(records[1].taxed_earnings, Money::zero());
        assert_eq!(records[2].taxed_earnings, Money::from_cents(52_000_50));
        assert_eq!(records[2].taxed_medicare_earnings, Money::from_cents(53_000_00));
        assert!(!records[2].incomplete);
        assert!(records[3].incomplete);
    }

    #[test]
    fn test_minimal_columns() {
        let data = "Year,TaxedEarnings\n1990,1000\n";
        let records = read_earnings_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].taxed_medicare_earnings, Money::from_cents(1_000_00));
    }

    #[test]
    fn test_padded_fields_are_trimmed() {
        let data = "Year , TaxedEarnings , TaxedMedicareEarnings\n 2020 , 50000 , 50000 \n";
        let records = read_earnings_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2020);
        assert_eq!(records[0].taxed_earnings, Money::from_cents(50_000_00));
        assert_eq!(records[0].taxed_medicare_earnings, Money::from_cents(50_000_00));
    }

    #[test]
    fn test_json_round_trip() {
        let records = vec![
            EarningRecord::new(2001, Money::from_cents(1_00), Money::from_cents(2_00)),
            EarningRecord::new(2002, Money::from_cents(3_00), Money::from_cents(4_00)).incomplete(),
        ];
        let json = records_to_json(&records).unwrap();
        assert!(json.contains("taxedMedicareEarningsCents"));
        assert_eq!(records_from_json(&json).unwrap(), records);
    }
}
