//! Earnings history: per-year records, CSV import and synthetic histories

mod record;
pub mod loader;
mod max_earner;

pub use record::{EarningRecord, EarningRecordData, UNSET_INDEXING_YEAR};
pub use loader::{load_earnings_csv, read_earnings_csv, records_from_json, records_to_json};
pub use max_earner::{max_earner_records, MAX_EARNER_START_AGE};
