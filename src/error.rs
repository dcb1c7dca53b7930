//! Error types for the benefit engine

use thiserror::Error;

/// Errors raised by benefit calculations and input loading
#[derive(Debug, Error)]
pub enum BenefitError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid birthdate {field}: {value}")]
    InvalidBirthdate { field: &'static str, value: i64 },

    #[error("Indexing year has not been set for earning record {year}")]
    UnsetIndexingYear { year: i32 },

    #[error("Invalid PIA bracket: {0}")]
    InvalidBracket(usize),

    #[error("PIA override conflict: {0}")]
    PiaOverride(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BenefitError {
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        BenefitError::InvalidAmount(message.into())
    }

    pub fn pia_override(message: impl Into<String>) -> Self {
        BenefitError::PiaOverride(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        BenefitError::InvalidInput(message.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BenefitError>;
