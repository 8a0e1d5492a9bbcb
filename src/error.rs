//! Error types for travel_ppi

use thiserror::Error;

/// Main error type for travel_ppi
#[derive(Error, Debug)]
pub enum PpiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Rate provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Rate provider quota exhausted or no data for {date}")]
    QuotaExhausted { date: String },

    #[error("Insufficient data for {currency}: {available} records, need at least {required}")]
    InsufficientData {
        currency: String,
        available: usize,
        required: usize,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl PpiError {
    /// Errors that must abort the whole run rather than a single currency or country
    pub fn is_fatal(&self) -> bool {
        matches!(self, PpiError::ConfigError(_) | PpiError::ValidationError(_))
    }
}

/// Result type alias for travel_ppi operations
pub type Result<T> = std::result::Result<T, PpiError>;
