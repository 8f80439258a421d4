//! Error types for the indicator engine.
//!
//! The calculators themselves never fail on short or degenerate input; these
//! errors cover the surfaces around them (parameters, data loading, configuration).

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum TaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),
}

/// Candle source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("No candles available")]
    NoDataAvailable,

    #[error("Parse error at record {record}: {message}")]
    ParseError { record: usize, message: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Indicator parameter errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Series length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

impl IndicatorError {
    /// Shorthand for a zero period.
    pub fn zero_period(name: &'static str) -> Self {
        IndicatorError::InvalidParameter {
            name,
            reason: "period must be greater than 0".to_string(),
        }
    }
}

/// Result type alias for engine operations.
pub type TaResult<T> = Result<T, TaError>;
