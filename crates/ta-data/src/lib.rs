//! Candle sources for the indicator engine.

mod csv_source;
mod validation;

pub use csv_source::CsvCandleSource;
pub use validation::{validate_candle, validate_candles, CandleIssue};
