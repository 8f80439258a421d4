//! Core data types for the indicator engine.

mod candle;
mod series;

pub use candle::{Candle, CandleSeries};
pub use series::IndicatorSeries;
