//! Core traits for the indicator engine.

mod candle_source;
mod indicator;

pub use candle_source::CandleSource;
pub use indicator::{Indicator, StreamingIndicator};
