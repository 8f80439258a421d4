//! Core types and traits for the indicator engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Candle, CandleSeries)
//! - Position-aligned indicator output (IndicatorSeries)
//! - Core traits for indicators and candle sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{TaError, TaResult};
pub use types::*;
pub use traits::*;
