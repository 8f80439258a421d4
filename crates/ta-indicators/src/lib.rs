//! Technical indicators over candlestick series.
//!
//! This crate provides position-aligned implementations of:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, Stochastic)
//! - Trend indicators (MACD)
//! - Volatility indicators (ATR, Bollinger Bands)
//!
//! Every series has one entry per input candle, with `None` during warm-up.
//! [`compute_all`] runs the whole set with default parameters, and
//! [`StreamingEngine`] produces the same values one candle at a time.

pub mod engine;
pub mod momentum;
pub mod moving_average;
pub mod simd;
pub mod smoothing;
pub mod streaming;
pub mod trend;
pub mod volatility;

pub use engine::{compute_all, EngineSettings, IndicatorBundle, IndicatorEngine, IndicatorSnapshot};
pub use momentum::{Rsi, Stochastic, StochasticPoint, StochasticSeries};
pub use moving_average::{ema_of, sma_of, Ema, Sma};
pub use smoothing::EPSILON;
pub use streaming::StreamingEngine;
pub use trend::{Macd, MacdPoint, MacdSeries};
pub use volatility::{Atr, BollingerBands, BollingerPoint, BollingerSeries};
