//! OHLCV candle types.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One OHLCV sample.
///
/// Candles are produced by the data-ingestion side and only ever borrowed
/// read-only by the indicator calculators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Candle {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl Candle {
    /// Create a new candle.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Candle range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// True range against the previous candle's close.
    ///
    /// `max(high - low, |high - prev_close|, |low - prev_close|)`
    #[inline]
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.range();
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// Whether `low <= open, close <= high` holds.
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.open
            && self.low <= self.close
            && self.open <= self.high
            && self.close <= self.high
    }
}

/// Rolling window of the most recent candles.
///
/// Mirrors the "recent candles" view the dashboard keeps for a symbol: once
/// `capacity` is reached the oldest candle is dropped on every push.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    candles: VecDeque<Candle>,
    /// Maximum capacity (0 = unlimited)
    capacity: usize,
}

impl CandleSeries {
    /// Create a series that keeps at most `capacity` candles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            candles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new candle, removing the oldest if at capacity.
    pub fn push(&mut self, candle: Candle) {
        if self.capacity > 0 && self.candles.len() >= self.capacity {
            self.candles.pop_front();
        }
        self.candles.push_back(candle);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Contiguous, oldest-first view suitable for the calculators.
    pub fn as_slice(&mut self) -> &[Candle] {
        self.candles.make_contiguous()
    }
}
