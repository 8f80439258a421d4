//! Trend indicators.

use serde::{Deserialize, Serialize};

use ta_core::traits::{Indicator, StreamingIndicator};
use ta_core::types::{Candle, IndicatorSeries};

use crate::moving_average::{ema_of, Ema, StreamingEma};

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    /// MACD line (fast EMA - slow EMA)
    pub macd: IndicatorSeries,
    /// Signal line (EMA of MACD)
    pub signal: IndicatorSeries,
    /// Histogram (MACD - Signal)
    pub histogram: IndicatorSeries,
}

impl MacdSeries {
    pub fn point_at(&self, index: usize) -> MacdPoint {
        MacdPoint {
            macd: self.macd.get(index),
            signal: self.signal.get(index),
            histogram: self.histogram.get(index),
        }
    }
}

/// MACD values at a single position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum. The signal line
/// is an EMA over the MACD line itself, so it needs `signal - 1` more
/// positions of warm-up after the slow EMA is seeded.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Macd {
    type Output = MacdSeries;

    fn calculate(&self, candles: &[Candle]) -> MacdSeries {
        let fast = Ema::new(self.fast_period).calculate(candles);
        let slow = Ema::new(self.slow_period).calculate(candles);

        let macd = fast.zip_with(&slow, |f, s| f - s);
        let signal = ema_of(macd.values(), self.signal_period);
        let histogram = macd.zip_with(&signal, |m, s| m - s);

        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }

    fn warmup(&self) -> usize {
        (self.slow_period - 1) + (self.signal_period - 1)
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Streaming MACD.
#[derive(Debug, Clone)]
pub struct StreamingMacd {
    fast: StreamingEma,
    slow: StreamingEma,
    signal: StreamingEma,
}

impl StreamingMacd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast: StreamingEma::new(fast),
            slow: StreamingEma::new(slow),
            signal: StreamingEma::new(signal),
        }
    }
}

impl StreamingIndicator for StreamingMacd {
    type Output = MacdPoint;

    fn update(&mut self, candle: &Candle) -> MacdPoint {
        let fast = self.fast.update(candle);
        let slow = self.slow.update(candle);

        let macd = fast.zip(slow).map(|(f, s)| f - s);
        let signal = self.signal.update_value(macd);
        let histogram = macd.zip(signal).map(|(m, s)| m - s);

        MacdPoint {
            macd,
            signal,
            histogram,
        }
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
    }

    fn is_ready(&self) -> bool {
        self.signal.is_ready()
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
