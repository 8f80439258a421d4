//! Momentum indicators.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use ta_core::traits::{Indicator, StreamingIndicator};
use ta_core::types::{Candle, IndicatorSeries};

use crate::moving_average::{sma_of, StreamingSma};
use crate::simd::{mean_simd, minmax_simd};
use crate::smoothing::{gain_loss, percent_k, rsi_from_averages, wilder_step};

/// Relative Strength Index (RSI).
///
/// Wilder-smoothed ratio of average gains to average losses. The average
/// loss is floored at [`EPSILON`](crate::smoothing::EPSILON), so a flat series
/// reads 0 and an all-gains series reads just under 100.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = IndicatorSeries;

    fn calculate(&self, candles: &[Candle]) -> IndicatorSeries {
        let mut result = IndicatorSeries::undefined(candles.len());
        if candles.len() <= self.period {
            return result;
        }

        // changes[j] belongs to candle j + 1
        let (gains, losses): (Vec<f64>, Vec<f64>) = candles
            .windows(2)
            .map(|w| gain_loss(w[1].close - w[0].close))
            .unzip();

        let mut avg_gain = mean_simd(&gains[..self.period]);
        let mut avg_loss = mean_simd(&losses[..self.period]);
        result.set(self.period, rsi_from_averages(avg_gain, avg_loss));

        for i in (self.period + 1)..candles.len() {
            avg_gain = wilder_step(avg_gain, gains[i - 1], self.period);
            avg_loss = wilder_step(avg_loss, losses[i - 1], self.period);
            result.set(i, rsi_from_averages(avg_gain, avg_loss));
        }

        result
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticSeries {
    /// %K (smoothed)
    pub k: IndicatorSeries,
    /// %D (signal, SMA of %K)
    pub d: IndicatorSeries,
}

impl StochasticSeries {
    pub fn point_at(&self, index: usize) -> StochasticPoint {
        StochasticPoint {
            k: self.k.get(index),
            d: self.d.get(index),
        }
    }
}

/// Stochastic values at a single position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticPoint {
    pub k: Option<f64>,
    pub d: Option<f64>,
}

/// Stochastic oscillator.
///
/// Compares the close to the high-low range over a period, then smooths the
/// raw %K into %K and %D with simple moving averages.
#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    smooth_k: usize,
    smooth_d: usize,
}

impl Stochastic {
    /// Create a new stochastic oscillator with default parameters (14, 3, 3).
    pub fn new() -> Self {
        Self::with_periods(14, 3, 3)
    }

    /// Create with custom periods.
    pub fn with_periods(period: usize, smooth_k: usize, smooth_d: usize) -> Self {
        assert!(period > 0 && smooth_k > 0 && smooth_d > 0);
        Self {
            period,
            smooth_k,
            smooth_d,
        }
    }

    /// Unsmoothed %K, defined from `period - 1`.
    pub fn raw_k(&self, candles: &[Candle]) -> IndicatorSeries {
        let mut raw = IndicatorSeries::undefined(candles.len());
        if candles.len() < self.period {
            return raw;
        }

        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();

        for i in (self.period - 1)..candles.len() {
            let start = i + 1 - self.period;
            let (Some((_, highest)), Some((lowest, _))) = (
                minmax_simd(&highs[start..=i]),
                minmax_simd(&lows[start..=i]),
            ) else {
                continue;
            };
            raw.set(i, percent_k(candles[i].close, lowest, highest));
        }

        raw
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Stochastic {
    type Output = StochasticSeries;

    fn calculate(&self, candles: &[Candle]) -> StochasticSeries {
        let raw = self.raw_k(candles);
        let k = sma_of(raw.values(), self.smooth_k);
        let d = sma_of(k.values(), self.smooth_d);
        StochasticSeries { k, d }
    }

    fn warmup(&self) -> usize {
        (self.period - 1) + (self.smooth_k - 1) + (self.smooth_d - 1)
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

/// Streaming RSI.
#[derive(Debug, Clone)]
pub struct StreamingRsi {
    period: usize,
    prev_close: Option<f64>,
    seed_gains: Vec<f64>,
    seed_losses: Vec<f64>,
    averages: Option<(f64, f64)>,
}

impl StreamingRsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            prev_close: None,
            seed_gains: Vec::with_capacity(period),
            seed_losses: Vec::with_capacity(period),
            averages: None,
        }
    }
}

impl StreamingIndicator for StreamingRsi {
    type Output = Option<f64>;

    fn update(&mut self, candle: &Candle) -> Option<f64> {
        let prev = self.prev_close.replace(candle.close)?;
        let (gain, loss) = gain_loss(candle.close - prev);

        let (avg_gain, avg_loss) = match self.averages {
            Some((avg_gain, avg_loss)) => (
                wilder_step(avg_gain, gain, self.period),
                wilder_step(avg_loss, loss, self.period),
            ),
            None => {
                self.seed_gains.push(gain);
                self.seed_losses.push(loss);
                if self.seed_gains.len() < self.period {
                    return None;
                }
                (mean_simd(&self.seed_gains), mean_simd(&self.seed_losses))
            }
        };

        self.averages = Some((avg_gain, avg_loss));
        Some(rsi_from_averages(avg_gain, avg_loss))
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.seed_gains.clear();
        self.seed_losses.clear();
        self.averages = None;
    }

    fn is_ready(&self) -> bool {
        self.averages.is_some()
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// Streaming stochastic oscillator.
#[derive(Debug, Clone)]
pub struct StreamingStochastic {
    period: usize,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    k: StreamingSma,
    d: StreamingSma,
}

impl StreamingStochastic {
    pub fn new(period: usize, smooth_k: usize, smooth_d: usize) -> Self {
        assert!(period > 0 && smooth_k > 0 && smooth_d > 0);
        Self {
            period,
            highs: VecDeque::with_capacity(period),
            lows: VecDeque::with_capacity(period),
            k: StreamingSma::new(smooth_k),
            d: StreamingSma::new(smooth_d),
        }
    }

    fn raw_k(&mut self, candle: &Candle) -> Option<f64> {
        if self.highs.len() == self.period {
            self.highs.pop_front();
            self.lows.pop_front();
        }
        self.highs.push_back(candle.high);
        self.lows.push_back(candle.low);

        if self.highs.len() < self.period {
            return None;
        }
        let (_, highest) = minmax_simd(self.highs.make_contiguous())?;
        let (lowest, _) = minmax_simd(self.lows.make_contiguous())?;
        Some(percent_k(candle.close, lowest, highest))
    }
}

impl StreamingIndicator for StreamingStochastic {
    type Output = StochasticPoint;

    fn update(&mut self, candle: &Candle) -> StochasticPoint {
        let raw = self.raw_k(candle);
        let k = self.k.update_value(raw);
        let d = self.d.update_value(k);
        StochasticPoint { k, d }
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.k.reset();
        self.d.reset();
    }

    fn is_ready(&self) -> bool {
        self.d.is_ready()
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(i as i64, c, c, c, c, 0.0))
            .collect()
    }

    #[test]
    fn test_rsi_basic() {
        // Alternating up/down moves
        let closes: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();
        let result = Rsi::new(14).calculate(&candles_from_closes(&closes));

        assert_eq!(result.len(), 30);
        assert_eq!(result.first_defined(), Some(14));
        for (_, value) in result.defined() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let result = Rsi::new(5).calculate(&candles);

        // Zero losses are floored at epsilon: RS = 1 / 0.0001
        let expected = 100.0 - 100.0 / 10001.0;
        assert!((result.get(5).unwrap() - expected).abs() < 1e-10);
        assert!((result.get(6).unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let candles = candles_from_closes(&[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        let result = Rsi::new(5).calculate(&candles);

        // All losses = RSI should be 0
        assert!(result.get(5).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_prices_read_zero() {
        let candles = candles_from_closes(&[50.0; 30]);
        let result = Rsi::new(14).calculate(&candles);

        for i in 0..14 {
            assert!(result[i].is_none());
        }
        for i in 14..30 {
            assert_eq!(result.get(i), Some(0.0));
        }
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        // period 2: changes +2, -1, +3
        let candles = candles_from_closes(&[10.0, 12.0, 11.0, 14.0]);
        let result = Rsi::new(2).calculate(&candles);

        // seed: avg_gain = 1.0, avg_loss = 0.5 -> RS = 2 -> RSI = 66.67
        assert!((result.get(2).unwrap() - 200.0 / 3.0).abs() < 1e-10);
        // avg_gain = (1*1 + 3)/2 = 2, avg_loss = (0.5*1 + 0)/2 = 0.25 -> RS = 8
        assert!((result.get(3).unwrap() - (100.0 - 100.0 / 9.0)).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        let result = Rsi::new(3).calculate(&candles);

        assert_eq!(result.len(), 3);
        assert!(result.first_defined().is_none());
    }

    #[test]
    fn test_stochastic_basic() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.4).sin() * 8.0;
                Candle::new(i, base, base + 5.0, base - 5.0, base + 1.0, 10.0)
            })
            .collect();

        let result = Stochastic::new().calculate(&candles);
        assert_eq!(result.k.len(), 30);
        assert_eq!(result.d.len(), 30);
        assert_eq!(result.k.first_defined(), Some(15));
        assert_eq!(result.d.first_defined(), Some(17));

        for (_, k) in result.k.defined() {
            assert!((0.0..=100.0).contains(&k));
        }
        for (_, d) in result.d.defined() {
            assert!((0.0..=100.0).contains(&d));
        }
    }

    #[test]
    fn test_stochastic_at_high() {
        // Close at highs
        let candles: Vec<Candle> = (0..8)
            .map(|i| {
                let high = 10.0 + i as f64;
                Candle::new(i, high - 1.0, high, high - 5.0, high, 1.0)
            })
            .collect();

        let result = Stochastic::with_periods(5, 3, 3).calculate(&candles);
        // Close at high = %K should be 100
        assert!((result.k.last().unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_stochastic_smoothing_windows() {
        let candles: Vec<Candle> = (0..40)
            .map(|i| {
                let close = 50.0 + (i as f64 * 0.4).sin() * 8.0 + (i % 5) as f64;
                let high = close + 1.0 + (i % 3) as f64;
                let low = close - 1.5 - (i % 4) as f64 * 0.5;
                Candle::new(i, close, high, low, close, 1.0)
            })
            .collect();

        // Raw %K straight from the definition
        let raw: Vec<f64> = (13..40)
            .map(|i| {
                let window = &candles[i - 13..=i];
                let highest = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
                let lowest = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
                (candles[i].close - lowest) / (highest - lowest) * 100.0
            })
            .collect();

        let result = Stochastic::new().calculate(&candles);

        for i in 15..40 {
            let j = i - 13;
            let expected_k = (raw[j - 2] + raw[j - 1] + raw[j]) / 3.0;
            assert!((result.k.get(i).unwrap() - expected_k).abs() < 1e-10);
        }
        for i in 17..40 {
            let k = |idx: usize| result.k.get(idx).unwrap();
            let expected_d = (k(i - 2) + k(i - 1) + k(i)) / 3.0;
            assert!((result.d.get(i).unwrap() - expected_d).abs() < 1e-10);
        }
    }

    #[test]
    fn test_stochastic_flat_range() {
        let candles = candles_from_closes(&[42.0; 20]);
        let stoch = Stochastic::with_periods(5, 3, 3);

        let raw = stoch.raw_k(&candles);
        assert_eq!(raw.first_defined(), Some(4));
        assert_eq!(raw.get(10), Some(0.0));

        let result = stoch.calculate(&candles);
        assert_eq!(result.d.get(19), Some(0.0));
    }

    #[test]
    fn test_streaming_matches_batch() {
        let candles: Vec<Candle> = (0..60)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.25).sin() * 6.0;
                Candle::new(i, close, close + 1.5, close - 2.0, close, 5.0)
            })
            .collect();

        let rsi = Rsi::new(14).calculate(&candles);
        let stoch = Stochastic::new().calculate(&candles);
        let mut streaming_rsi = StreamingRsi::new(14);
        let mut streaming_stoch = StreamingStochastic::new(14, 3, 3);

        for (i, candle) in candles.iter().enumerate() {
            assert_eq!(streaming_rsi.update(candle), rsi[i]);
            assert_eq!(streaming_stoch.update(candle), stoch.point_at(i));
        }
        assert!(streaming_rsi.is_ready());
        assert!(streaming_stoch.is_ready());
    }
}
