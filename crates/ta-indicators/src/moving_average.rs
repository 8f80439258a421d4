//! Moving average indicators.

use std::collections::VecDeque;

use ta_core::traits::{Indicator, StreamingIndicator};
use ta_core::types::{Candle, IndicatorSeries};

use crate::simd::mean_simd;
use crate::smoothing::{ema_alpha, ema_step};

/// Close prices lifted into a value series.
pub(crate) fn closes(candles: &[Candle]) -> Vec<Option<f64>> {
    candles.iter().map(|c| Some(c.close)).collect()
}

/// Simple moving average of an aligned value series.
///
/// Position `i` is defined when all of `values[i + 1 - period..=i]` are.
pub fn sma_of(values: &[Option<f64>], period: usize) -> IndicatorSeries {
    assert!(period > 0, "Period must be greater than 0");

    let mut result = IndicatorSeries::undefined(values.len());
    let mut window = Vec::with_capacity(period);

    for i in (period - 1)..values.len() {
        window.clear();
        window.extend(values[i + 1 - period..=i].iter().map_while(|v| *v));
        if window.len() == period {
            result.set(i, mean_simd(&window));
        }
    }

    result
}

/// Exponential moving average of an aligned value series.
///
/// Seeds with the mean of the first run of `period` consecutive defined
/// values, placed at the last index of that run. Once seeded, an undefined
/// input leaves every later position undefined.
pub fn ema_of(values: &[Option<f64>], period: usize) -> IndicatorSeries {
    assert!(period > 0, "Period must be greater than 0");

    let alpha = ema_alpha(period);
    let mut result = IndicatorSeries::undefined(values.len());
    let mut prev: Option<f64> = None;
    let mut run = 0;

    for (i, value) in values.iter().enumerate() {
        match (prev, *value) {
            (Some(p), Some(v)) => {
                let ema = ema_step(p, v, alpha);
                result.set(i, ema);
                prev = Some(ema);
            }
            (Some(_), None) => break,
            (None, Some(_)) => {
                run += 1;
                if run == period {
                    let seed_window: Vec<f64> =
                        values[i + 1 - period..=i].iter().flatten().copied().collect();
                    let seed = mean_simd(&seed_window);
                    result.set(i, seed);
                    prev = Some(seed);
                }
            }
            (None, None) => run = 0,
        }
    }

    result
}

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N closes.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = IndicatorSeries;

    fn calculate(&self, candles: &[Candle]) -> IndicatorSeries {
        sma_of(&closes(candles), self.period)
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Gives more weight to recent prices using an exponential decay with
/// multiplier `2 / (period + 1)`, seeded by the SMA of the first `period` closes.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Ema {
    type Output = IndicatorSeries;

    fn calculate(&self, candles: &[Candle]) -> IndicatorSeries {
        ema_of(&closes(candles), self.period)
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Streaming SMA over a value stream.
#[derive(Debug, Clone)]
pub struct StreamingSma {
    period: usize,
    window: VecDeque<f64>,
    current: Option<f64>,
}

impl StreamingSma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            window: VecDeque::with_capacity(period),
            current: None,
        }
    }

    /// Feed the next value; an undefined value empties the window.
    pub fn update_value(&mut self, value: Option<f64>) -> Option<f64> {
        self.current = match value {
            Some(v) => {
                if self.window.len() == self.period {
                    self.window.pop_front();
                }
                self.window.push_back(v);
                (self.window.len() == self.period)
                    .then(|| mean_simd(self.window.make_contiguous()))
            }
            None => {
                self.window.clear();
                None
            }
        };
        self.current
    }

    pub fn current(&self) -> Option<f64> {
        self.current
    }
}

impl StreamingIndicator for StreamingSma {
    type Output = Option<f64>;

    fn update(&mut self, candle: &Candle) -> Option<f64> {
        self.update_value(Some(candle.close))
    }

    fn reset(&mut self) {
        self.window.clear();
        self.current = None;
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Streaming EMA that maintains state for incremental updates.
#[derive(Debug, Clone)]
pub struct StreamingEma {
    period: usize,
    multiplier: f64,
    seed: Vec<f64>,
    current: Option<f64>,
    exhausted: bool,
}

impl StreamingEma {
    /// Create a new streaming EMA.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            multiplier: ema_alpha(period),
            seed: Vec::with_capacity(period),
            current: None,
            exhausted: false,
        }
    }

    /// Feed the next value and return the current EMA.
    pub fn update_value(&mut self, value: Option<f64>) -> Option<f64> {
        if self.exhausted {
            return None;
        }

        match (self.current, value) {
            (Some(prev), Some(v)) => {
                self.current = Some(ema_step(prev, v, self.multiplier));
            }
            (Some(_), None) => {
                self.exhausted = true;
                self.current = None;
            }
            (None, Some(v)) => {
                // Accumulating for the initial SMA
                self.seed.push(v);
                if self.seed.len() == self.period {
                    self.current = Some(mean_simd(&self.seed));
                    self.seed.clear();
                }
            }
            (None, None) => self.seed.clear(),
        }

        self.current
    }

    /// Get the current EMA value.
    pub fn current(&self) -> Option<f64> {
        self.current
    }
}

impl StreamingIndicator for StreamingEma {
    type Output = Option<f64>;

    fn update(&mut self, candle: &Candle) -> Option<f64> {
        self.update_value(Some(candle.close))
    }

    fn reset(&mut self) {
        self.seed.clear();
        self.current = None;
        self.exhausted = false;
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(i as i64 * 60_000, c, c, c, c, 0.0))
            .collect()
    }

    #[test]
    fn test_sma() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = Sma::new(3).calculate(&candles);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert!((result.get(2).unwrap() - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result.get(3).unwrap() - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result.get(4).unwrap() - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_constant_close() {
        let candles = candles_from_closes(&[100.0; 20]);
        let result = Sma::new(5).calculate(&candles);

        for i in 0..4 {
            assert!(result[i].is_none());
        }
        for i in 4..20 {
            assert_eq!(result.get(i), Some(100.0));
        }
    }

    #[test]
    fn test_sma_insufficient_data() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        let result = Sma::new(5).calculate(&candles);

        assert_eq!(result.len(), 3);
        assert!(result.first_defined().is_none());
    }

    #[test]
    fn test_sma_empty() {
        assert!(Sma::new(5).calculate(&[]).is_empty());
        assert!(Ema::new(5).calculate(&[]).is_empty());
    }

    #[test]
    fn test_ema() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = Ema::new(3).calculate(&candles);

        assert_eq!(result.len(), 5);
        assert!(result[1].is_none());
        assert!((result.get(2).unwrap() - 2.0).abs() < 1e-10); // Initial SMA
        // mult = 2/(3+1) = 0.5
        // ema[3] = (4 - 2) * 0.5 + 2 = 3.0
        assert!((result.get(3).unwrap() - 3.0).abs() < 1e-10);
        assert!((result.get(4).unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_seed_matches_sma() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 3.0).collect();
        let candles = candles_from_closes(&closes);

        for period in [1, 5, 12, 26] {
            let ema = Ema::new(period).calculate(&candles);
            let sma = Sma::new(period).calculate(&candles);
            assert_eq!(ema.first_defined(), Some(period - 1));
            assert_eq!(ema[period - 1], sma[period - 1]);
        }
    }

    #[test]
    fn test_ema_too_short() {
        let candles = candles_from_closes(&[1.0, 2.0]);
        let result = Ema::new(3).calculate(&candles);

        assert_eq!(result.len(), 2);
        assert!(result.first_defined().is_none());
    }

    #[test]
    fn test_sma_of_propagates_undefined() {
        let values = vec![None, Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)];
        let result = sma_of(&values, 2);

        assert_eq!(
            result.values(),
            &[None, None, Some(1.5), None, None, Some(4.5), Some(5.5)]
        );
    }

    #[test]
    fn test_ema_of_leading_undefined() {
        let values = vec![None, None, Some(2.0), Some(4.0), Some(6.0)];
        let result = ema_of(&values, 2);

        assert_eq!(result.first_defined(), Some(3));
        assert!((result.get(3).unwrap() - 3.0).abs() < 1e-10);
        // alpha = 2/3: (6 - 3) * 2/3 + 3 = 5
        assert!((result.get(4).unwrap() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_of_undefined_after_seed() {
        let values = vec![Some(1.0), Some(3.0), None, Some(5.0), Some(7.0)];
        let result = ema_of(&values, 2);

        assert_eq!(result.get(1), Some(2.0));
        assert!(result[2].is_none());
        assert!(result[3].is_none());
        assert!(result[4].is_none());
    }

    #[test]
    fn test_streaming_ema() {
        let mut ema = StreamingEma::new(3);

        assert!(!ema.is_ready());
        assert!(ema.update_value(Some(1.0)).is_none());
        assert!(ema.update_value(Some(2.0)).is_none());

        // Third value triggers first output
        let first = ema.update_value(Some(3.0)).unwrap();
        assert!((first - 2.0).abs() < 1e-10); // SMA of first 3
        assert!(ema.is_ready());

        // Subsequent values use EMA formula
        let second = ema.update_value(Some(4.0)).unwrap();
        assert!((second - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_streaming_ema_reset() {
        let mut ema = StreamingEma::new(3);
        ema.update_value(Some(1.0));
        ema.update_value(Some(2.0));
        ema.update_value(Some(3.0));

        assert!(ema.is_ready());
        ema.reset();
        assert!(!ema.is_ready());
        assert!(ema.current().is_none());
    }

    #[test]
    fn test_streaming_matches_batch() {
        let closes: Vec<f64> = (0..50).map(|i| 50.0 + (i as f64 * 0.3).cos() * 4.0).collect();
        let candles = candles_from_closes(&closes);

        let sma = Sma::new(7).calculate(&candles);
        let ema = Ema::new(7).calculate(&candles);
        let mut streaming_sma = StreamingSma::new(7);
        let mut streaming_ema = StreamingEma::new(7);

        for (i, candle) in candles.iter().enumerate() {
            assert_eq!(streaming_sma.update(candle), sma[i]);
            assert_eq!(streaming_ema.update(candle), ema[i]);
        }
    }

    #[test]
    fn test_streaming_sma_value_stream_matches_sma_of() {
        let values = vec![None, Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)];
        let batch = sma_of(&values, 2);
        let mut streaming = StreamingSma::new(2);

        for (i, value) in values.iter().enumerate() {
            assert_eq!(streaming.update_value(*value), batch[i]);
        }
    }
}
