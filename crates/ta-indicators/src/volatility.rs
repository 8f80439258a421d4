//! Volatility indicators.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use ta_core::traits::{Indicator, StreamingIndicator};
use ta_core::types::{Candle, IndicatorSeries};

use crate::moving_average::Sma;
use crate::simd::{mean_simd, population_std_dev_simd};
use crate::smoothing::wilder_step;

/// Average True Range (ATR).
///
/// Measures market volatility from the true range of each step, smoothed
/// with Wilder's method.
///
/// The true-range array is one shorter than the candles (`tr[j]` belongs to
/// candle `j + 1`). The seed is the mean of the first `period` true ranges,
/// placed at candle `period`; afterwards
/// `atr[i] = (atr[i - 1] * (period - 1) + tr[i - 1]) / period`.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// True range per step, one shorter than `candles`.
    pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
        candles
            .windows(2)
            .map(|w| w[1].true_range(w[0].close))
            .collect()
    }
}

impl Default for Atr {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Atr {
    type Output = IndicatorSeries;

    fn calculate(&self, candles: &[Candle]) -> IndicatorSeries {
        let mut result = IndicatorSeries::undefined(candles.len());
        if candles.len() <= self.period {
            return result;
        }

        let tr = Self::true_ranges(candles);

        // Initial ATR is the mean of the first 'period' true ranges
        let mut atr = mean_simd(&tr[..self.period]);
        result.set(self.period, atr);

        for i in (self.period + 1)..candles.len() {
            atr = wilder_step(atr, tr[i - 1], self.period);
            result.set(i, atr);
        }

        result
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "ATR"
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerSeries {
    /// Upper band
    pub upper: IndicatorSeries,
    /// Middle band (SMA)
    pub middle: IndicatorSeries,
    /// Lower band
    pub lower: IndicatorSeries,
}

impl BollingerSeries {
    pub fn point_at(&self, index: usize) -> BollingerPoint {
        BollingerPoint {
            upper: self.upper.get(index),
            middle: self.middle.get(index),
            lower: self.lower.get(index),
        }
    }
}

/// Bollinger values at a single position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
}

impl BollingerPoint {
    /// Check if price is above upper band.
    pub fn is_overbought(&self, price: f64) -> bool {
        self.upper.is_some_and(|upper| price > upper)
    }

    /// Check if price is below lower band.
    pub fn is_oversold(&self, price: f64) -> bool {
        self.lower.is_some_and(|lower| price < lower)
    }
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands at a number of
/// population standard deviations of the same window.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerSeries;

    fn calculate(&self, candles: &[Candle]) -> BollingerSeries {
        let middle = Sma::new(self.period).calculate(candles);
        let mut upper = IndicatorSeries::undefined(candles.len());
        let mut lower = IndicatorSeries::undefined(candles.len());

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        for (i, mean) in middle.defined() {
            let window = &closes[i + 1 - self.period..=i];
            let band = self.std_dev_multiplier * population_std_dev_simd(window, mean);
            upper.set(i, mean + band);
            lower.set(i, mean - band);
        }

        BollingerSeries {
            upper,
            middle,
            lower,
        }
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

/// Streaming ATR.
#[derive(Debug, Clone)]
pub struct StreamingAtr {
    period: usize,
    prev_close: Option<f64>,
    seed: Vec<f64>,
    current: Option<f64>,
}

impl StreamingAtr {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            prev_close: None,
            seed: Vec::with_capacity(period),
            current: None,
        }
    }
}

impl StreamingIndicator for StreamingAtr {
    type Output = Option<f64>;

    fn update(&mut self, candle: &Candle) -> Option<f64> {
        let prev_close = self.prev_close.replace(candle.close)?;
        let tr = candle.true_range(prev_close);

        self.current = match self.current {
            Some(atr) => Some(wilder_step(atr, tr, self.period)),
            None => {
                self.seed.push(tr);
                (self.seed.len() == self.period).then(|| mean_simd(&self.seed))
            }
        };
        self.current
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.seed.clear();
        self.current = None;
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    fn name(&self) -> &str {
        "ATR"
    }
}

/// Streaming Bollinger Bands.
#[derive(Debug, Clone)]
pub struct StreamingBollinger {
    period: usize,
    std_dev_multiplier: f64,
    window: VecDeque<f64>,
    current: BollingerPoint,
}

impl StreamingBollinger {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            std_dev_multiplier,
            window: VecDeque::with_capacity(period),
            current: BollingerPoint::default(),
        }
    }
}

impl StreamingIndicator for StreamingBollinger {
    type Output = BollingerPoint;

    fn update(&mut self, candle: &Candle) -> BollingerPoint {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(candle.close);

        if self.window.len() == self.period {
            let window = self.window.make_contiguous();
            let mean = mean_simd(window);
            let band = self.std_dev_multiplier * population_std_dev_simd(window, mean);
            self.current = BollingerPoint {
                upper: Some(mean + band),
                middle: Some(mean),
                lower: Some(mean - band),
            };
        }
        self.current
    }

    fn reset(&mut self) {
        self.window.clear();
        self.current = BollingerPoint::default();
    }

    fn is_ready(&self) -> bool {
        self.current.middle.is_some()
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::statistics::Statistics;

    /// Textbook Wilder ATR: first value is the mean of TR[1..=period], reported
    /// compactly starting from candle `period`.
    fn reference_atr(candles: &[Candle], period: usize) -> Vec<f64> {
        let tr: Vec<f64> = (1..candles.len())
            .map(|i| {
                let c = &candles[i];
                let prev = candles[i - 1].close;
                (c.high - c.low)
                    .max((c.high - prev).abs())
                    .max((c.low - prev).abs())
            })
            .collect();

        let mut out = Vec::new();
        let mut atr = tr[..period].iter().sum::<f64>() / period as f64;
        out.push(atr);
        for &value in &tr[period..] {
            atr = (atr * (period as f64 - 1.0) + value) / period as f64;
            out.push(atr);
        }
        out
    }

    fn wave_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.35).sin() * 6.0 + (i as f64 * 1.7).cos();
                let high = close + 1.0 + (i % 3) as f64 * 0.5;
                let low = close - 1.2 - (i % 4) as f64 * 0.3;
                Candle::new(i as i64, close, high, low, close, 100.0)
            })
            .collect()
    }

    #[test]
    fn test_atr_ohlc() {
        let candles = vec![
            Candle::new(0, 9.0, 10.0, 8.0, 9.0, 1.0),
            Candle::new(1, 10.0, 11.0, 9.0, 10.0, 1.0),
            Candle::new(2, 11.0, 12.0, 10.0, 11.0, 1.0),
            Candle::new(3, 10.0, 11.0, 9.0, 10.0, 1.0),
            Candle::new(4, 12.0, 13.0, 11.0, 12.0, 1.0),
            Candle::new(5, 13.0, 14.0, 12.0, 13.0, 1.0),
        ];

        let result = Atr::new(3).calculate(&candles);
        assert_eq!(result.len(), 6);
        assert_eq!(result.first_defined(), Some(3));

        // TR: 2, 2, 2, 3, 2 -> seed 2, then (2*2 + 3)/3, then (7/3*2 + 2)/3
        assert!((result.get(3).unwrap() - 2.0).abs() < 1e-10);
        assert!((result.get(4).unwrap() - 7.0 / 3.0).abs() < 1e-10);
        assert!((result.get(5).unwrap() - 20.0 / 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_atr_matches_reference_without_offset() {
        let candles = wave_candles(80);
        let period = 14;

        let atr = Atr::new(period).calculate(&candles);
        let reference = reference_atr(&candles, period);

        assert_eq!(atr.first_defined(), Some(period));
        assert_eq!(atr.defined().count(), reference.len());
        for (j, expected) in reference.iter().enumerate() {
            let actual = atr.get(period + j).unwrap();
            assert!(
                (actual - expected).abs() < 1e-9,
                "ATR offset at candle {}: {} vs {}",
                period + j,
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_atr_non_negative() {
        let candles = wave_candles(60);
        let result = Atr::default().calculate(&candles);

        for (_, value) in result.defined() {
            assert!(value >= 0.0);
        }
    }

    #[test]
    fn test_atr_insufficient_data() {
        let candles = wave_candles(14);
        let result = Atr::new(14).calculate(&candles);

        assert_eq!(result.len(), 14);
        assert!(result.first_defined().is_none());
        assert!(Atr::new(14).calculate(&[]).is_empty());
    }

    #[test]
    fn test_bollinger_bands() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.1).sin() * 5.0;
                Candle::new(i, c, c, c, c, 0.0)
            })
            .collect();

        let result = BollingerBands::new().calculate(&candles);
        assert_eq!(result.upper.len(), 30);
        assert_eq!(result.middle.first_defined(), Some(19));
        assert_eq!(result.upper.first_defined(), Some(19));
        assert_eq!(result.lower.first_defined(), Some(19));

        for i in 19..30 {
            let point = result.point_at(i);
            let (upper, middle, lower) =
                (point.upper.unwrap(), point.middle.unwrap(), point.lower.unwrap());
            // Upper > Middle > Lower
            assert!(upper > middle);
            assert!(middle > lower);
        }
    }

    #[test]
    fn test_bollinger_population_std_dev() {
        let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, 3.0, 6.0];
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(i as i64, c, c, c, c, 0.0))
            .collect();

        let result = BollingerBands::with_params(8, 2.0).calculate(&candles);

        for i in 7..10 {
            let window = &closes[i - 7..=i];
            let sigma = window.population_std_dev();
            let middle = result.middle.get(i).unwrap();
            assert!((result.upper.get(i).unwrap() - (middle + 2.0 * sigma)).abs() < 1e-10);
            assert!((result.lower.get(i).unwrap() - (middle - 2.0 * sigma)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_bollinger_constant_price_collapses() {
        let candles: Vec<Candle> = (0..5)
            .map(|i| Candle::new(i, 100.0, 100.0, 100.0, 100.0, 0.0))
            .collect();

        let result = BollingerBands::with_params(5, 2.0).calculate(&candles);
        assert_eq!(result.point_at(4).upper, Some(100.0));
        assert_eq!(result.point_at(4).lower, Some(100.0));
    }

    #[test]
    fn test_bollinger_overbought_oversold() {
        let point = BollingerPoint {
            upper: Some(110.0),
            middle: Some(100.0),
            lower: Some(90.0),
        };

        assert!(point.is_overbought(115.0));
        assert!(!point.is_overbought(105.0));
        assert!(point.is_oversold(85.0));
        assert!(!point.is_oversold(95.0));
        assert!(!BollingerPoint::default().is_overbought(1e9));
    }

    #[test]
    fn test_streaming_matches_batch() {
        let candles = wave_candles(50);
        let atr = Atr::new(14).calculate(&candles);
        let bands = BollingerBands::new().calculate(&candles);
        let mut streaming_atr = StreamingAtr::new(14);
        let mut streaming_bands = StreamingBollinger::new(20, 2.0);

        for (i, candle) in candles.iter().enumerate() {
            assert_eq!(streaming_atr.update(candle), atr[i]);
            assert_eq!(streaming_bands.update(candle), bands.point_at(i));
        }
    }
}
