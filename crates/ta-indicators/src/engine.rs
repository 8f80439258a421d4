//! Aggregate runner producing the full indicator bundle.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use ta_core::error::IndicatorError;
use ta_core::traits::Indicator;
use ta_core::types::{Candle, IndicatorSeries};

use crate::momentum::{Rsi, Stochastic, StochasticPoint, StochasticSeries};
use crate::moving_average::{Ema, Sma};
use crate::trend::{Macd, MacdPoint, MacdSeries};
use crate::volatility::{Atr, BollingerBands, BollingerPoint, BollingerSeries};

/// Fixed SMA overlay periods, in bundle order.
pub const SMA_PERIODS: [usize; 4] = [5, 20, 60, 120];
/// Fixed EMA overlay periods, in bundle order.
pub const EMA_PERIODS: [usize; 2] = [12, 26];

/// Oscillator and band parameters for the aggregate runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub stochastic_period: usize,
    pub stochastic_smooth_k: usize,
    pub stochastic_smooth_d: usize,
    pub atr_period: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            stochastic_period: 14,
            stochastic_smooth_k: 3,
            stochastic_smooth_d: 3,
            atr_period: 14,
        }
    }
}

impl EngineSettings {
    /// Reject parameters the calculators cannot be built with.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("stochastic_period", self.stochastic_period),
            ("stochastic_smooth_k", self.stochastic_smooth_k),
            ("stochastic_smooth_d", self.stochastic_smooth_d),
            ("atr_period", self.atr_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(IndicatorError::zero_period(*name));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(IndicatorError::InvalidParameter {
                name: "macd_fast",
                reason: format!(
                    "fast period {} must be less than slow period {}",
                    self.macd_fast, self.macd_slow
                ),
            });
        }

        if !(self.bollinger_std_dev.is_finite() && self.bollinger_std_dev > 0.0) {
            return Err(IndicatorError::InvalidParameter {
                name: "bollinger_std_dev",
                reason: format!("multiplier must be positive, got {}", self.bollinger_std_dev),
            });
        }

        Ok(())
    }
}

/// Every indicator series for one candle window, aligned with the candles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub sma5: IndicatorSeries,
    pub sma20: IndicatorSeries,
    pub sma60: IndicatorSeries,
    pub sma120: IndicatorSeries,
    pub ema12: IndicatorSeries,
    pub ema26: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub macd: MacdSeries,
    pub bollinger: BollingerSeries,
    pub stochastic: StochasticSeries,
    pub atr: IndicatorSeries,
}

impl IndicatorBundle {
    /// Number of candles the bundle was computed over.
    pub fn len(&self) -> usize {
        self.sma5.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sma5.is_empty()
    }

    /// All values at candle `index`, or `None` past the end.
    pub fn snapshot_at(&self, index: usize) -> Option<IndicatorSnapshot> {
        if index >= self.len() {
            return None;
        }
        Some(IndicatorSnapshot {
            sma5: self.sma5.get(index),
            sma20: self.sma20.get(index),
            sma60: self.sma60.get(index),
            sma120: self.sma120.get(index),
            ema12: self.ema12.get(index),
            ema26: self.ema26.get(index),
            rsi: self.rsi.get(index),
            macd: self.macd.point_at(index),
            bollinger: self.bollinger.point_at(index),
            stochastic: self.stochastic.point_at(index),
            atr: self.atr.get(index),
        })
    }

    /// Values at the most recent candle.
    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        self.len().checked_sub(1).and_then(|i| self.snapshot_at(i))
    }

    /// Every series in the bundle with its display name.
    pub fn series(&self) -> [(&'static str, &IndicatorSeries); 16] {
        [
            ("sma5", &self.sma5),
            ("sma20", &self.sma20),
            ("sma60", &self.sma60),
            ("sma120", &self.sma120),
            ("ema12", &self.ema12),
            ("ema26", &self.ema26),
            ("rsi", &self.rsi),
            ("macd", &self.macd.macd),
            ("macd_signal", &self.macd.signal),
            ("macd_histogram", &self.macd.histogram),
            ("bollinger_upper", &self.bollinger.upper),
            ("bollinger_middle", &self.bollinger.middle),
            ("bollinger_lower", &self.bollinger.lower),
            ("stochastic_k", &self.stochastic.k),
            ("stochastic_d", &self.stochastic.d),
            ("atr", &self.atr),
        ]
    }

    /// Check every series against the candle count.
    pub fn check_alignment(&self, candles: usize) -> Result<(), IndicatorError> {
        self.series()
            .iter()
            .try_for_each(|(_, series)| series.check_aligned(candles))
    }
}

/// Every indicator value at a single candle position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub sma5: Option<f64>,
    pub sma20: Option<f64>,
    pub sma60: Option<f64>,
    pub sma120: Option<f64>,
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: MacdPoint,
    pub bollinger: BollingerPoint,
    pub stochastic: StochasticPoint,
    pub atr: Option<f64>,
}

/// Runs every calculator over a candle window.
///
/// Holds no state between calls; each `compute` recomputes from scratch.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    settings: EngineSettings,
    sma: [Sma; 4],
    ema: [Ema; 2],
    rsi: Rsi,
    macd: Macd,
    bollinger: BollingerBands,
    stochastic: Stochastic,
    atr: Atr,
}

impl IndicatorEngine {
    /// Build an engine from validated settings.
    pub fn new(settings: EngineSettings) -> Result<Self, IndicatorError> {
        settings.validate()?;
        Ok(Self {
            settings,
            sma: SMA_PERIODS.map(Sma::new),
            ema: EMA_PERIODS.map(Ema::new),
            rsi: Rsi::new(settings.rsi_period),
            macd: Macd::with_periods(settings.macd_fast, settings.macd_slow, settings.macd_signal),
            bollinger: BollingerBands::with_params(
                settings.bollinger_period,
                settings.bollinger_std_dev,
            ),
            stochastic: Stochastic::with_periods(
                settings.stochastic_period,
                settings.stochastic_smooth_k,
                settings.stochastic_smooth_d,
            ),
            atr: Atr::new(settings.atr_period),
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Compute the full bundle for `candles` (oldest first).
    pub fn compute(&self, candles: &[Candle]) -> IndicatorBundle {
        debug!(candles = candles.len(), "computing indicator bundle");

        let [sma5, sma20, sma60, sma120] = &self.sma;
        let [ema12, ema26] = &self.ema;

        if !self.macd.is_computable(candles) {
            trace!(
                candles = candles.len(),
                warmup = self.macd.warmup(),
                "window shorter than MACD warm-up"
            );
        }

        IndicatorBundle {
            sma5: sma5.calculate(candles),
            sma20: sma20.calculate(candles),
            sma60: sma60.calculate(candles),
            sma120: sma120.calculate(candles),
            ema12: ema12.calculate(candles),
            ema26: ema26.calculate(candles),
            rsi: self.rsi.calculate(candles),
            macd: self.macd.calculate(candles),
            bollinger: self.bollinger.calculate(candles),
            stochastic: self.stochastic.calculate(candles),
            atr: self.atr.calculate(candles),
        }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            settings,
            sma: SMA_PERIODS.map(Sma::new),
            ema: EMA_PERIODS.map(Ema::new),
            rsi: Rsi::default(),
            macd: Macd::default(),
            bollinger: BollingerBands::default(),
            stochastic: Stochastic::default(),
            atr: Atr::default(),
        }
    }
}

/// Compute every indicator with its default parameters.
pub fn compute_all(candles: &[Candle]) -> IndicatorBundle {
    IndicatorEngine::default().compute(candles)
}
