//! Incremental counterpart of the aggregate runner.
//!
//! [`StreamingEngine`] keeps only the trailing state each recurrence needs and
//! emits one [`IndicatorSnapshot`] per candle. For any prefix of a candle
//! sequence its output equals the batch bundle at the same positions.

use ta_core::error::IndicatorError;
use ta_core::traits::StreamingIndicator;
use ta_core::types::Candle;

use crate::engine::{EngineSettings, IndicatorSnapshot, EMA_PERIODS, SMA_PERIODS};
use crate::momentum::{StreamingRsi, StreamingStochastic};
use crate::moving_average::{StreamingEma, StreamingSma};
use crate::trend::StreamingMacd;
use crate::volatility::{StreamingAtr, StreamingBollinger};

/// Stateful per-tick indicator engine.
#[derive(Debug, Clone)]
pub struct StreamingEngine {
    settings: EngineSettings,
    sma: [StreamingSma; 4],
    ema: [StreamingEma; 2],
    rsi: StreamingRsi,
    macd: StreamingMacd,
    bollinger: StreamingBollinger,
    stochastic: StreamingStochastic,
    atr: StreamingAtr,
    seen: usize,
}

impl StreamingEngine {
    pub fn new(settings: EngineSettings) -> Result<Self, IndicatorError> {
        settings.validate()?;
        Ok(Self {
            settings,
            sma: SMA_PERIODS.map(StreamingSma::new),
            ema: EMA_PERIODS.map(StreamingEma::new),
            rsi: StreamingRsi::new(settings.rsi_period),
            macd: StreamingMacd::new(settings.macd_fast, settings.macd_slow, settings.macd_signal),
            bollinger: StreamingBollinger::new(
                settings.bollinger_period,
                settings.bollinger_std_dev,
            ),
            stochastic: StreamingStochastic::new(
                settings.stochastic_period,
                settings.stochastic_smooth_k,
                settings.stochastic_smooth_d,
            ),
            atr: StreamingAtr::new(settings.atr_period),
            seen: 0,
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Number of candles consumed since creation or the last reset.
    pub fn candles_seen(&self) -> usize {
        self.seen
    }

    /// Advance every indicator by one candle.
    pub fn update(&mut self, candle: &Candle) -> IndicatorSnapshot {
        self.seen += 1;
        let [sma5, sma20, sma60, sma120] = &mut self.sma;
        let [ema12, ema26] = &mut self.ema;

        IndicatorSnapshot {
            sma5: sma5.update(candle),
            sma20: sma20.update(candle),
            sma60: sma60.update(candle),
            sma120: sma120.update(candle),
            ema12: ema12.update(candle),
            ema26: ema26.update(candle),
            rsi: self.rsi.update(candle),
            macd: self.macd.update(candle),
            bollinger: self.bollinger.update(candle),
            stochastic: self.stochastic.update(candle),
            atr: self.atr.update(candle),
        }
    }

    /// Feed a run of candles, returning one snapshot per candle.
    pub fn update_all(&mut self, candles: &[Candle]) -> Vec<IndicatorSnapshot> {
        candles.iter().map(|candle| self.update(candle)).collect()
    }

    /// Forget all state.
    pub fn reset(&mut self) {
        self.sma.iter_mut().for_each(StreamingIndicator::reset);
        self.ema.iter_mut().for_each(StreamingIndicator::reset);
        self.rsi.reset();
        self.macd.reset();
        self.bollinger.reset();
        self.stochastic.reset();
        self.atr.reset();
        self.seen = 0;
    }
}

impl Default for StreamingEngine {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            settings,
            sma: SMA_PERIODS.map(StreamingSma::new),
            ema: EMA_PERIODS.map(StreamingEma::new),
            rsi: StreamingRsi::new(settings.rsi_period),
            macd: StreamingMacd::new(settings.macd_fast, settings.macd_slow, settings.macd_signal),
            bollinger: StreamingBollinger::new(
                settings.bollinger_period,
                settings.bollinger_std_dev,
            ),
            stochastic: StreamingStochastic::new(
                settings.stochastic_period,
                settings.stochastic_smooth_k,
                settings.stochastic_smooth_d,
            ),
            atr: StreamingAtr::new(settings.atr_period),
            seen: 0,
        }
    }
}
