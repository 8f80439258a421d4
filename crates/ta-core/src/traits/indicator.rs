//! Indicator trait definitions.

use crate::types::Candle;

/// Trait for batch technical indicators.
///
/// A batch indicator is a pure function of the candle slice: every output
/// series has one entry per candle, with undefined entries during warm-up.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given candles.
    ///
    /// # Arguments
    /// * `candles` - Candles ordered oldest to newest
    fn calculate(&self, candles: &[Candle]) -> Self::Output;

    /// Index of the first candle at which every output is defined.
    fn warmup(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Whether `candles` is long enough to produce at least one defined value.
    fn is_computable(&self, candles: &[Candle]) -> bool {
        candles.len() > self.warmup()
    }
}

/// Streaming indicator that maintains internal state.
///
/// Fed the same candles in the same order, a streaming indicator yields
/// exactly the values the batch form produces at each position.
pub trait StreamingIndicator: Send + Sync {
    /// The output type for a single position.
    type Output;

    /// Update the indicator with the next candle.
    fn update(&mut self, candle: &Candle) -> Self::Output;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if the indicator has produced a defined value.
    fn is_ready(&self) -> bool;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
