//! Scalar recurrence steps shared by the batch and streaming calculators.

/// Guard for divisions by a zero range or a zero average loss.
pub const EPSILON: f64 = 0.0001;

/// EMA multiplier `2 / (period + 1)`.
#[inline]
pub(crate) fn ema_alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// One EMA step: `(value - prev) * alpha + prev`.
#[inline]
pub(crate) fn ema_step(prev: f64, value: f64, alpha: f64) -> f64 {
    (value - prev) * alpha + prev
}

/// One Wilder smoothing step: `(prev * (period - 1) + value) / period`.
#[inline]
pub(crate) fn wilder_step(prev: f64, value: f64, period: usize) -> f64 {
    let period_f64 = period as f64;
    (prev * (period_f64 - 1.0) + value) / period_f64
}

/// Split a close-to-close change into `(gain, loss)`.
#[inline]
pub(crate) fn gain_loss(change: f64) -> (f64, f64) {
    (change.max(0.0), (-change).max(0.0))
}

/// RSI from Wilder averages, with the average loss floored at [`EPSILON`].
///
/// Flat prices (both averages zero) give 0, not 50.
#[inline]
pub(crate) fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = avg_gain / avg_loss.max(EPSILON);
    100.0 - 100.0 / (1.0 + rs)
}

/// Raw stochastic %K with the high-low range floored at [`EPSILON`].
#[inline]
pub(crate) fn percent_k(close: f64, lowest: f64, highest: f64) -> f64 {
    (close - lowest) / (highest - lowest).max(EPSILON) * 100.0
}
