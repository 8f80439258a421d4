//! Sanity checks for loaded candles.
//!
//! The calculators accept whatever they are given; these checks let a loader
//! flag suspicious input before it reaches a chart.

use thiserror::Error;
use tracing::warn;

use ta_core::types::Candle;

/// A problem found in a candle sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CandleIssue {
    #[error("candle {index}: non-finite or negative price")]
    BadPrice { index: usize },

    #[error("candle {index}: negative volume")]
    NegativeVolume { index: usize },

    #[error("candle {index}: open/close outside the high-low range")]
    OutOfRange { index: usize },

    #[error("candle {index}: timestamp {current} precedes {previous}")]
    OutOfOrder {
        index: usize,
        previous: i64,
        current: i64,
    },
}

/// Validate a candle has reasonable values.
pub fn validate_candle(candle: &Candle) -> bool {
    prices_ok(candle) && candle.volume >= 0.0 && candle.is_well_formed()
}

fn prices_ok(candle: &Candle) -> bool {
    [candle.open, candle.high, candle.low, candle.close]
        .iter()
        .all(|p| p.is_finite() && *p >= 0.0)
}

/// Collect every issue in `candles`, in order of appearance.
pub fn validate_candles(candles: &[Candle]) -> Vec<CandleIssue> {
    let mut issues = Vec::new();
    let mut previous: Option<i64> = None;

    for (index, candle) in candles.iter().enumerate() {
        if !prices_ok(candle) {
            issues.push(CandleIssue::BadPrice { index });
        } else if !candle.is_well_formed() {
            issues.push(CandleIssue::OutOfRange { index });
        }

        if candle.volume.is_nan() || candle.volume < 0.0 {
            issues.push(CandleIssue::NegativeVolume { index });
        }

        if let Some(prev) = previous {
            if candle.timestamp < prev {
                issues.push(CandleIssue::OutOfOrder {
                    index,
                    previous: prev,
                    current: candle.timestamp,
                });
            }
        }
        previous = Some(candle.timestamp);
    }

    if !issues.is_empty() {
        warn!(count = issues.len(), first = %issues[0], "candle validation issues");
    }

    issues
}
