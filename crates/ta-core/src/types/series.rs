//! Position-aligned indicator output.

use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::error::IndicatorError;

/// Indicator values aligned one-to-one with the input candles.
///
/// `series[i]` belongs to `candles[i]`. Positions that cannot be computed yet
/// (warm-up) hold `None` instead of being omitted, so the length always equals
/// the candle count. Serializes as a JSON array with `null` gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries {
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// A series of `len` undefined values.
    pub fn undefined(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn from_values(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`; `None` when undefined or out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Define the value at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    #[inline]
    pub fn set(&mut self, index: usize, value: f64) {
        self.values[index] = Some(value);
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Value at the last position, if defined.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Index of the first defined value.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    /// Iterate over `(index, value)` for defined positions only.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|value| (i, value)))
    }

    /// Combine two aligned series element-wise.
    ///
    /// A position is defined only where both inputs are defined.
    ///
    /// # Panics
    /// If the series have different lengths; derived series must share the
    /// index space of the candles they came from.
    pub fn zip_with(&self, other: &IndicatorSeries, f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(
            self.len(),
            other.len(),
            "aligned series must have equal length"
        );
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Some(f(*a, *b)),
                _ => None,
            })
            .collect()
    }

    /// Check that the series is aligned with `expected` candles.
    pub fn check_aligned(&self, expected: usize) -> Result<(), IndicatorError> {
        if self.len() != expected {
            return Err(IndicatorError::LengthMismatch {
                left: self.len(),
                right: expected,
            });
        }
        Ok(())
    }

    /// NaN-sentinel view for chart code that gaps on NaN.
    pub fn to_nan_vec(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }
}

impl Index<usize> for IndicatorSeries {
    type Output = Option<f64>;

    fn index(&self, index: usize) -> &Option<f64> {
        &self.values[index]
    }
}

impl FromIterator<Option<f64>> for IndicatorSeries {
    fn from_iter<T: IntoIterator<Item = Option<f64>>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
