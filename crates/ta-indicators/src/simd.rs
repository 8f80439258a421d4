//! SIMD window kernels.
//!
//! These use the `wide` crate for portable SIMD operations. Batch and
//! streaming calculators both route their window arithmetic through these
//! functions, which keeps their results bit-identical.

use wide::f64x4;

/// SIMD sum of a slice.
pub fn sum_simd(data: &[f64]) -> f64 {
    let chunks = data.len() / 4;
    let mut simd_sum = f64x4::splat(0.0);

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        simd_sum += values;
    }

    let mut result = simd_sum.reduce_add();

    // Handle remaining elements
    for &value in &data[(chunks * 4)..] {
        result += value;
    }

    result
}

/// Arithmetic mean of a non-empty window.
#[inline]
pub fn mean_simd(window: &[f64]) -> f64 {
    sum_simd(window) / window.len() as f64
}

/// Population standard deviation of a window around a precomputed mean.
pub fn population_std_dev_simd(window: &[f64], mean: f64) -> f64 {
    let len = window.len();
    let chunks = len / 4;
    let mean_vec = f64x4::splat(mean);
    let mut sum_sq = 0.0;

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([
            window[idx],
            window[idx + 1],
            window[idx + 2],
            window[idx + 3],
        ]);
        let diff = values - mean_vec;
        let sq = diff * diff;
        sum_sq += sq.reduce_add();
    }

    for &value in &window[(chunks * 4)..] {
        let diff = value - mean;
        sum_sq += diff * diff;
    }

    (sum_sq / len as f64).sqrt()
}

/// SIMD min/max finder.
pub fn minmax_simd(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }

    let chunks = data.len() / 4;
    let mut min_vec = f64x4::splat(f64::INFINITY);
    let mut max_vec = f64x4::splat(f64::NEG_INFINITY);

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        min_vec = min_vec.min(values);
        max_vec = max_vec.max(values);
    }

    let min_arr = min_vec.to_array();
    let max_arr = max_vec.to_array();

    let mut min = min_arr[0].min(min_arr[1]).min(min_arr[2]).min(min_arr[3]);
    let mut max = max_arr[0].max(max_arr[1]).max(max_arr[2]).max(max_arr[3]);

    for &value in &data[(chunks * 4)..] {
        min = min.min(value);
        max = max.max(value);
    }

    Some((min, max))
}
