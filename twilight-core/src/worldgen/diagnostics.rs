//! Discontinuity checks for sampled density rows.
//!
//! A smooth field has a small second difference between neighboring blocks.
//! Large spikes point at biome edges where the terrain jumps into walls.

use std::ops::RangeInclusive;

use twilight_registry::RegisteredGraph;
use twilight_utils::density::EvalCache;

use crate::worldgen::context::WorldGenContext;

/// `|v[i-1] - 2 v[i] + v[i+1]|` at interior index `i`.
#[inline]
fn second_difference(samples: &[f64], i: usize) -> f64 {
    (samples[i - 1] - 2.0 * samples[i] + samples[i + 1]).abs()
}

/// Interior indices whose second difference exceeds `threshold`.
#[must_use]
pub fn second_difference_spikes(samples: &[f64], threshold: f64) -> Vec<usize> {
    if samples.len() < 3 {
        return Vec::new();
    }
    (1..samples.len() - 1)
        .filter(|&i| second_difference(samples, i) > threshold)
        .collect()
}

/// Largest second difference, or 0 for fewer than three samples.
#[must_use]
pub fn max_second_difference(samples: &[f64]) -> f64 {
    if samples.len() < 3 {
        return 0.0;
    }
    (1..samples.len() - 1)
        .map(|i| second_difference(samples, i))
        .fold(0.0, f64::max)
}

/// Samples `graph` along x at fixed `y` and `z`.
///
/// Every block gets its own cache, so the row is exactly what independent
/// column passes would produce.
#[must_use]
pub fn scan_row(
    context: &WorldGenContext,
    graph: &RegisteredGraph,
    y: i32,
    z: i32,
    x_range: RangeInclusive<i32>,
) -> Vec<f64> {
    x_range
        .map(|x| context.sample(graph, x, y, z, &mut EvalCache::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_row_has_no_spikes() {
        let row: Vec<f64> = (0..20).map(|i| f64::from(i) * 0.3 - 1.0).collect();
        assert!(second_difference_spikes(&row, 1e-9).is_empty());
        assert!(max_second_difference(&row) < 1e-9);
    }

    #[test]
    fn test_step_is_reported_on_both_sides() {
        let row = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        assert_eq!(second_difference_spikes(&row, 0.5), vec![2, 3]);
        assert!((max_second_difference(&row) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_rows() {
        assert!(second_difference_spikes(&[], 0.0).is_empty());
        assert!(second_difference_spikes(&[1.0, 5.0], 0.0).is_empty());
        assert!(max_second_difference(&[1.0]).abs() < f64::EPSILON);
    }
}
