//! Text rendering of sampled terrain.

use std::fmt::Write;

use twilight_core::worldgen::diagnostics::{
    max_second_difference, scan_row, second_difference_spikes,
};
use twilight_core::worldgen::{ColumnSampler, WorldGenContext};
use twilight_registry::RegisteredGraph;

/// Heightmap of the square around `(x, z)` as rows of right-aligned numbers.
///
/// Columns with no solid block print as `.`.
pub fn heightmap(sampler: &ColumnSampler<'_>, x: i32, z: i32, radius: i32) -> String {
    let width = (2 * radius.max(0) + 1) as usize;
    let heights = sampler.heightmap(x, z, radius);

    let mut out = String::new();
    for row in heights.chunks(width) {
        for height in row {
            match height {
                Some(h) => {
                    let _ = write!(out, "{h:>5}");
                }
                None => out.push_str("    ."),
            }
        }
        out.push('\n');
    }
    out
}

/// One line per row of the scan with its worst second difference and the spike positions.
pub fn discontinuities(
    context: &WorldGenContext,
    graph: &RegisteredGraph,
    x: i32,
    z: i32,
    radius: i32,
    ys: impl IntoIterator<Item = i32>,
    threshold: f64,
) -> String {
    let mut out = String::new();
    let first_x = x - radius;
    for y in ys {
        let row = scan_row(context, graph, y, z, first_x..=x + radius);
        let spikes: Vec<i32> = second_difference_spikes(&row, threshold)
            .into_iter()
            .map(|i| first_x + i as i32)
            .collect();
        let _ = writeln!(
            out,
            "y {y:>4}: max |d2| {:.4}, spikes at x = {spikes:?}",
            max_second_difference(&row)
        );
    }
    out
}
