//! Column and area sampling on top of [`WorldGenContext`].

use rayon::prelude::*;
use twilight_registry::RegisteredGraph;
use twilight_utils::density::EvalCache;

use crate::worldgen::context::WorldGenContext;

/// Lowest block sampled by default.
pub const DEFAULT_MIN_Y: i32 = -32;
/// Highest block sampled by default.
pub const DEFAULT_MAX_Y: i32 = 256;

/// Densities of one column, bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSample {
    /// Block x
    pub x: i32,
    /// Block z
    pub z: i32,
    /// y of `densities[0]`
    pub min_y: i32,
    /// One value per block from `min_y` upwards
    pub densities: Vec<f64>,
}

impl ColumnSample {
    /// Topmost y with positive density, or `None` for an empty column.
    #[must_use]
    pub fn surface_height(&self) -> Option<i32> {
        self.densities
            .iter()
            .rposition(|&d| d > 0.0)
            .map(|i| self.min_y + i as i32)
    }
}

/// Samples one registered graph over whole columns.
///
/// Every column gets a fresh [`EvalCache`], which keeps flat and interpolation
/// memos from leaking between passes.
pub struct ColumnSampler<'a> {
    context: &'a WorldGenContext,
    graph: RegisteredGraph,
    min_y: i32,
    max_y: i32,
}

impl<'a> ColumnSampler<'a> {
    /// Samples the forested terrain.
    #[must_use]
    pub fn new(context: &'a WorldGenContext) -> Self {
        Self::for_graph(context, context.terrain().forested_terrain.clone())
    }

    /// Samples any registered graph.
    #[must_use]
    pub const fn for_graph(context: &'a WorldGenContext, graph: RegisteredGraph) -> Self {
        Self {
            context,
            graph,
            min_y: DEFAULT_MIN_Y,
            max_y: DEFAULT_MAX_Y,
        }
    }

    /// Restricts sampling to `min_y..=max_y`. The bounds are swapped if reversed.
    #[must_use]
    pub fn with_y_range(mut self, min_y: i32, max_y: i32) -> Self {
        self.min_y = min_y.min(max_y);
        self.max_y = min_y.max(max_y);
        self
    }

    /// The graph being sampled.
    #[must_use]
    pub const fn graph(&self) -> &RegisteredGraph {
        &self.graph
    }

    /// Densities of the column at `(x, z)`.
    #[must_use]
    pub fn sample_column(&self, x: i32, z: i32) -> ColumnSample {
        let mut cache = EvalCache::new();
        let densities = (self.min_y..=self.max_y)
            .map(|y| self.context.sample(&self.graph, x, y, z, &mut cache))
            .collect();
        ColumnSample {
            x,
            z,
            min_y: self.min_y,
            densities,
        }
    }

    /// Topmost solid block of the column at `(x, z)`.
    ///
    /// Scans downwards and stops at the first positive density.
    #[must_use]
    pub fn surface_height(&self, x: i32, z: i32) -> Option<i32> {
        let mut cache = EvalCache::new();
        (self.min_y..=self.max_y)
            .rev()
            .find(|&y| self.context.sample(&self.graph, x, y, z, &mut cache) > 0.0)
    }

    /// Columns of the square `[center - radius, center + radius]²`, row by row.
    ///
    /// Columns are sampled in parallel; the result order does not depend on scheduling.
    #[must_use]
    pub fn sample_area(&self, center_x: i32, center_z: i32, radius: i32) -> Vec<ColumnSample> {
        area(center_x, center_z, radius)
            .into_par_iter()
            .map(|(x, z)| self.sample_column(x, z))
            .collect()
    }

    /// Surface heights of the square around the center, row by row.
    #[must_use]
    pub fn heightmap(&self, center_x: i32, center_z: i32, radius: i32) -> Vec<Option<i32>> {
        area(center_x, center_z, radius)
            .into_par_iter()
            .map(|(x, z)| self.surface_height(x, z))
            .collect()
    }
}

fn area(center_x: i32, center_z: i32, radius: i32) -> Vec<(i32, i32)> {
    let radius = radius.max(0);
    ((center_z - radius)..=(center_z + radius))
        .flat_map(|z| ((center_x - radius)..=(center_x + radius)).map(move |x| (x, z)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::WorldGenConfig;
    use crate::worldgen::biome_grid::UniformBiomeGrid;

    fn context() -> WorldGenContext {
        WorldGenContext::bootstrap_with_grid(
            &WorldGenConfig::default().with_seed(7),
            Arc::new(UniformBiomeGrid::new(1.6)),
        )
        .unwrap()
    }

    #[test]
    fn test_area_order() {
        assert_eq!(
            area(0, 10, 1),
            vec![
                (-1, 9),
                (0, 9),
                (1, 9),
                (-1, 10),
                (0, 10),
                (1, 10),
                (-1, 11),
                (0, 11),
                (1, 11)
            ]
        );
        assert_eq!(area(5, 5, -3), vec![(5, 5)]);
    }

    #[test]
    fn test_column_matches_point_samples() {
        let ctx = context();
        let sampler = ColumnSampler::new(&ctx).with_y_range(40, 0);
        let column = sampler.sample_column(3, -12);
        assert_eq!(column.min_y, 0);
        assert_eq!(column.densities.len(), 41);
        for (i, density) in column.densities.iter().enumerate() {
            let fresh = ctx.sample(sampler.graph(), 3, i as i32, -12, &mut EvalCache::new());
            assert!((density - fresh).abs() < 1e-12);
        }
    }

    #[test]
    fn test_surface_height_agrees_with_column() {
        let ctx = context();
        let sampler = ColumnSampler::new(&ctx);
        for (x, z) in [(0, 0), (100, -40), (-333, 17)] {
            assert_eq!(
                sampler.surface_height(x, z),
                sampler.sample_column(x, z).surface_height()
            );
        }
    }

    #[test]
    fn test_parallel_area_matches_serial() {
        let ctx = context();
        let sampler = ColumnSampler::new(&ctx).with_y_range(-8, 72);
        let parallel = sampler.sample_area(20, -20, 2);
        let serial: Vec<_> = area(20, -20, 2)
            .into_iter()
            .map(|(x, z)| sampler.sample_column(x, z))
            .collect();
        assert_eq!(parallel, serial);
        assert_eq!(sampler.heightmap(20, -20, 2).len(), 25);
    }
}
