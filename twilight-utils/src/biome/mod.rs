//! The biome influence seam.
//!
//! Terrain graphs read a per-column "biome density" signal from an external
//! grid. The grid is resolved once when a graph is assembled and then shared
//! read-only by every evaluation.

use std::fmt;
use std::sync::Arc;

/// A per-column scalar signal describing how strongly biome terrain shaping applies.
///
/// Implementations must be deterministic for a given world seed and safe to
/// sample from many threads at once.
pub trait BiomeInfluenceSource: Send + Sync {
    /// Samples the signal at block column `(x, z)`.
    fn sample(&self, x: i32, z: i32) -> f64;

    /// Smallest and largest value `sample` can return.
    fn range(&self) -> (f64, f64);
}

/// A resolved reference to a registered biome grid.
#[derive(Clone)]
pub struct BiomeGridRef {
    /// Registry id the grid was resolved from
    pub grid_id: Arc<str>,
    /// The shared grid
    pub source: Arc<dyn BiomeInfluenceSource>,
}

impl BiomeGridRef {
    /// Wraps a grid under `grid_id`.
    pub fn new(grid_id: impl Into<Arc<str>>, source: Arc<dyn BiomeInfluenceSource>) -> Self {
        Self {
            grid_id: grid_id.into(),
            source,
        }
    }

    /// Samples the grid at block column `(x, z)`.
    #[inline]
    #[must_use]
    pub fn sample(&self, x: i32, z: i32) -> f64 {
        self.source.sample(x, z)
    }
}

impl fmt::Debug for BiomeGridRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiomeGridRef")
            .field("grid_id", &self.grid_id)
            .field("range", &self.source.range())
            .finish_non_exhaustive()
    }
}
