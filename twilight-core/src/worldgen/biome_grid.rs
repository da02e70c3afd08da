//! Biome influence grids used to drive the terrain router.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use twilight_utils::biome::BiomeInfluenceSource;
use twilight_utils::math::floor_div;

use crate::config::BiomeGridConfig;

/// A grid of square biome cells, each picking one palette entry from the world seed.
///
/// The signal is a hard step at cell edges; the terrain router smooths it.
#[derive(Debug, Clone)]
pub struct CellularBiomeGrid {
    seed: u64,
    cell_size: i32,
    names: Vec<String>,
    densities: Vec<f64>,
    range: (f64, f64),
}

impl CellularBiomeGrid {
    /// Builds the grid for a world seed.
    #[must_use]
    pub fn new(seed: u64, config: &BiomeGridConfig) -> Self {
        let names = config.palette.iter().map(|b| b.name.clone()).collect();
        let densities: Vec<f64> = config.palette.iter().map(|b| b.density).collect();
        let range = densities
            .iter()
            .fold(None, |range: Option<(f64, f64)>, &d| {
                Some(range.map_or((d, d), |(lo, hi)| (lo.min(d), hi.max(d))))
            })
            .unwrap_or((0.0, 0.0));

        Self {
            seed,
            cell_size: config.cell_size.max(1),
            names,
            densities,
            range,
        }
    }

    /// Palette index of the cell containing block column `(x, z)`.
    fn cell_index(&self, x: i32, z: i32) -> Option<usize> {
        if self.densities.is_empty() {
            return None;
        }
        let cell_x = floor_div(x, self.cell_size);
        let cell_z = floor_div(z, self.cell_size);

        let mut hasher = FxHasher::default();
        (self.seed, cell_x, cell_z).hash(&mut hasher);
        let hash = hasher.finish();
        Some(((hash >> 17) % self.densities.len() as u64) as usize)
    }

    /// Biome id at block column `(x, z)`.
    #[must_use]
    pub fn biome_at(&self, x: i32, z: i32) -> Option<&str> {
        self.cell_index(x, z).map(|i| self.names[i].as_str())
    }
}

impl BiomeInfluenceSource for CellularBiomeGrid {
    fn sample(&self, x: i32, z: i32) -> f64 {
        self.cell_index(x, z).map_or(0.0, |i| self.densities[i])
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// The same signal everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformBiomeGrid {
    /// The signal value
    pub density: f64,
}

impl UniformBiomeGrid {
    /// A grid returning `density` everywhere.
    #[must_use]
    pub const fn new(density: f64) -> Self {
        Self { density }
    }
}

impl BiomeInfluenceSource for UniformBiomeGrid {
    fn sample(&self, _x: i32, _z: i32) -> f64 {
        self.density
    }

    fn range(&self) -> (f64, f64) {
        (self.density, self.density)
    }
}
