//! Terrain assembly and sampling.
//!
//! [`WorldGenContext`] owns the per-world state; [`terrain`] builds the
//! Twilight graphs into it and [`ColumnSampler`] reads them back out.

pub mod biome_grid;
pub mod column;
pub mod context;
pub mod diagnostics;
pub mod placement;
pub mod terrain;

pub use biome_grid::{CellularBiomeGrid, UniformBiomeGrid};
pub use column::{ColumnSample, ColumnSampler};
pub use context::WorldGenContext;
pub use placement::{FeatureRegion, NearestFeatureLookup, allows_decoration};
pub use terrain::{FORESTED_TERRAIN, RAW_BIOME_TERRAIN, SKYLIGHT_TERRAIN, TerrainGraphs};
pub use twilight_utils::density::EvalCache;
