//! Decoration gate around generated features.
//!
//! Structures such as hedge mazes or hollow hills own a square around their
//! center. Unless the feature opts in, ordinary decorations (trees, flowers)
//! must stay out of that square.

/// The area a feature occupies around its center column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRegion {
    /// Center block x
    pub center_x: i32,
    /// Center block z
    pub center_z: i32,
    /// Half extent, in chunk widths (16 blocks each)
    pub size: i32,
    /// Whether decorations may generate inside
    pub decorations_enabled: bool,
}

/// Finds the feature nearest to a chunk.
pub trait NearestFeatureLookup {
    /// The feature whose region is closest to chunk `(chunk_x, chunk_z)`, if any.
    fn nearest_feature(&self, chunk_x: i32, chunk_z: i32) -> Option<FeatureRegion>;
}

impl<F> NearestFeatureLookup for F
where
    F: Fn(i32, i32) -> Option<FeatureRegion>,
{
    fn nearest_feature(&self, chunk_x: i32, chunk_z: i32) -> Option<FeatureRegion> {
        self(chunk_x, chunk_z)
    }
}

/// Whether a decoration may be placed at block `(x, z)`.
#[must_use]
pub fn allows_decoration(x: i32, z: i32, lookup: &impl NearestFeatureLookup) -> bool {
    let (chunk_x, chunk_z) = (x >> 4, z >> 4);
    let Some(feature) = lookup.nearest_feature(chunk_x, chunk_z) else {
        return true;
    };
    if feature.decorations_enabled {
        return true;
    }

    let dx = (i64::from(x) - i64::from(feature.center_x)).abs();
    let dz = (i64::from(z) - i64::from(feature.center_z)).abs();
    let reach = i64::from(feature.size) * 16;
    dx >= reach || dz >= reach
}
