//! Density function node types.
//!
//! Nodes live in a [`DensityGraph`](super::DensityGraph) arena and refer to
//! their children by [`NodeId`]. A node can only name children that were pushed
//! before it, so every graph is a DAG and evaluation always terminates.

use std::fmt;
use std::sync::Arc;

use crate::density::terrain::{
    AbsoluteDifference, FocusedDensity, HollowHill, TerrainDensityRouter,
};
use crate::noise::NormalNoise;

/// Index of a node inside a [`DensityGraph`](super::DensityGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the node in its arena.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named reference to a seeded noise generator.
///
/// Cloning copies the reference, never the generator state.
#[derive(Debug, Clone)]
pub struct NoiseHolder {
    /// Registry id of the noise
    pub noise_id: Arc<str>,
    /// The shared generator
    pub noise: Arc<NormalNoise>,
}

impl NoiseHolder {
    /// Wraps a generator under `noise_id`.
    pub fn new(noise_id: impl Into<Arc<str>>, noise: Arc<NormalNoise>) -> Self {
        Self {
            noise_id: noise_id.into(),
            noise,
        }
    }

    /// Samples the generator.
    #[inline]
    #[must_use]
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise.get_value(x, y, z)
    }

    /// Upper bound on the absolute sampled value.
    #[inline]
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.noise.max_value()
    }
}

/// Non-owning reference to a registered graph: its name and root node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphHolder {
    /// Registered graph name, e.g. `twilightforest:raw_biome_terrain`
    pub name: Arc<str>,
    /// Root of the registered graph in the shared arena
    pub root: NodeId,
}

/// A density function node.
///
/// Evaluation dispatches on this enum directly; the string type tags from
/// [`type_name`](Self::type_name) are only used when (de)serializing.
#[derive(Debug, Clone)]
pub enum DensityFunction {
    /// A constant value.
    Constant(f64),

    /// Add two density functions.
    Add(NodeId, NodeId),

    /// Multiply two density functions.
    Mul(NodeId, NodeId),

    /// Take the minimum of two density functions.
    Min(NodeId, NodeId),

    /// Take the maximum of two density functions.
    Max(NodeId, NodeId),

    /// Absolute value.
    Abs(NodeId),

    /// Half negative: if v > 0 then v else v * 0.5
    HalfNegative(NodeId),

    /// Clamp the value to a range.
    Clamp {
        /// Input density function
        input: NodeId,
        /// Minimum value
        min: f64,
        /// Maximum value
        max: f64,
    },

    /// A Y-axis clamped gradient.
    ///
    /// Returns `from_value` at Y = `from_y`, `to_value` at Y = `to_y`,
    /// linearly interpolated between, clamped outside the range.
    YClampedGradient {
        /// Starting Y coordinate
        from_y: i32,
        /// Ending Y coordinate
        to_y: i32,
        /// Value at `from_y`
        from_value: f64,
        /// Value at `to_y`
        to_value: f64,
    },

    /// `from + delta * (to - from)`
    Lerp {
        /// Blend weight, usually clamped to [0, 1]
        delta: NodeId,
        /// Value at delta = 0
        from: NodeId,
        /// Value at delta = 1
        to: NodeId,
    },

    /// Sample from a noise generator.
    Noise {
        /// The noise to sample
        noise: NoiseHolder,
        /// XZ scale factor
        xz_scale: f64,
        /// Y scale factor
        y_scale: f64,
    },

    /// Evaluate the input at y = 0, memoized per column.
    FlatCache(NodeId),

    /// Sample the input at cell boundaries and lerp vertically between them.
    Interpolated(NodeId),

    /// Delegate to a registered graph.
    HolderHolder(GraphHolder),

    /// Biome-driven base terrain density.
    BiomeDriven(Box<TerrainDensityRouter>),

    /// Bias density toward or away from a focus point.
    Focused(FocusedDensity),

    /// Ellipsoidal shell with a hollow interior.
    HollowHill(HollowHill),

    /// Offset from whichever bound is nearer.
    CoordMin(AbsoluteDifference),

    /// Offset from whichever bound is farther.
    CoordMax(AbsoluteDifference),

    /// Square root of the input.
    Sqrt(NodeId),
}

impl DensityFunction {
    /// Namespaced type tag used by the serialized form.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Constant(_) => "minecraft:constant",
            Self::Add(..) => "minecraft:add",
            Self::Mul(..) => "minecraft:mul",
            Self::Min(..) => "minecraft:min",
            Self::Max(..) => "minecraft:max",
            Self::Abs(_) => "minecraft:abs",
            Self::HalfNegative(_) => "minecraft:half_negative",
            Self::Clamp { .. } => "minecraft:clamp",
            Self::YClampedGradient { .. } => "minecraft:y_clamped_gradient",
            Self::Lerp { .. } => "twilightforest:lerp",
            Self::Noise { .. } => "minecraft:noise",
            Self::FlatCache(_) => "minecraft:flat_cache",
            Self::Interpolated(_) => "minecraft:interpolated",
            // Holders serialize as a bare reference string, never as a tagged object
            Self::HolderHolder(_) => "minecraft:reference",
            Self::BiomeDriven(_) => "twilightforest:biome_driven",
            Self::Focused(_) => "twilightforest:focused",
            Self::HollowHill(_) => "twilightforest:hollow_hill",
            Self::CoordMin(_) => "twilightforest:coord_min",
            Self::CoordMax(_) => "twilightforest:coord_max",
            Self::Sqrt(_) => "twilightforest:sqrt",
        }
    }

    /// Direct children of this node, in field order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Self::Constant(_)
            | Self::YClampedGradient { .. }
            | Self::Noise { .. }
            | Self::HollowHill(_) => Vec::new(),
            Self::Add(a, b) | Self::Mul(a, b) | Self::Min(a, b) | Self::Max(a, b) => vec![*a, *b],
            Self::Abs(a)
            | Self::HalfNegative(a)
            | Self::FlatCache(a)
            | Self::Interpolated(a)
            | Self::Sqrt(a) => vec![*a],
            Self::Clamp { input, .. } => vec![*input],
            Self::Lerp { delta, from, to } => vec![*delta, *from, *to],
            Self::HolderHolder(holder) => vec![holder.root],
            Self::BiomeDriven(router) => vec![router.frequency, router.offset],
            Self::Focused(focused) => vec![focused.input],
            Self::CoordMin(diff) | Self::CoordMax(diff) => vec![diff.input],
        }
    }
}

/// Context for evaluating density functions at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityContext {
    /// X coordinate (block position)
    pub x: i32,
    /// Y coordinate (block position)
    pub y: i32,
    /// Z coordinate (block position)
    pub z: i32,
}

impl DensityContext {
    /// Create a new density context.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Same column, different height.
    #[must_use]
    pub const fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }
}
