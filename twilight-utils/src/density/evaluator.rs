//! Density graph evaluation.
//!
//! The evaluator is a read-only view of a [`DensityGraph`]; all mutable state of a
//! generation pass lives in the caller's [`EvalCache`].

use rustc_hash::FxHashMap;

use crate::density::graph::{DensityGraph, half_negative};
use crate::density::types::{DensityContext, DensityFunction, NodeId};
use crate::math::{clamp, floor_div, lerp, map_clamped};

/// Vertical size of an `interpolated` cell, in blocks.
pub const INTERPOLATION_CELL_HEIGHT: i32 = 8;

/// Per-pass memo for cache-bearing nodes.
///
/// Create one per column or per chunk and drop it when the pass ends. A cache
/// must not outlive the graph it was filled from.
#[derive(Debug, Default)]
pub struct EvalCache {
    /// `flat_cache` and `biome_driven`: (node, x, z) → value
    flat: FxHashMap<(NodeId, i32, i32), f64>,
    /// `interpolated` cell corners: (node, x, cell_y, z) → value
    cells: FxHashMap<(NodeId, i32, i32, i32), f64>,
}

impl EvalCache {
    /// Create a new empty evaluation cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every memoized value.
    pub fn clear(&mut self) {
        self.flat.clear();
        self.cells.clear();
    }

    /// Number of memoized values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flat.len() + self.cells.len()
    }

    /// Whether nothing has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.cells.is_empty()
    }
}

/// Evaluator for density graphs.
#[derive(Debug, Clone, Copy)]
pub struct DensityEvaluator<'a> {
    graph: &'a DensityGraph,
}

impl<'a> DensityEvaluator<'a> {
    /// Creates an evaluator over `graph`.
    #[must_use]
    pub const fn new(graph: &'a DensityGraph) -> Self {
        Self { graph }
    }

    /// Evaluate node `id` at the given context.
    ///
    /// Never fails for nodes pushed through [`DensityGraph::push`]. Negative
    /// input to `sqrt` is treated as zero.
    #[must_use]
    pub fn evaluate(&self, id: NodeId, ctx: &DensityContext, cache: &mut EvalCache) -> f64 {
        match &self.graph[id] {
            DensityFunction::Constant(v) => *v,

            DensityFunction::Add(a, b) => {
                self.evaluate(*a, ctx, cache) + self.evaluate(*b, ctx, cache)
            }

            DensityFunction::Mul(a, b) => {
                self.evaluate(*a, ctx, cache) * self.evaluate(*b, ctx, cache)
            }

            DensityFunction::Min(a, b) => self
                .evaluate(*a, ctx, cache)
                .min(self.evaluate(*b, ctx, cache)),

            DensityFunction::Max(a, b) => self
                .evaluate(*a, ctx, cache)
                .max(self.evaluate(*b, ctx, cache)),

            DensityFunction::Abs(a) => self.evaluate(*a, ctx, cache).abs(),

            DensityFunction::HalfNegative(a) => half_negative(self.evaluate(*a, ctx, cache)),

            DensityFunction::Clamp { input, min, max } => {
                clamp(self.evaluate(*input, ctx, cache), *min, *max)
            }

            DensityFunction::YClampedGradient {
                from_y,
                to_y,
                from_value,
                to_value,
            } => map_clamped(
                f64::from(ctx.y),
                f64::from(*from_y),
                f64::from(*to_y),
                *from_value,
                *to_value,
            ),

            DensityFunction::Lerp { delta, from, to } => {
                let delta = self.evaluate(*delta, ctx, cache);
                let from = self.evaluate(*from, ctx, cache);
                let to = self.evaluate(*to, ctx, cache);
                lerp(delta, from, to)
            }

            DensityFunction::Noise {
                noise,
                xz_scale,
                y_scale,
            } => noise.sample(
                f64::from(ctx.x) * xz_scale,
                f64::from(ctx.y) * y_scale,
                f64::from(ctx.z) * xz_scale,
            ),

            DensityFunction::FlatCache(input) => {
                let key = (id, ctx.x, ctx.z);
                if let Some(&value) = cache.flat.get(&key) {
                    return value;
                }
                let value = self.evaluate(*input, &ctx.with_y(0), cache);
                cache.flat.insert(key, value);
                value
            }

            DensityFunction::Interpolated(input) => self.interpolate(id, *input, ctx, cache),

            DensityFunction::HolderHolder(holder) => self.evaluate(holder.root, ctx, cache),

            DensityFunction::BiomeDriven(router) => {
                let key = (id, ctx.x, ctx.z);
                if let Some(&value) = cache.flat.get(&key) {
                    return value;
                }
                let column = ctx.with_y(0);
                let frequency = self.evaluate(router.frequency, &column, cache);
                let offset = self.evaluate(router.offset, &column, cache);
                let noise = router
                    .noise
                    .sample(f64::from(ctx.x), 0.0, f64::from(ctx.z));
                let biome = router.biome_density(ctx.x, ctx.z);
                let value = router.blend(biome, frequency, offset, noise);
                cache.flat.insert(key, value);
                value
            }

            DensityFunction::Focused(focused) => {
                focused.apply(self.evaluate(focused.input, ctx, cache), ctx)
            }

            DensityFunction::HollowHill(hill) => hill.density(ctx),

            DensityFunction::CoordMin(diff) => diff.nearest(self.evaluate(diff.input, ctx, cache)),

            DensityFunction::CoordMax(diff) => {
                diff.farthest(self.evaluate(diff.input, ctx, cache))
            }

            DensityFunction::Sqrt(input) => self.evaluate(*input, ctx, cache).max(0.0).sqrt(),
        }
    }

    /// Lerp between the two cell boundaries around `ctx.y`.
    fn interpolate(
        &self,
        id: NodeId,
        input: NodeId,
        ctx: &DensityContext,
        cache: &mut EvalCache,
    ) -> f64 {
        let cell_y = floor_div(ctx.y, INTERPOLATION_CELL_HEIGHT);
        let offset = ctx.y - cell_y * INTERPOLATION_CELL_HEIGHT;
        let below = self.cell_corner(id, input, ctx, cell_y, cache);
        if offset == 0 {
            return below;
        }
        let above = self.cell_corner(id, input, ctx, cell_y + 1, cache);
        lerp(
            f64::from(offset) / f64::from(INTERPOLATION_CELL_HEIGHT),
            below,
            above,
        )
    }

    fn cell_corner(
        &self,
        id: NodeId,
        input: NodeId,
        ctx: &DensityContext,
        cell_y: i32,
        cache: &mut EvalCache,
    ) -> f64 {
        let key = (id, ctx.x, cell_y, ctx.z);
        if let Some(&value) = cache.cells.get(&key) {
            return value;
        }
        // The top cell's upper boundary lies past i32::MAX and is pinned there
        let corner = ctx.with_y(cell_y.saturating_mul(INTERPOLATION_CELL_HEIGHT));
        let value = self.evaluate(input, &corner, cache);
        cache.cells.insert(key, value);
        value
    }
}
