//! The density graph arena.
//!
//! All nodes of a world's terrain graphs share one [`DensityGraph`]. Builders
//! push nodes bottom-up and get back a [`NodeId`]; because a node may only point
//! at nodes pushed before it, the arena is topologically ordered and analyses
//! like [`DensityGraph::bounds`] are a single forward pass.

use std::ops::Index;

use thiserror::Error;

use crate::density::terrain::{
    AbsoluteDifference, FocusedDensity, HollowHill, TerrainDensityRouter,
};
use crate::density::types::{DensityFunction, GraphHolder, NodeId, NoiseHolder};
use crate::math::clamp;

/// Structural problems found by [`DensityGraph::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A sqrt node whose input can go below zero.
    #[error("sqrt node {node} takes an input that can reach {min}")]
    NegativeSqrtDomain {
        /// The sqrt node
        node: NodeId,
        /// Lower bound of its input
        min: f64,
    },
    /// A node parameter outside its domain.
    #[error("{type_name} node {node}: {reason}")]
    InvalidParameter {
        /// The offending node
        node: NodeId,
        /// Its type tag
        type_name: &'static str,
        /// What is wrong
        reason: String,
    },
    /// A node naming a child that is not older than itself, or not in the arena.
    #[error("node {node} refers to {child}, which is not an earlier node")]
    DanglingReference {
        /// The referring node
        node: NodeId,
        /// The bad child
        child: NodeId,
    },
}

/// Arena of density function nodes.
#[derive(Debug, Clone, Default)]
pub struct DensityGraph {
    nodes: Vec<DensityFunction>,
}

impl DensityGraph {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its id.
    ///
    /// Every child of `node` must already be in the arena.
    pub fn push(&mut self, node: DensityFunction) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        debug_assert!(
            node.children().iter().all(|child| *child < id),
            "{} node refers to a node that does not exist yet",
            node.type_name()
        );
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&DensityFunction> {
        self.nodes.get(id.index())
    }

    /// Iterates over all nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DensityFunction)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i as u32), node))
    }

    /// Drops every node pushed after the first `len`.
    ///
    /// Used to roll back a partially built graph. Ids at or past `len` must not
    /// be referenced afterwards.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    // === Builders ===

    /// `minecraft:constant`
    pub fn constant(&mut self, value: f64) -> NodeId {
        self.push(DensityFunction::Constant(value))
    }

    /// `minecraft:add`
    pub fn add(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(DensityFunction::Add(a, b))
    }

    /// `minecraft:mul`
    pub fn mul(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(DensityFunction::Mul(a, b))
    }

    /// `minecraft:min`
    pub fn min(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(DensityFunction::Min(a, b))
    }

    /// `minecraft:max`
    pub fn max(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(DensityFunction::Max(a, b))
    }

    /// `minecraft:abs`
    pub fn abs(&mut self, input: NodeId) -> NodeId {
        self.push(DensityFunction::Abs(input))
    }

    /// `minecraft:half_negative`
    pub fn half_negative(&mut self, input: NodeId) -> NodeId {
        self.push(DensityFunction::HalfNegative(input))
    }

    /// `minecraft:clamp`
    pub fn clamp(&mut self, input: NodeId, min: f64, max: f64) -> NodeId {
        self.push(DensityFunction::Clamp { input, min, max })
    }

    /// `minecraft:y_clamped_gradient`
    pub fn y_clamped_gradient(
        &mut self,
        from_y: i32,
        to_y: i32,
        from_value: f64,
        to_value: f64,
    ) -> NodeId {
        self.push(DensityFunction::YClampedGradient {
            from_y,
            to_y,
            from_value,
            to_value,
        })
    }

    /// `twilightforest:lerp`
    pub fn lerp(&mut self, delta: NodeId, from: NodeId, to: NodeId) -> NodeId {
        self.push(DensityFunction::Lerp { delta, from, to })
    }

    /// `minecraft:noise`
    pub fn noise(&mut self, noise: NoiseHolder, xz_scale: f64, y_scale: f64) -> NodeId {
        self.push(DensityFunction::Noise {
            noise,
            xz_scale,
            y_scale,
        })
    }

    /// `minecraft:flat_cache`
    pub fn flat_cache(&mut self, input: NodeId) -> NodeId {
        self.push(DensityFunction::FlatCache(input))
    }

    /// `minecraft:interpolated`
    pub fn interpolated(&mut self, input: NodeId) -> NodeId {
        self.push(DensityFunction::Interpolated(input))
    }

    /// A reference to a registered graph.
    pub fn holder(&mut self, holder: GraphHolder) -> NodeId {
        self.push(DensityFunction::HolderHolder(holder))
    }

    /// `twilightforest:biome_driven`
    pub fn biome_driven(&mut self, router: TerrainDensityRouter) -> NodeId {
        self.push(DensityFunction::BiomeDriven(Box::new(router)))
    }

    /// `twilightforest:focused`
    pub fn focused(&mut self, focused: FocusedDensity) -> NodeId {
        self.push(DensityFunction::Focused(focused))
    }

    /// `twilightforest:hollow_hill`
    pub fn hollow_hill(&mut self, hill: HollowHill) -> NodeId {
        self.push(DensityFunction::HollowHill(hill))
    }

    /// `twilightforest:coord_min`
    pub fn coord_min(&mut self, diff: AbsoluteDifference) -> NodeId {
        self.push(DensityFunction::CoordMin(diff))
    }

    /// `twilightforest:coord_max`
    pub fn coord_max(&mut self, diff: AbsoluteDifference) -> NodeId {
        self.push(DensityFunction::CoordMax(diff))
    }

    /// `twilightforest:sqrt`
    pub fn sqrt(&mut self, input: NodeId) -> NodeId {
        self.push(DensityFunction::Sqrt(input))
    }

    // === Analysis ===

    /// Conservative output range of a node: every value it can produce lies inside.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> (f64, f64) {
        self.range_table(id)[id.index()]
    }

    /// Whether the node's output can change along a column.
    #[must_use]
    pub fn depends_on_y(&self, id: NodeId) -> bool {
        self.y_dependence_table(id)[id.index()]
    }

    /// Checks the graph rooted at `root` before it is registered.
    ///
    /// Fails on dangling children, out-of-domain parameters and sqrt nodes whose
    /// input range reaches below zero. A flat cache over a y-dependent subgraph is
    /// only logged, since it is wrong but still evaluates.
    ///
    /// # Errors
    /// The first problem found, in node order.
    pub fn validate(&self, root: NodeId) -> Result<(), GraphError> {
        let reachable = self.reachable(root)?;
        let ranges = self.range_table(root);
        let y_dependence = self.y_dependence_table(root);

        for id in reachable {
            let node = &self.nodes[id.index()];
            check_parameters(id, node)?;
            match node {
                DensityFunction::Sqrt(input) => {
                    let (min, _) = ranges[input.index()];
                    if min.is_nan() || min < 0.0 {
                        return Err(GraphError::NegativeSqrtDomain { node: id, min });
                    }
                }
                DensityFunction::FlatCache(input) if y_dependence[input.index()] => {
                    log::warn!(
                        "flat_cache node {id} wraps a y-dependent subgraph ({}); its column memo only reflects y = 0",
                        self.nodes[input.index()].type_name()
                    );
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Nodes reachable from `root`, in arena order.
    fn reachable(&self, root: NodeId) -> Result<Vec<NodeId>, GraphError> {
        if root.index() >= self.nodes.len() {
            return Err(GraphError::DanglingReference {
                node: root,
                child: root,
            });
        }

        let mut seen = vec![false; root.index() + 1];
        let mut stack = vec![root];
        seen[root.index()] = true;
        while let Some(id) = stack.pop() {
            for child in self.nodes[id.index()].children() {
                if child >= id {
                    return Err(GraphError::DanglingReference { node: id, child });
                }
                if !seen[child.index()] {
                    seen[child.index()] = true;
                    stack.push(child);
                }
            }
        }

        Ok(seen
            .iter()
            .enumerate()
            .filter(|(_, seen)| **seen)
            .map(|(i, _)| NodeId::new(i as u32))
            .collect())
    }

    fn range_table(&self, upto: NodeId) -> Vec<(f64, f64)> {
        let mut table = Vec::with_capacity(upto.index() + 1);
        for node in &self.nodes[..=upto.index()] {
            let range = node_range(node, &table);
            table.push(range);
        }
        table
    }

    fn y_dependence_table(&self, upto: NodeId) -> Vec<bool> {
        let mut table: Vec<bool> = Vec::with_capacity(upto.index() + 1);
        for node in &self.nodes[..=upto.index()] {
            let depends = match node {
                DensityFunction::Constant(_)
                | DensityFunction::FlatCache(_)
                | DensityFunction::BiomeDriven(_) => false,
                DensityFunction::YClampedGradient { .. }
                | DensityFunction::Focused(_)
                | DensityFunction::HollowHill(_) => true,
                DensityFunction::Noise { y_scale, .. } => *y_scale != 0.0,
                other => other.children().iter().any(|child| table[child.index()]),
            };
            table.push(depends);
        }
        table
    }
}

impl Index<NodeId> for DensityGraph {
    type Output = DensityFunction;

    fn index(&self, id: NodeId) -> &DensityFunction {
        &self.nodes[id.index()]
    }
}

fn node_range(node: &DensityFunction, table: &[(f64, f64)]) -> (f64, f64) {
    let range = |id: &NodeId| table[id.index()];
    match node {
        DensityFunction::Constant(v) => (*v, *v),
        DensityFunction::Add(a, b) => {
            let (a, b) = (range(a), range(b));
            (a.0 + b.0, a.1 + b.1)
        }
        DensityFunction::Mul(a, b) => {
            let (a, b) = (range(a), range(b));
            extremes(&[a.0 * b.0, a.0 * b.1, a.1 * b.0, a.1 * b.1])
        }
        DensityFunction::Min(a, b) => {
            let (a, b) = (range(a), range(b));
            (a.0.min(b.0), a.1.min(b.1))
        }
        DensityFunction::Max(a, b) => {
            let (a, b) = (range(a), range(b));
            (a.0.max(b.0), a.1.max(b.1))
        }
        DensityFunction::Abs(a) => {
            let (min, max) = range(a);
            if min >= 0.0 {
                (min, max)
            } else if max <= 0.0 {
                (-max, -min)
            } else {
                (0.0, max.max(-min))
            }
        }
        DensityFunction::HalfNegative(a) => {
            let (min, max) = range(a);
            (half_negative(min), half_negative(max))
        }
        DensityFunction::Clamp { input, min, max } => {
            let (lo, hi) = range(input);
            (clamp(lo, *min, *max), clamp(hi, *min, *max))
        }
        DensityFunction::YClampedGradient {
            from_value,
            to_value,
            ..
        } => (from_value.min(*to_value), from_value.max(*to_value)),
        DensityFunction::Lerp { delta, from, to } => {
            let (d, f, t) = (range(delta), range(from), range(to));
            let mut corners = Vec::with_capacity(8);
            for delta in [d.0, d.1] {
                for from in [f.0, f.1] {
                    for to in [t.0, t.1] {
                        corners.push(from + delta * (to - from));
                    }
                }
            }
            extremes(&corners)
        }
        DensityFunction::Noise { noise, .. } => (-noise.max_value(), noise.max_value()),
        DensityFunction::FlatCache(a) | DensityFunction::Interpolated(a) => range(a),
        DensityFunction::HolderHolder(holder) => range(&holder.root),
        DensityFunction::BiomeDriven(router) => {
            (router.lower_density_bound, router.upper_density_bound)
        }
        DensityFunction::Focused(focused) => {
            let (min, max) = range(&focused.input);
            (
                min + focused.strength.min(0.0),
                max + focused.strength.max(0.0),
            )
        }
        DensityFunction::HollowHill(_) => (-1.0, 1.0),
        DensityFunction::CoordMin(diff) | DensityFunction::CoordMax(diff) => {
            diff.bounds(range(&diff.input))
        }
        DensityFunction::Sqrt(a) => {
            let (min, max) = range(a);
            (min.max(0.0).sqrt(), max.max(0.0).sqrt())
        }
    }
}

#[inline]
pub(crate) fn half_negative(v: f64) -> f64 {
    if v > 0.0 { v } else { v * 0.5 }
}

fn extremes(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

fn check_parameters(id: NodeId, node: &DensityFunction) -> Result<(), GraphError> {
    let invalid = |reason: String| GraphError::InvalidParameter {
        node: id,
        type_name: node.type_name(),
        reason,
    };

    match node {
        DensityFunction::Constant(v) if !v.is_finite() => {
            Err(invalid(format!("value {v} is not finite")))
        }
        DensityFunction::Clamp { min, max, .. } if !(min <= max) => {
            Err(invalid(format!("min {min} is above max {max}")))
        }
        DensityFunction::YClampedGradient { from_y, to_y, .. } if from_y == to_y => {
            Err(invalid(format!("from_y and to_y are both {from_y}")))
        }
        DensityFunction::Noise {
            xz_scale, y_scale, ..
        } if !xz_scale.is_finite() || !y_scale.is_finite() => Err(invalid(format!(
            "scales ({xz_scale}, {y_scale}) must be finite"
        ))),
        DensityFunction::BiomeDriven(router) => {
            if !(router.lower_density_bound <= router.upper_density_bound) {
                Err(invalid(format!(
                    "lower bound {} is above upper bound {}",
                    router.lower_density_bound, router.upper_density_bound
                )))
            } else if !(router.smoothing >= 0.0 && router.smoothing.is_finite()) {
                Err(invalid(format!(
                    "smoothing {} must be a non-negative number",
                    router.smoothing
                )))
            } else {
                Ok(())
            }
        }
        DensityFunction::Focused(focused) if !(focused.radius > 0.0) => {
            Err(invalid(format!("radius {} must be positive", focused.radius)))
        }
        DensityFunction::HollowHill(hill) => {
            if !(hill.radius > 0.0) {
                Err(invalid(format!("radius {} must be positive", hill.radius)))
            } else if !(hill.thickness > 0.0 && hill.thickness <= hill.radius) {
                Err(invalid(format!(
                    "thickness {} must be in (0, {}]",
                    hill.thickness, hill.radius
                )))
            } else if !(hill.y_scale > 0.0) {
                Err(invalid(format!("y_scale {} must be positive", hill.y_scale)))
            } else {
                Ok(())
            }
        }
        DensityFunction::CoordMin(diff) | DensityFunction::CoordMax(diff)
            if !diff.lower.is_finite() || !diff.upper.is_finite() =>
        {
            Err(invalid(format!(
                "bounds ({}, {}) must be finite",
                diff.lower, diff.upper
            )))
        }
        _ => Ok(()),
    }
}
