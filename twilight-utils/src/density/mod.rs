//! Density function graphs.
//!
//! Density functions are pure scalar fields over block positions, composed
//! from small operators into a DAG. They are stored in a [`DensityGraph`] arena
//! and evaluated with a [`DensityEvaluator`] that threads a per-pass
//! [`EvalCache`] through every call.
//!
//! # Key Types
//!
//! - [`DensityFunction`] - The node enum with all operation types
//! - [`DensityGraph`] - Node arena, builders and range analysis
//! - [`DensityEvaluator`] - Walks a graph at a position
//! - [`DensityContext`] - The position context for evaluation

mod evaluator;
mod graph;
mod terrain;
mod types;

pub use evaluator::{DensityEvaluator, EvalCache, INTERPOLATION_CELL_HEIGHT};
pub use graph::{DensityGraph, GraphError};
pub use terrain::{
    AbsoluteDifference, FocusedDensity, HollowHill, ROUTER_NOISE_WEIGHT, TerrainDensityRouter,
};
pub use types::{DensityContext, DensityFunction, GraphHolder, NodeId, NoiseHolder};
