//! Shared utilities for Twilight terrain generation.
//!
//! This crate holds the seed-dependent noise primitives and the density function
//! graph engine: the node arena, the evaluator and its per-pass cache.

pub mod biome;
pub mod density;
pub mod math;
pub mod noise;
pub mod random;
