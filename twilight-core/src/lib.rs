//! Twilight Forest terrain generation.
//!
//! Loads a [`WorldGenConfig`], assembles the Twilight density graphs and samples
//! them per column.

pub mod config;
pub mod worldgen;

pub use config::WorldGenConfig;
