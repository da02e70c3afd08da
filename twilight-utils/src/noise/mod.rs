//! Noise generation primitives.
//!
//! - [`ImprovedNoise`] - Base Perlin noise implementation
//! - [`PerlinNoise`] - Octave-based Perlin noise
//! - [`NormalNoise`] - Double Perlin noise, sampled by `noise` density nodes
//! - [`NoiseParameters`] - Serialized octave layout of a named noise

mod improved_noise;
mod normal_noise;
mod parameters;
mod perlin_noise;

pub use improved_noise::ImprovedNoise;
pub use normal_noise::{INPUT_FACTOR, NormalNoise};
pub use parameters::NoiseParameters;
pub use perlin_noise::PerlinNoise;
