//! Normal (double Perlin) noise.
//!
//! This combines two `PerlinNoise` samplers with slightly different coordinate scaling
//! to create smoother, more natural-looking noise. Every `noise` density node samples one.

use rand::Rng;

use crate::noise::{NoiseParameters, PerlinNoise};
use crate::random::RandomSplitter;

/// Input factor for the second Perlin sampler.
///
/// The second sampler's coordinates are multiplied by this factor so the two
/// lattices never line up.
#[allow(clippy::unreadable_literal)]
pub const INPUT_FACTOR: f64 = 1.0181268882175227;

/// Target standard deviation of the combined output (1/6).
#[allow(clippy::unreadable_literal)]
const TARGET_DEVIATION: f64 = 0.16666666666666666;

/// Normal (double Perlin) noise generator.
#[derive(Debug, Clone)]
pub struct NormalNoise {
    first: PerlinNoise,
    /// Coordinates scaled by `INPUT_FACTOR`
    second: PerlinNoise,
    value_factor: f64,
    max_value: f64,
}

impl NormalNoise {
    /// Create a new `NormalNoise` from a sequential random source.
    ///
    /// The two samplers are forked one after the other, so they get different seeds.
    #[must_use]
    pub fn create_from_random<R: Rng + ?Sized>(
        random: &mut R,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let first = PerlinNoise::create_from_random(random, first_octave, amplitudes);
        let second = PerlinNoise::create_from_random(random, first_octave, amplitudes);

        Self::finish(first, second, amplitudes)
    }

    /// Create the noise named `noise_id` from the world splitter.
    #[must_use]
    pub fn create(
        splitter: &RandomSplitter,
        noise_id: &str,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let mut random = splitter.with_hash_of(noise_id);
        Self::create_from_random(&mut random, first_octave, amplitudes)
    }

    /// Create the noise named `noise_id` from its datapack parameters.
    #[must_use]
    pub fn from_parameters(
        splitter: &RandomSplitter,
        noise_id: &str,
        parameters: &NoiseParameters,
    ) -> Self {
        Self::create(
            splitter,
            noise_id,
            parameters.first_octave,
            &parameters.amplitudes,
        )
    }

    fn finish(first: PerlinNoise, second: PerlinNoise, amplitudes: &[f64]) -> Self {
        // Span of non-zero octaves
        let mut min_octave = i32::MAX;
        let mut max_octave = i32::MIN;
        for (i, &amp) in amplitudes.iter().enumerate() {
            if amp != 0.0 {
                min_octave = min_octave.min(i as i32);
                max_octave = max_octave.max(i as i32);
            }
        }

        // All-zero amplitudes produce a constant zero noise
        let value_factor = if min_octave > max_octave {
            0.0
        } else {
            TARGET_DEVIATION / expected_deviation(max_octave - min_octave)
        };
        let max_value = (first.max_value() + second.max_value()) * value_factor;

        Self {
            first,
            second,
            value_factor,
            max_value,
        }
    }

    /// Sample the noise at the given coordinates.
    #[inline]
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let x2 = x * INPUT_FACTOR;
        let y2 = y * INPUT_FACTOR;
        let z2 = z * INPUT_FACTOR;
        (self.first.get_value(x, y, z) + self.second.get_value(x2, y2, z2)) * self.value_factor
    }

    /// Get the maximum possible output value.
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }
}

/// Formula: 0.1 * (1 + 1/(span + 1))
#[inline]
fn expected_deviation(octave_span: i32) -> f64 {
    0.1 * (1.0 + 1.0 / f64::from(octave_span + 1))
}
