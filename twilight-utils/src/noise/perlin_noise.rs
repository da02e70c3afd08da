//! Octave-based Perlin noise.
//!
//! This combines multiple `ImprovedNoise` instances at different frequencies (octaves)
//! to create more natural-looking noise with detail at multiple scales.

use rand::Rng;

use crate::noise::ImprovedNoise;
use crate::random::RandomSplitter;

/// Round-off constant for coordinate wrapping to prevent precision loss.
/// This is 2^25 = 33554432.
const ROUND_OFF: f64 = 33_554_432.0;

/// Octave-based Perlin noise generator.
///
/// Combines multiple [`ImprovedNoise`] instances at different frequencies
/// to create noise with detail at multiple scales.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    /// Noise generators for each octave (None if amplitude is 0)
    noise_levels: Vec<Option<ImprovedNoise>>,
    /// Amplitude multipliers for each octave
    amplitudes: Vec<f64>,
    /// Factor applied to input coordinates for the lowest frequency octave
    lowest_freq_input_factor: f64,
    /// Factor applied to output values for the lowest frequency octave
    lowest_freq_value_factor: f64,
    /// Upper bound on the absolute output value
    max_value: f64,
}

impl PerlinNoise {
    /// Create a new [`PerlinNoise`] from a splitter.
    ///
    /// Each octave gets its seed from `splitter.with_hash_of("octave_{level}")`.
    #[must_use]
    pub fn create(splitter: &RandomSplitter, first_octave: i32, amplitudes: &[f64]) -> Self {
        let noise_levels = amplitudes
            .iter()
            .zip(first_octave..)
            .map(|(&amplitude, octave)| {
                (amplitude != 0.0).then(|| {
                    let mut octave_random = splitter.with_hash_of(&format!("octave_{octave}"));
                    ImprovedNoise::new(&mut octave_random)
                })
            })
            .collect();

        Self::from_parts(noise_levels, amplitudes, first_octave)
    }

    /// Create a new [`PerlinNoise`] from a sequential random source.
    ///
    /// Forks a splitter off `random` first, so two calls on the same source
    /// produce different noises.
    #[must_use]
    pub fn create_from_random<R: Rng + ?Sized>(
        random: &mut R,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let splitter = RandomSplitter::fork(random);
        Self::create(&splitter, first_octave, amplitudes)
    }

    fn from_parts(
        noise_levels: Vec<Option<ImprovedNoise>>,
        amplitudes: &[f64],
        first_octave: i32,
    ) -> Self {
        let octaves = amplitudes.len() as i32;

        // lowest_freq_input_factor = 2^first_octave
        let lowest_freq_input_factor = 2.0_f64.powi(first_octave);

        // lowest_freq_value_factor = 2^(octaves-1) / (2^octaves - 1)
        let lowest_freq_value_factor =
            2.0_f64.powi(octaves - 1) / (2.0_f64.powi(octaves) - 1.0);

        let max_value = Self::edge_value(amplitudes, lowest_freq_value_factor, 2.0);

        Self {
            noise_levels,
            amplitudes: amplitudes.to_vec(),
            lowest_freq_input_factor,
            lowest_freq_value_factor,
            max_value,
        }
    }

    /// Calculate the theoretical maximum value for the given amplitudes.
    fn edge_value(amplitudes: &[f64], lowest_freq_value_factor: f64, noise_value: f64) -> f64 {
        let mut value = 0.0;
        let mut value_factor = lowest_freq_value_factor;

        for &amplitude in amplitudes {
            if amplitude != 0.0 {
                value += amplitude.abs() * noise_value * value_factor;
            }
            value_factor /= 2.0;
        }

        value
    }

    /// Sample the noise at the given coordinates.
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut value = 0.0;
        let mut input_factor = self.lowest_freq_input_factor;
        let mut value_factor = self.lowest_freq_value_factor;

        for (noise, amplitude) in self.noise_levels.iter().zip(&self.amplitudes) {
            if let Some(noise) = noise {
                let noise_val = noise.noise(
                    wrap(x * input_factor),
                    wrap(y * input_factor),
                    wrap(z * input_factor),
                );
                value += amplitude * noise_val * value_factor;
            }

            input_factor *= 2.0;
            value_factor /= 2.0;
        }

        value
    }

    /// Get the maximum possible output value.
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }
}

/// Wrap a coordinate to prevent precision loss at large values.
#[inline]
#[must_use]
fn wrap(x: f64) -> f64 {
    x - (x / ROUND_OFF + 0.5).floor() * ROUND_OFF
}
