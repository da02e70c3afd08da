//! Datapack noise parameters.

use serde::{Deserialize, Serialize};

/// Octave layout of a named noise, as stored under `worldgen/noise/*.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseParameters {
    /// Octave of the first amplitude (negative means lower frequency)
    #[serde(rename = "firstOctave")]
    pub first_octave: i32,
    /// Amplitude per octave, starting at `first_octave`
    pub amplitudes: Vec<f64>,
}

impl NoiseParameters {
    /// Creates a parameter set.
    #[must_use]
    pub const fn new(first_octave: i32, amplitudes: Vec<f64>) -> Self {
        Self {
            first_octave,
            amplitudes,
        }
    }

    /// `minecraft:surface`
    #[must_use]
    pub fn surface() -> Self {
        Self::new(-6, vec![1.0, 1.0, 1.0])
    }

    /// `minecraft:ridge`
    #[must_use]
    pub fn ridge() -> Self {
        Self::new(-7, vec![1.0, 2.0, 1.0, 0.0, 0.0, 0.0])
    }
}
