//! World generation configuration.
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid config that
//! reproduces the stock Twilight terrain for seed 0.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};
use twilight_utils::noise::NoiseParameters;

/// Top-level world generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// World seed
    pub seed: u64,
    /// Noise id → octave layout
    pub noises: BTreeMap<String, NoiseParameters>,
    /// The biome influence grid
    pub biome_grid: BiomeGridConfig,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            noises: BTreeMap::from([
                ("minecraft:surface".to_string(), NoiseParameters::surface()),
                ("minecraft:ridge".to_string(), NoiseParameters::ridge()),
            ]),
            biome_grid: BiomeGridConfig::default(),
        }
    }
}

/// Settings of the cellular biome influence grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeGridConfig {
    /// Edge length of one biome cell, in blocks
    pub cell_size: i32,
    /// Biomes a cell can pick from, with their terrain density
    pub palette: Vec<BiomeDensity>,
}

impl Default for BiomeGridConfig {
    fn default() -> Self {
        let palette = [
            ("twilightforest:stream", 0.4),
            ("twilightforest:lake", 0.0),
            ("twilightforest:twilight_forest", 1.6),
            ("twilightforest:dense_forest", 2.0),
            ("twilightforest:firefly_forest", 1.8),
            ("twilightforest:mushroom_forest", 1.7),
            ("twilightforest:dark_forest", 1.9),
            ("twilightforest:snowy_forest", 2.4),
            ("twilightforest:fire_swamp", 1.2),
            ("twilightforest:highlands", 7.5),
            ("twilightforest:thornlands", 9.5),
        ]
        .into_iter()
        .map(|(name, density)| BiomeDensity {
            name: name.to_string(),
            density,
        })
        .collect();

        Self {
            cell_size: 64,
            palette,
        }
    }
}

/// One palette entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeDensity {
    /// Biome id
    pub name: String,
    /// Biome influence signal inside cells of this biome
    pub density: f64,
}

impl WorldGenConfig {
    /// Reads and validates a config file.
    ///
    /// # Errors
    /// If the file cannot be read, is not valid JSON, or fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in config {}", path.display()))
    }

    /// Parses and validates a config from JSON text.
    ///
    /// # Errors
    /// If the JSON is malformed or the config fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: Self =
            serde_json::from_str(json).context("failed to parse world generation config")?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    /// On a non-positive cell size, an empty palette, a non-finite density or a
    /// noise without amplitudes.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.biome_grid.cell_size > 0,
            "biome_grid.cell_size must be positive, got {}",
            self.biome_grid.cell_size
        );
        ensure!(
            !self.biome_grid.palette.is_empty(),
            "biome_grid.palette must not be empty"
        );
        for entry in &self.biome_grid.palette {
            ensure!(
                entry.density.is_finite(),
                "biome {} has a non-finite density",
                entry.name
            );
        }
        for (id, params) in &self.noises {
            ensure!(!params.amplitudes.is_empty(), "noise {id} has no amplitudes");
        }
        Ok(())
    }
}
