//! Seeded noise instances keyed by id.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use twilight_utils::density::NoiseHolder;
use twilight_utils::noise::{NoiseParameters, NormalNoise};
use twilight_utils::random::RandomSplitter;

use crate::error::{DependencyKind, RegistryError};
use crate::normalize_id;

/// Noise generators built once per world seed.
#[derive(Debug, Default)]
pub struct NoiseRegistry {
    noises: FxHashMap<String, NoiseHolder>,
}

impl NoiseRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every noise in `parameters` from the world seed.
    ///
    /// # Errors
    /// `DuplicateEntry` if two ids normalize to the same name.
    pub fn from_parameters<'a, I, K>(seed: u64, parameters: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, &'a NoiseParameters)>,
        K: AsRef<str>,
    {
        let splitter = RandomSplitter::from_seed(seed);
        let mut registry = Self::new();
        for (id, params) in parameters {
            let id = normalize_id(id.as_ref());
            let noise = NormalNoise::from_parameters(&splitter, &id, params);
            log::debug!(
                "noise {id}: firstOctave {} with {} octaves, max {:.4}",
                params.first_octave,
                params.amplitudes.len(),
                noise.max_value()
            );
            registry.register(&id, noise)?;
        }
        Ok(registry)
    }

    /// Adds a prebuilt noise.
    ///
    /// # Errors
    /// `DuplicateEntry` if `id` is taken.
    pub fn register(&mut self, id: &str, noise: NormalNoise) -> Result<(), RegistryError> {
        let id = normalize_id(id);
        if self.noises.contains_key(id.as_ref()) {
            return Err(RegistryError::DuplicateEntry {
                kind: DependencyKind::Noise,
                id: id.into_owned(),
            });
        }
        let holder = NoiseHolder::new(id.as_ref(), Arc::new(noise));
        self.noises.insert(id.into_owned(), holder);
        Ok(())
    }

    /// Resolves a noise id to a shared holder.
    ///
    /// # Errors
    /// `MissingDependency` if the id is not registered.
    pub fn lookup(&self, id: &str) -> Result<NoiseHolder, RegistryError> {
        let id = normalize_id(id);
        self.noises
            .get(id.as_ref())
            .cloned()
            .ok_or_else(|| RegistryError::missing(DependencyKind::Noise, id))
    }

    /// Number of registered noises.
    #[must_use]
    pub fn len(&self) -> usize {
        self.noises.len()
    }

    /// Whether no noise is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.noises.is_empty()
    }
}
