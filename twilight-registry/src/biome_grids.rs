//! Biome influence grids keyed by id.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use twilight_utils::biome::{BiomeGridRef, BiomeInfluenceSource};

use crate::error::{DependencyKind, RegistryError};
use crate::normalize_id;

/// Registry of biome influence grids.
#[derive(Debug, Default)]
pub struct BiomeGridRegistry {
    grids: FxHashMap<String, BiomeGridRef>,
}

impl BiomeGridRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a grid under `id`.
    ///
    /// # Errors
    /// `DuplicateEntry` if `id` is taken.
    pub fn register(
        &mut self,
        id: &str,
        source: Arc<dyn BiomeInfluenceSource>,
    ) -> Result<(), RegistryError> {
        let id = normalize_id(id).into_owned();
        if self.grids.contains_key(&id) {
            return Err(RegistryError::DuplicateEntry {
                kind: DependencyKind::BiomeGrid,
                id,
            });
        }
        let (min, max) = source.range();
        log::debug!("biome grid {id}: signal in [{min}, {max}]");
        self.grids.insert(id.clone(), BiomeGridRef::new(id, source));
        Ok(())
    }

    /// Resolves a grid id.
    ///
    /// # Errors
    /// `MissingDependency` if the id is not registered.
    pub fn lookup(&self, id: &str) -> Result<BiomeGridRef, RegistryError> {
        let id = normalize_id(id);
        self.grids
            .get(id.as_ref())
            .cloned()
            .ok_or_else(|| RegistryError::missing(DependencyKind::BiomeGrid, id))
    }

    /// Number of registered grids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// Whether no grid is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(f64);

    impl BiomeInfluenceSource for Flat {
        fn sample(&self, _x: i32, _z: i32) -> f64 {
            self.0
        }

        fn range(&self) -> (f64, f64) {
            (self.0, self.0)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = BiomeGridRegistry::new();
        registry
            .register("twilightforest:biome_grid", Arc::new(Flat(2.0)))
            .unwrap();
        let grid = registry.lookup("twilightforest:biome_grid").unwrap();
        assert_eq!(&*grid.grid_id, "twilightforest:biome_grid");
        assert!((grid.sample(10, -10) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_and_missing() {
        let mut registry = BiomeGridRegistry::new();
        registry.register("twilightforest:grid", Arc::new(Flat(0.0))).unwrap();
        assert!(matches!(
            registry.register("twilightforest:grid", Arc::new(Flat(1.0))),
            Err(RegistryError::DuplicateEntry { kind: DependencyKind::BiomeGrid, .. })
        ));
        assert!(matches!(
            registry.lookup("twilightforest:other"),
            Err(RegistryError::MissingDependency { kind: DependencyKind::BiomeGrid, .. })
        ));
    }
}
