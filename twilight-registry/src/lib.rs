//! Registries for Twilight terrain generation.
//!
//! - [`NodeTypeRegistry`] - density function type tags and their JSON codecs
//! - [`NoiseRegistry`] - seeded noise generators by id
//! - [`BiomeGridRegistry`] - biome influence grids by id
//! - [`GraphRegistry`] - named, validated density function graphs
//!
//! Registries are filled once at world bootstrap and only read afterwards.

use std::borrow::Cow;

pub mod biome_grids;
pub mod codec;
pub mod error;
pub mod graphs;
pub mod node_types;
pub mod noise_registry;

pub use biome_grids::BiomeGridRegistry;
pub use codec::{DecodeContext, EncodeContext};
pub use error::{DependencyKind, RegistryError};
pub use graphs::{GraphRegistry, RegisteredGraph};
pub use node_types::{NodeCodec, NodeTypeRegistry};
pub use noise_registry::NoiseRegistry;

/// Namespace applied to ids written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Adds the `minecraft:` namespace to bare ids.
#[must_use]
pub fn normalize_id(id: &str) -> Cow<'_, str> {
    if id.contains(':') {
        Cow::Borrowed(id)
    } else {
        Cow::Owned(format!("{DEFAULT_NAMESPACE}:{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("surface"), "minecraft:surface");
        assert_eq!(normalize_id("twilightforest:sqrt"), "twilightforest:sqrt");
    }
}
