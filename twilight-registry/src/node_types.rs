//! Density function type tags and their codecs.
//!
//! Type tags only matter when graphs cross the JSON boundary. Evaluation never
//! looks a tag up; it matches on the in-memory node enum.

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use twilight_utils::density::{DensityFunction, NodeId};

use crate::codec::{self, DecodeContext, EncodeContext};
use crate::error::RegistryError;
use crate::normalize_id;

/// Builds a node from the fields of its JSON object.
pub type DecodeFn =
    fn(&Map<String, Value>, &mut DecodeContext<'_>) -> Result<NodeId, RegistryError>;

/// Writes the fields of a node, without its `type` tag.
pub type EncodeFn =
    fn(&DensityFunction, &EncodeContext<'_>) -> Result<Map<String, Value>, RegistryError>;

/// The pair of functions registered for one type tag.
#[derive(Clone, Copy)]
pub struct NodeCodec {
    /// JSON fields → node
    pub decode: DecodeFn,
    /// node → JSON fields
    pub encode: EncodeFn,
}

impl NodeCodec {
    /// Pairs a decoder with an encoder.
    #[must_use]
    pub const fn new(decode: DecodeFn, encode: EncodeFn) -> Self {
        Self { decode, encode }
    }
}

impl std::fmt::Debug for NodeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NodeCodec")
    }
}

const VANILLA_TYPES: &[(&str, NodeCodec)] = &[
    ("minecraft:constant", NodeCodec::new(codec::decode_constant, codec::encode_constant)),
    ("minecraft:add", NodeCodec::new(codec::decode_add, codec::encode_binary)),
    ("minecraft:mul", NodeCodec::new(codec::decode_mul, codec::encode_binary)),
    ("minecraft:min", NodeCodec::new(codec::decode_min, codec::encode_binary)),
    ("minecraft:max", NodeCodec::new(codec::decode_max, codec::encode_binary)),
    ("minecraft:abs", NodeCodec::new(codec::decode_abs, codec::encode_unary)),
    ("minecraft:half_negative", NodeCodec::new(codec::decode_half_negative, codec::encode_unary)),
    ("minecraft:clamp", NodeCodec::new(codec::decode_clamp, codec::encode_clamp)),
    (
        "minecraft:y_clamped_gradient",
        NodeCodec::new(codec::decode_y_clamped_gradient, codec::encode_y_clamped_gradient),
    ),
    ("minecraft:noise", NodeCodec::new(codec::decode_noise, codec::encode_noise)),
    ("minecraft:flat_cache", NodeCodec::new(codec::decode_flat_cache, codec::encode_unary)),
    ("minecraft:interpolated", NodeCodec::new(codec::decode_interpolated, codec::encode_unary)),
];

const TWILIGHT_TYPES: &[(&str, NodeCodec)] = &[
    ("twilightforest:lerp", NodeCodec::new(codec::decode_lerp, codec::encode_lerp)),
    (
        "twilightforest:biome_driven",
        NodeCodec::new(codec::decode_biome_driven, codec::encode_biome_driven),
    ),
    ("twilightforest:focused", NodeCodec::new(codec::decode_focused, codec::encode_focused)),
    (
        "twilightforest:hollow_hill",
        NodeCodec::new(codec::decode_hollow_hill, codec::encode_hollow_hill),
    ),
    (
        "twilightforest:coord_min",
        NodeCodec::new(codec::decode_coord_min, codec::encode_absolute_difference),
    ),
    (
        "twilightforest:coord_max",
        NodeCodec::new(codec::decode_coord_max, codec::encode_absolute_difference),
    ),
    ("twilightforest:sqrt", NodeCodec::new(codec::decode_sqrt, codec::encode_unary)),
];

/// Registry mapping type tags to codecs.
#[derive(Debug, Default)]
pub struct NodeTypeRegistry {
    codecs: FxHashMap<String, NodeCodec>,
}

impl NodeTypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `minecraft:` combinators.
    ///
    /// # Errors
    /// Never in practice; the built-in tags are distinct.
    pub fn vanilla() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for (name, codec) in VANILLA_TYPES {
            registry.register(name, *codec)?;
        }
        Ok(registry)
    }

    /// A registry holding the vanilla combinators and the Twilight terrain nodes.
    ///
    /// # Errors
    /// Never in practice; the built-in tags are distinct.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::vanilla()?;
        registry.register_twilight_types()?;
        Ok(registry)
    }

    /// Adds the `twilightforest:` node types.
    ///
    /// # Errors
    /// `DuplicateType` if any of them is already registered.
    pub fn register_twilight_types(&mut self) -> Result<(), RegistryError> {
        for (name, codec) in TWILIGHT_TYPES {
            self.register(name, *codec)?;
        }
        Ok(())
    }

    /// Adds a type tag. Bare names get the `minecraft:` namespace.
    ///
    /// # Errors
    /// `DuplicateType` if the tag is taken.
    pub fn register(&mut self, name: &str, codec: NodeCodec) -> Result<(), RegistryError> {
        let name = normalize_id(name).into_owned();
        if self.codecs.contains_key(&name) {
            return Err(RegistryError::DuplicateType(name));
        }
        self.codecs.insert(name, codec);
        Ok(())
    }

    /// Finds the codec for a type tag.
    ///
    /// # Errors
    /// `UnknownType` if the tag is not registered.
    pub fn lookup(&self, name: &str) -> Result<&NodeCodec, RegistryError> {
        let name = normalize_id(name);
        self.codecs
            .get(name.as_ref())
            .ok_or_else(|| RegistryError::UnknownType(name.into_owned()))
    }

    /// Whether a type tag is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(normalize_id(name).as_ref())
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether no tag is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}
