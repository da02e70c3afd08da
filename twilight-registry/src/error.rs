//! Registry and graph loading errors.

use std::fmt;

use thiserror::Error;
use twilight_utils::density::GraphError;

/// What kind of registry entry a lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// A noise in the noise registry
    Noise,
    /// A biome influence grid
    BiomeGrid,
    /// A registered density function graph
    DensityFunction,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Noise => "noise",
            Self::BiomeGrid => "biome grid",
            Self::DensityFunction => "density function",
        })
    }
}

/// Errors raised while building registries or loading graphs.
///
/// All of them are fatal to world bootstrap; there is no fallback terrain.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A node type tag registered twice.
    #[error("density function type {0} is already registered")]
    DuplicateType(String),
    /// A node type tag with no codec.
    #[error("unknown density function type {0}")]
    UnknownType(String),
    /// A noise, grid or graph that is not registered.
    #[error("missing {kind} {id}")]
    MissingDependency {
        /// Which registry was searched
        kind: DependencyKind,
        /// The id that was not found
        id: String,
    },
    /// A noise or grid id registered twice.
    #[error("{kind} {id} is already registered")]
    DuplicateEntry {
        /// Which registry rejected it
        kind: DependencyKind,
        /// The duplicated id
        id: String,
    },
    /// A graph name registered twice.
    #[error("density function {0} is already registered")]
    DuplicateGraph(String),
    /// A serialized node missing fields or carrying the wrong field types.
    #[error("malformed {type_name} node: {reason}")]
    MalformedNode {
        /// Type tag of the node, or the JSON kind when there is no tag
        type_name: String,
        /// What is wrong
        reason: String,
    },
    /// A graph rejected by validation.
    #[error("invalid density function graph: {0}")]
    InvalidGraph(#[from] GraphError),
    /// Graph JSON that does not parse.
    #[error("invalid density function JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    pub(crate) fn missing(kind: DependencyKind, id: impl Into<String>) -> Self {
        Self::MissingDependency {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn malformed(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedNode {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}
