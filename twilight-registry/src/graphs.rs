//! Named density function graphs.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use twilight_utils::density::{DensityGraph, GraphHolder, NodeId};

use crate::error::{DependencyKind, RegistryError};
use crate::normalize_id;

/// A registered graph: its name and its root in the shared arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredGraph {
    /// Namespaced name, e.g. `twilightforest:forested_terrain`
    pub name: Arc<str>,
    /// Root node
    pub root: NodeId,
}

impl RegisteredGraph {
    /// A non-owning reference to this graph, for use inside other graphs.
    #[must_use]
    pub fn holder(&self) -> GraphHolder {
        GraphHolder {
            name: Arc::clone(&self.name),
            root: self.root,
        }
    }
}

/// Registry of named graphs. Entries are validated on the way in and never change.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    graphs: FxHashMap<Arc<str>, RegisteredGraph>,
    order: Vec<Arc<str>>,
}

impl GraphRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the graph at `root` and registers it under `name`.
    ///
    /// # Errors
    /// `DuplicateGraph` if the name is taken, `InvalidGraph` if validation fails.
    pub fn register(
        &mut self,
        graph: &DensityGraph,
        name: &str,
        root: NodeId,
    ) -> Result<RegisteredGraph, RegistryError> {
        let name: Arc<str> = normalize_id(name).into();
        if self.graphs.contains_key(&name) {
            return Err(RegistryError::DuplicateGraph(name.to_string()));
        }
        graph.validate(root)?;

        let (min, max) = graph.bounds(root);
        log::debug!("registered {name} at node {root}, range [{min:.3}, {max:.3}]");

        let entry = RegisteredGraph {
            name: Arc::clone(&name),
            root,
        };
        self.graphs.insert(Arc::clone(&name), entry.clone());
        self.order.push(name);
        Ok(entry)
    }

    /// Looks up a graph by name.
    ///
    /// # Errors
    /// `MissingDependency` if the name is not registered.
    pub fn lookup(&self, name: &str) -> Result<RegisteredGraph, RegistryError> {
        let name = normalize_id(name);
        self.graphs
            .get(name.as_ref())
            .cloned()
            .ok_or_else(|| RegistryError::missing(DependencyKind::DensityFunction, name))
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.graphs.contains_key(normalize_id(name).as_ref())
    }

    /// Registered graphs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredGraph> {
        self.order.iter().filter_map(|name| self.graphs.get(name))
    }

    /// Number of registered graphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no graph is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
