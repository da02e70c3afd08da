//! Per-world generation state.

use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;
use twilight_registry::{
    BiomeGridRegistry, DecodeContext, EncodeContext, GraphRegistry, NodeTypeRegistry,
    NoiseRegistry, RegisteredGraph, RegistryError,
};
use twilight_utils::biome::BiomeInfluenceSource;
use twilight_utils::density::{DensityContext, DensityEvaluator, DensityGraph, EvalCache};

use crate::config::WorldGenConfig;
use crate::worldgen::biome_grid::CellularBiomeGrid;
use crate::worldgen::terrain::{BIOME_GRID, TerrainGraphs, bootstrap_terrain};

/// Everything needed to sample terrain density for one world.
///
/// Built once from a [`WorldGenConfig`]; after that every accessor is read-only
/// and the context can be shared across worker threads. Each worker brings its
/// own [`EvalCache`].
pub struct WorldGenContext {
    seed: u64,
    graph: DensityGraph,
    node_types: NodeTypeRegistry,
    noises: NoiseRegistry,
    biome_grids: BiomeGridRegistry,
    graphs: GraphRegistry,
    terrain: TerrainGraphs,
}

impl WorldGenContext {
    /// Builds the noises, the cellular biome grid and the terrain graphs for `config`.
    ///
    /// # Errors
    /// If the config is invalid or any terrain input fails to resolve.
    pub fn bootstrap(config: &WorldGenConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let grid = CellularBiomeGrid::new(config.seed, &config.biome_grid);
        Self::bootstrap_with_grid(config, Arc::new(grid))
    }

    /// Like [`bootstrap`](Self::bootstrap) but with a caller supplied biome grid.
    ///
    /// # Errors
    /// If a configured noise is duplicated or any terrain input fails to resolve.
    pub fn bootstrap_with_grid(
        config: &WorldGenConfig,
        grid: Arc<dyn BiomeInfluenceSource>,
    ) -> anyhow::Result<Self> {
        let noises = NoiseRegistry::from_parameters(config.seed, &config.noises)
            .context("failed to build noise registry")?;

        let mut biome_grids = BiomeGridRegistry::new();
        biome_grids.register(BIOME_GRID, grid)?;

        let node_types = NodeTypeRegistry::with_builtins()?;
        let mut graph = DensityGraph::new();
        let mut graphs = GraphRegistry::new();
        let terrain = bootstrap_terrain(&mut graph, &mut graphs, &noises, &biome_grids)
            .context("failed to assemble terrain graphs")?;

        log::info!(
            "world generation ready for seed {}: {} noises, {} graphs, {} nodes",
            config.seed,
            noises.len(),
            graphs.len(),
            graph.len()
        );

        Ok(Self {
            seed: config.seed,
            graph,
            node_types,
            noises,
            biome_grids,
            graphs,
            terrain,
        })
    }

    /// World seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The shared node arena.
    #[must_use]
    pub const fn graph(&self) -> &DensityGraph {
        &self.graph
    }

    /// Registered graphs.
    #[must_use]
    pub const fn graphs(&self) -> &GraphRegistry {
        &self.graphs
    }

    /// Seeded noises.
    #[must_use]
    pub const fn noises(&self) -> &NoiseRegistry {
        &self.noises
    }

    /// Registered biome grids.
    #[must_use]
    pub const fn biome_grids(&self) -> &BiomeGridRegistry {
        &self.biome_grids
    }

    /// Node type codecs used for JSON import and export.
    #[must_use]
    pub const fn node_types(&self) -> &NodeTypeRegistry {
        &self.node_types
    }

    /// The built-in terrain graphs.
    #[must_use]
    pub const fn terrain(&self) -> &TerrainGraphs {
        &self.terrain
    }

    /// Looks up a registered graph by name.
    ///
    /// # Errors
    /// If no graph has that name.
    pub fn lookup(&self, name: &str) -> anyhow::Result<RegisteredGraph> {
        Ok(self.graphs.lookup(name)?)
    }

    /// An evaluator over this world's arena.
    #[must_use]
    pub const fn evaluator(&self) -> DensityEvaluator<'_> {
        DensityEvaluator::new(&self.graph)
    }

    /// Evaluates `graph` at one block position.
    ///
    /// `cache` must only be shared between calls of the same generation pass.
    #[must_use]
    pub fn sample(
        &self,
        graph: &RegisteredGraph,
        x: i32,
        y: i32,
        z: i32,
        cache: &mut EvalCache,
    ) -> f64 {
        self.evaluator()
            .evaluate(graph.root, &DensityContext::new(x, y, z), cache)
    }

    /// Decodes a graph from JSON and registers it under `name`.
    ///
    /// Nodes decoded before a failure are dropped from the arena.
    ///
    /// # Errors
    /// On malformed JSON, unknown types or dependencies, or a graph that fails validation.
    pub fn load_graph_json(&mut self, name: &str, json: &str) -> anyhow::Result<RegisteredGraph> {
        let value: Value =
            serde_json::from_str(json).with_context(|| format!("graph {name} is not valid JSON"))?;

        let checkpoint = self.graph.len();
        let result = self.decode_and_register(name, &value);
        if result.is_err() {
            self.graph.truncate(checkpoint);
        }
        result.with_context(|| format!("failed to load graph {name}"))
    }

    fn decode_and_register(
        &mut self,
        name: &str,
        value: &Value,
    ) -> Result<RegisteredGraph, RegistryError> {
        let root = DecodeContext {
            graph: &mut self.graph,
            node_types: &self.node_types,
            noises: &self.noises,
            biome_grids: &self.biome_grids,
            graphs: &self.graphs,
        }
        .decode(value)?;
        self.graphs.register(&self.graph, name, root)
    }

    /// Encodes a registered graph as pretty-printed JSON.
    ///
    /// # Errors
    /// If the graph is unknown or holds a value JSON cannot represent.
    pub fn export_graph_json(&self, name: &str) -> anyhow::Result<String> {
        let entry = self.lookup(name)?;
        let value = EncodeContext {
            graph: &self.graph,
            node_types: &self.node_types,
        }
        .encode(entry.root)
        .with_context(|| format!("failed to encode graph {name}"))?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}
