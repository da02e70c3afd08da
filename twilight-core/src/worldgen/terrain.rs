//! Assembly of the Twilight terrain graphs.
//!
//! Runs once per world. The raw biome density is registered first and reused
//! by both terrain graphs through a holder node, and the ambient noise subgraph
//! is built once and shared by both.

use twilight_registry::{BiomeGridRegistry, GraphRegistry, NoiseRegistry, RegisteredGraph, RegistryError};
use twilight_utils::biome::BiomeGridRef;
use twilight_utils::density::{DensityGraph, NodeId, NoiseHolder, TerrainDensityRouter};

/// Biome-driven base density, before any height shaping.
pub const RAW_BIOME_TERRAIN: &str = "twilightforest:raw_biome_terrain";
/// Final density of the forest dimension surface.
pub const FORESTED_TERRAIN: &str = "twilightforest:forested_terrain";
/// Final density of the floating-island variant.
pub const SKYLIGHT_TERRAIN: &str = "twilightforest:skylight_terrain";

/// Biome influence grid the router reads.
pub const BIOME_GRID: &str = "twilightforest:biome_grid";
/// Noise blended into the router and driving the ambient blend weight.
pub const SURFACE_NOISE: &str = "minecraft:surface";
/// Noise sampled at two frequencies for the ambient terrain.
pub const RIDGE_NOISE: &str = "minecraft:ridge";

/// The three registered terrain graphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGraphs {
    /// `twilightforest:raw_biome_terrain`
    pub raw_biome_terrain: RegisteredGraph,
    /// `twilightforest:forested_terrain`
    pub forested_terrain: RegisteredGraph,
    /// `twilightforest:skylight_terrain`
    pub skylight_terrain: RegisteredGraph,
}

/// Resolves the terrain inputs, then builds and registers all terrain graphs.
///
/// # Errors
/// `MissingDependency` if a noise or the biome grid is not registered, and any
/// registration error from the graph registry.
pub fn bootstrap_terrain(
    graph: &mut DensityGraph,
    graphs: &mut GraphRegistry,
    noises: &NoiseRegistry,
    biome_grids: &BiomeGridRegistry,
) -> Result<TerrainGraphs, RegistryError> {
    let grid = biome_grids.lookup(BIOME_GRID)?;
    let surface = noises.lookup(SURFACE_NOISE)?;
    let ridge = noises.lookup(RIDGE_NOISE)?;

    let raw_biome_terrain = make_biome_density_raw(graph, graphs, grid, surface.clone())?;
    let raw = graph.holder(raw_biome_terrain.holder());
    let ambient = make_ambient_noise_2d(graph, &surface, &ridge);

    let forested = make_forested_terrain(graph, raw, ambient);
    let forested_terrain = graphs.register(graph, FORESTED_TERRAIN, forested)?;

    let skylight = make_skylight_terrain(graph, raw, ambient);
    let skylight_terrain = graphs.register(graph, SKYLIGHT_TERRAIN, skylight)?;

    Ok(TerrainGraphs {
        raw_biome_terrain,
        forested_terrain,
        skylight_terrain,
    })
}

/// Registers the biome router as `twilightforest:raw_biome_terrain`.
///
/// # Errors
/// If the name is taken or the router fails validation.
pub fn make_biome_density_raw(
    graph: &mut DensityGraph,
    graphs: &mut GraphRegistry,
    grid: BiomeGridRef,
    surface: NoiseHolder,
) -> Result<RegisteredGraph, RegistryError> {
    let frequency = graph.constant(8.0);
    let offset = graph.constant(-1.25);
    let router = graph.biome_driven(TerrainDensityRouter {
        grid,
        noise: surface,
        lower_density_bound: -31.0,
        upper_density_bound: 64.0,
        smoothing: 1.0,
        frequency,
        offset,
    });
    graphs.register(graph, RAW_BIOME_TERRAIN, router)
}

/// `0.5 + 0.5 * input`, squeezing [-1, 1] into [0, 1].
pub fn mul_add_half(graph: &mut DensityGraph, input: NodeId) -> NodeId {
    let half = graph.constant(0.5);
    let scaled = graph.mul(half, input);
    let offset = graph.constant(0.5);
    graph.add(offset, scaled)
}

/// Column-invariant ambient noise: a surface-noise weighted blend of wide and thin ridges.
pub fn make_ambient_noise_2d(
    graph: &mut DensityGraph,
    surface: &NoiseHolder,
    ridge: &NoiseHolder,
) -> NodeId {
    let interpolator = graph.noise(surface.clone(), 1.0, 0.0);
    let interpolator = mul_add_half(graph, interpolator);
    let wide = graph.noise(ridge.clone(), 1.0, 0.0);
    let wide = mul_add_half(graph, wide);
    let thin = graph.noise(ridge.clone(), 4.0, 0.0);
    let thin = mul_add_half(graph, thin);

    let weight = graph.clamp(interpolator, 0.0, 1.0);
    let jittered = graph.lerp(weight, wide, thin);
    graph.flat_cache(jittered)
}

/// The ramp shared by both terrain graphs: 31 below y = -31, -256 above y = 256, `-y` between.
pub fn terrain_gradient(graph: &mut DensityGraph) -> NodeId {
    graph.y_clamped_gradient(-31, 256, 31.0, -256.0)
}

/// Builds the forested terrain root without registering it.
pub fn make_forested_terrain(graph: &mut DensityGraph, raw: NodeId, ambient: NodeId) -> NodeId {
    // f32 1/6 widened, as the datapack value was authored
    let scale = graph.constant(f64::from(1.0_f32 / 6.0));
    let gradient = terrain_gradient(graph);
    let shaped = graph.add(raw, gradient);
    let landscape = graph.mul(scale, shaped);

    let zero = graph.constant(0.0);
    let ambient = graph.max(zero, ambient);
    let ambient = graph.interpolated(ambient);

    let density = graph.add(landscape, ambient);
    graph.clamp(density, -0.1, 1.0)
}

/// Builds the skylight terrain root without registering it.
///
/// Where raw biome density changes quickly between neighboring columns the
/// biome term jumps too, stretching islands into vertical walls at biome edges.
pub fn make_skylight_terrain(graph: &mut DensityGraph, raw: NodeId, ambient: NodeId) -> NodeId {
    let minus_half = graph.constant(-0.5);
    let centered = graph.add(minus_half, ambient);
    let five = graph.constant(5.0);
    let stretched = graph.mul(centered, five);
    let island = graph.add(minus_half, stretched);
    let island = graph.interpolated(island);
    let island = graph.clamp(island, 0.0, 2.0);
    let island = graph.sqrt(island);

    let gradient = terrain_gradient(graph);
    let shaped = graph.add(raw, gradient);
    let minus_one = graph.constant(-1.0);
    let inverted = graph.mul(shaped, minus_one);
    let inverted = graph.half_negative(inverted);
    let magnitude = graph.abs(inverted);
    let quarter = graph.constant(-0.25);
    let biome_density = graph.mul(quarter, magnitude);

    let density = graph.add(island, biome_density);
    graph.clamp(density, -0.1, 1.0)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use twilight_utils::density::{DensityContext, DensityEvaluator, EvalCache};
    use twilight_utils::noise::NoiseParameters;

    use super::*;
    use crate::worldgen::biome_grid::UniformBiomeGrid;

    fn eval(graph: &DensityGraph, id: NodeId, y: i32) -> f64 {
        DensityEvaluator::new(graph).evaluate(id, &DensityContext::new(3, y, -5), &mut EvalCache::new())
    }

    #[test]
    fn test_mul_add_half() {
        let mut graph = DensityGraph::new();
        let expected = [(-1.0, 0.0), (0.0, 0.5), (1.0, 1.0), (-0.5, 0.25)];
        for (input, output) in expected {
            let x = graph.constant(input);
            let rescaled = mul_add_half(&mut graph, x);
            let v = eval(&graph, rescaled, 0);
            assert!((v - output).abs() < f64::EPSILON, "rescale({input}) = {v}");
        }

        // Monotonic over [-1, 1]
        let mut previous = f64::NEG_INFINITY;
        for i in -100..=100 {
            let x = graph.constant(f64::from(i) / 100.0);
            let rescaled = mul_add_half(&mut graph, x);
            let v = eval(&graph, rescaled, 0);
            assert!(v >= previous);
            assert!((0.0..=1.0).contains(&v));
            previous = v;
        }
    }

    #[test]
    fn test_forested_scale_is_widened_f32() {
        let mut graph = DensityGraph::new();
        let raw = graph.constant(0.0);
        let ambient = graph.constant(0.0);
        let root = make_forested_terrain(&mut graph, raw, ambient);
        // At y = 0 the gradient is 0, so only the ambient term remains
        assert!(eval(&graph, root, 0).abs() < f64::EPSILON);
        // At y = -3 the landscape term is 3 * (1/6 as f32)
        let v = eval(&graph, root, -3);
        assert!((v - 3.0 * f64::from(1.0_f32 / 6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_skylight_island_term() {
        let mut graph = DensityGraph::new();
        // raw + gradient = 0 at y = 0, leaving only the island term
        let raw = graph.constant(0.0);
        let ambient = graph.constant(0.8);
        let root = make_skylight_terrain(&mut graph, raw, ambient);
        // -0.5 + (0.8 - 0.5) * 5 = 1, sqrt(1) = 1
        assert!((eval(&graph, root, 0) - 1.0).abs() < 1e-12);

        // Deep below, the biome term dominates and the clamp floors it
        assert!((eval(&graph, root, -64) + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_bootstrap_registers_three_graphs() {
        let noises = NoiseRegistry::from_parameters(
            11,
            [
                (SURFACE_NOISE, &NoiseParameters::surface()),
                (RIDGE_NOISE, &NoiseParameters::ridge()),
            ],
        )
        .unwrap();
        let mut grids = BiomeGridRegistry::new();
        grids.register(BIOME_GRID, Arc::new(UniformBiomeGrid::new(1.6))).unwrap();

        let mut graph = DensityGraph::new();
        let mut graphs = GraphRegistry::new();
        let terrain = bootstrap_terrain(&mut graph, &mut graphs, &noises, &grids).unwrap();

        assert_eq!(graphs.len(), 3);
        assert_eq!(graphs.lookup(FORESTED_TERRAIN).unwrap(), terrain.forested_terrain);
        assert_eq!(graph.bounds(terrain.raw_biome_terrain.root), (-31.0, 64.0));
        let (lo, hi) = graph.bounds(terrain.skylight_terrain.root);
        assert!(lo >= -0.1 && hi <= 1.0);
    }

    #[test]
    fn test_missing_inputs_fail_fast() {
        let noises = NoiseRegistry::from_parameters(
            11,
            [(SURFACE_NOISE, &NoiseParameters::surface())],
        )
        .unwrap();
        let mut grids = BiomeGridRegistry::new();
        grids.register(BIOME_GRID, Arc::new(UniformBiomeGrid::new(1.6))).unwrap();

        let mut graph = DensityGraph::new();
        let mut graphs = GraphRegistry::new();
        let err = bootstrap_terrain(&mut graph, &mut graphs, &noises, &grids).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingDependency { ref id, .. } if id == RIDGE_NOISE
        ));
        assert!(graphs.is_empty());
        assert!(graph.is_empty());
    }
}
