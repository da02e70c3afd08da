//! Column caching of the ambient terrain noise.

use std::sync::Arc;

use twilight_core::WorldGenConfig;
use twilight_core::worldgen::{EvalCache, UniformBiomeGrid, WorldGenContext};
use twilight_utils::density::{DensityContext, DensityFunction, DensityGraph, NodeId};

fn context() -> WorldGenContext {
    WorldGenContext::bootstrap_with_grid(
        &WorldGenConfig::default().with_seed(5),
        Arc::new(UniformBiomeGrid::new(2.0)),
    )
    .unwrap()
}

fn flat_caches(graph: &DensityGraph) -> Vec<NodeId> {
    graph
        .iter()
        .filter(|(_, node)| matches!(node, DensityFunction::FlatCache(_)))
        .map(|(id, _)| id)
        .collect()
}

#[test]
fn ambient_noise_is_column_invariant() {
    let ctx = context();
    let caches = flat_caches(ctx.graph());
    assert_eq!(caches.len(), 1, "ambient noise is built once and shared");
    let ambient = caches[0];
    let evaluator = ctx.evaluator();

    for (x, z) in [(0, 0), (17, -3), (-1000, 4096), (31_337, -27)] {
        let low = evaluator.evaluate(ambient, &DensityContext::new(x, 5, z), &mut EvalCache::new());
        let high =
            evaluator.evaluate(ambient, &DensityContext::new(x, 97, z), &mut EvalCache::new());
        assert_eq!(low.to_bits(), high.to_bits());

        let mut shared = EvalCache::new();
        let first = evaluator.evaluate(ambient, &DensityContext::new(x, 5, z), &mut shared);
        let second = evaluator.evaluate(ambient, &DensityContext::new(x, 97, z), &mut shared);
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(first.to_bits(), low.to_bits());
    }
}

#[test]
fn ambient_noise_stays_within_its_bounds() {
    let ctx = context();
    let ambient = flat_caches(ctx.graph())[0];
    let (min, max) = ctx.graph().bounds(ambient);
    assert!(min < 1.0 && max > 0.0);

    let evaluator = ctx.evaluator();
    let mut cache = EvalCache::new();
    for x in (-512..512).step_by(37) {
        for z in (-512..512).step_by(41) {
            let v = evaluator.evaluate(ambient, &DensityContext::new(x, 0, z), &mut cache);
            assert!((min..=max).contains(&v));
        }
    }
}

#[test]
fn separate_passes_do_not_share_memos() {
    let mut graph = DensityGraph::new();
    let gradient = graph.y_clamped_gradient(0, 100, 0.0, 1.0);
    let flat = graph.flat_cache(gradient);
    let evaluator = twilight_utils::density::DensityEvaluator::new(&graph);

    let mut pass = EvalCache::new();
    let v = evaluator.evaluate(flat, &DensityContext::new(0, 50, 0), &mut pass);
    assert!(v.abs() < f64::EPSILON);
    assert_eq!(pass.len(), 1);
    pass.clear();
    assert!(pass.is_empty());
}
