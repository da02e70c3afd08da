#![allow(missing_docs)]
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use twilight_utils::density::{DensityContext, DensityEvaluator, DensityGraph, EvalCache, NoiseHolder};
use twilight_utils::noise::{NoiseParameters, NormalNoise};
use twilight_utils::random::RandomSplitter;

const SEED: u64 = 12345;
const MIN_Y: i32 = -64;
const MAX_Y: i32 = 320;

fn ridge_noise() -> NormalNoise {
    let splitter = RandomSplitter::from_seed(SEED);
    NormalNoise::from_parameters(&splitter, "minecraft:ridge", &NoiseParameters::ridge())
}

fn bench_noise_sampling(c: &mut Criterion) {
    let noise = ridge_noise();
    c.bench_function("normal_noise_get_value", |b| {
        b.iter(|| black_box(noise.get_value(black_box(123.5), black_box(0.0), black_box(-456.25))));
    });
}

/// An interpolated noise column blended with a height ramp.
fn column_graph() -> (DensityGraph, twilight_utils::density::NodeId) {
    let mut graph = DensityGraph::new();
    let ridge = NoiseHolder::new("minecraft:ridge", Arc::new(ridge_noise()));
    let noise = graph.noise(ridge, 1.0, 0.5);
    let flat = graph.flat_cache(noise);
    let gradient = graph.y_clamped_gradient(MIN_Y, MAX_Y, 1.0, -1.0);
    let sum = graph.add(flat, gradient);
    let interpolated = graph.interpolated(sum);
    let root = graph.clamp(interpolated, -1.0, 1.0);
    (graph, root)
}

fn bench_column_evaluation(c: &mut Criterion) {
    let (graph, root) = column_graph();
    let evaluator = DensityEvaluator::new(&graph);

    c.bench_function("interpolated_column", |b| {
        b.iter(|| {
            let mut cache = EvalCache::new();
            let mut total = 0.0;
            for y in MIN_Y..=MAX_Y {
                total += evaluator.evaluate(root, &DensityContext::new(7, y, -3), &mut cache);
            }
            black_box(total)
        });
    });
}

criterion_group!(benches, bench_noise_sampling, bench_column_evaluation);
criterion_main!(benches);
