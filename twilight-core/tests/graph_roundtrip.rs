//! JSON export and import of density graphs.

use std::sync::Arc;

use twilight_core::WorldGenConfig;
use twilight_core::worldgen::{
    EvalCache, FORESTED_TERRAIN, RAW_BIOME_TERRAIN, SKYLIGHT_TERRAIN, UniformBiomeGrid,
    WorldGenContext,
};
use twilight_registry::RegisteredGraph;

const POSITIONS: [(i32, i32, i32); 8] = [
    (0, 0, 0),
    (1, 63, -1),
    (-17, 64, 250),
    (4096, -31, -4096),
    (-123_456, 100, 654_321),
    (7, 255, 7),
    (8, 256, 9),
    (-9, -64, 300),
];

fn context() -> WorldGenContext {
    WorldGenContext::bootstrap_with_grid(
        &WorldGenConfig::default().with_seed(8_675_309),
        Arc::new(UniformBiomeGrid::new(1.8)),
    )
    .unwrap()
}

fn assert_bit_exact(ctx: &WorldGenContext, a: &RegisteredGraph, b: &RegisteredGraph) {
    for (x, y, z) in POSITIONS {
        let va = ctx.sample(a, x, y, z, &mut EvalCache::new());
        let vb = ctx.sample(b, x, y, z, &mut EvalCache::new());
        assert_eq!(
            va.to_bits(),
            vb.to_bits(),
            "{} vs {} at ({x}, {y}, {z}): {va} != {vb}",
            a.name,
            b.name
        );
    }
}

#[test]
fn arithmetic_graph_roundtrips_bit_exact() {
    let mut ctx = context();
    let json = r#"{
        "type": "minecraft:clamp",
        "min": -0.1,
        "max": 1.0,
        "input": {
            "type": "minecraft:add",
            "argument1": {
                "type": "minecraft:mul",
                "argument1": 0.16666667163372040,
                "argument2": {
                    "type": "minecraft:y_clamped_gradient",
                    "from_y": -31,
                    "to_y": 256,
                    "from_value": 31.0,
                    "to_value": -256.0
                }
            },
            "argument2": {
                "type": "minecraft:half_negative",
                "argument": {
                    "type": "minecraft:min",
                    "argument1": 0.1,
                    "argument2": {"type": "minecraft:abs", "argument": -0.30000000000000004}
                }
            }
        }
    }"#;
    let original = ctx.load_graph_json("test:arithmetic", json).unwrap();
    let exported = ctx.export_graph_json("test:arithmetic").unwrap();
    let reloaded = ctx.load_graph_json("test:arithmetic_again", &exported).unwrap();

    assert_bit_exact(&ctx, &original, &reloaded);
    assert_eq!(exported, ctx.export_graph_json("test:arithmetic_again").unwrap());
}

#[test]
fn builtin_terrain_roundtrips() {
    let mut ctx = context();
    for name in [RAW_BIOME_TERRAIN, FORESTED_TERRAIN, SKYLIGHT_TERRAIN] {
        let exported = ctx.export_graph_json(name).unwrap();
        let copy_name = format!("test:{}", name.trim_start_matches("twilightforest:"));
        let copy = ctx.load_graph_json(&copy_name, &exported).unwrap();
        let original = ctx.lookup(name).unwrap();
        assert_bit_exact(&ctx, &original, &copy);
    }
}

#[test]
fn terrain_exports_reference_raw_by_name() {
    let ctx = context();
    let exported = ctx.export_graph_json(FORESTED_TERRAIN).unwrap();
    assert!(exported.contains("\"twilightforest:raw_biome_terrain\""));
    assert!(exported.contains("\"twilightforest:lerp\""));
    assert!(!exported.contains("twilightforest:biome_driven"));
}
