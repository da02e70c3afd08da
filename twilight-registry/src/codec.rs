//! JSON form of density function graphs.
//!
//! The format follows datapack density functions: a bare number is a constant,
//! a bare string references a registered graph, and an object carries a `type`
//! tag plus that type's fields. Children are decoded before their parent, so
//! the resulting nodes keep the arena's oldest-first ordering.

use serde_json::{Map, Number, Value};
use twilight_utils::density::{
    AbsoluteDifference, DensityFunction, DensityGraph, FocusedDensity, HollowHill, NodeId,
    TerrainDensityRouter,
};

use crate::biome_grids::BiomeGridRegistry;
use crate::error::RegistryError;
use crate::graphs::GraphRegistry;
use crate::node_types::NodeTypeRegistry;
use crate::noise_registry::NoiseRegistry;

/// Everything a decoder may need: the arena to push into and the registries to resolve against.
pub struct DecodeContext<'a> {
    /// Arena receiving the decoded nodes
    pub graph: &'a mut DensityGraph,
    /// Type tag → codec
    pub node_types: &'a NodeTypeRegistry,
    /// Noise ids
    pub noises: &'a NoiseRegistry,
    /// Biome grid ids
    pub biome_grids: &'a BiomeGridRegistry,
    /// Graph names for bare string references
    pub graphs: &'a GraphRegistry,
}

impl DecodeContext<'_> {
    /// Decodes one JSON value into the arena and returns the new node.
    ///
    /// # Errors
    /// `UnknownType` for an unregistered tag, `MissingDependency` for an unknown
    /// noise, grid or graph, and `MalformedNode` for missing or mistyped fields.
    pub fn decode(&mut self, value: &Value) -> Result<NodeId, RegistryError> {
        match value {
            Value::Number(n) => {
                let v = n.as_f64().ok_or_else(|| {
                    RegistryError::malformed("minecraft:constant", format!("{n} is not an f64"))
                })?;
                Ok(self.graph.constant(v))
            }
            Value::String(name) => {
                let entry = self.graphs.lookup(name)?;
                Ok(self.graph.holder(entry.holder()))
            }
            Value::Object(map) => {
                let type_name = map.get("type").and_then(Value::as_str).ok_or_else(|| {
                    RegistryError::malformed("object", "missing string field \"type\"")
                })?;
                let codec = *self.node_types.lookup(type_name)?;
                (codec.decode)(map, self)
            }
            other => Err(RegistryError::malformed(
                "json",
                format!("expected a number, string or object, got {other}"),
            )),
        }
    }
}

/// Read access for encoders.
pub struct EncodeContext<'a> {
    /// Arena holding the nodes
    pub graph: &'a DensityGraph,
    /// Type tag → codec
    pub node_types: &'a NodeTypeRegistry,
}

impl EncodeContext<'_> {
    /// Encodes the subgraph rooted at `id`.
    ///
    /// Holder nodes become bare reference strings and constants bare numbers.
    /// Other shared subgraphs are written out once per use.
    ///
    /// # Errors
    /// `UnknownType` if a node's tag is not registered, `MalformedNode` for
    /// values JSON cannot hold (non-finite floats).
    pub fn encode(&self, id: NodeId) -> Result<Value, RegistryError> {
        let node = self.graph.get(id).ok_or_else(|| {
            RegistryError::malformed("reference", format!("node {id} is not in the arena"))
        })?;
        match node {
            DensityFunction::Constant(v) => number("minecraft:constant", *v),
            DensityFunction::HolderHolder(holder) => Ok(Value::String(holder.name.to_string())),
            _ => {
                let type_name = node.type_name();
                let codec = self.node_types.lookup(type_name)?;
                let mut fields = Map::new();
                fields.insert("type".to_string(), Value::String(type_name.to_string()));
                fields.extend((codec.encode)(node, self)?);
                Ok(Value::Object(fields))
            }
        }
    }
}

// === Field access ===

fn field<'v>(
    map: &'v Map<String, Value>,
    type_name: &str,
    key: &str,
) -> Result<&'v Value, RegistryError> {
    map.get(key)
        .ok_or_else(|| RegistryError::malformed(type_name, format!("missing field \"{key}\"")))
}

fn f64_field(map: &Map<String, Value>, type_name: &str, key: &str) -> Result<f64, RegistryError> {
    field(map, type_name, key)?
        .as_f64()
        .ok_or_else(|| RegistryError::malformed(type_name, format!("field \"{key}\" is not a number")))
}

fn i32_field(map: &Map<String, Value>, type_name: &str, key: &str) -> Result<i32, RegistryError> {
    field(map, type_name, key)?
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| {
            RegistryError::malformed(type_name, format!("field \"{key}\" is not a 32-bit integer"))
        })
}

fn str_field<'v>(
    map: &'v Map<String, Value>,
    type_name: &str,
    key: &str,
) -> Result<&'v str, RegistryError> {
    field(map, type_name, key)?
        .as_str()
        .ok_or_else(|| RegistryError::malformed(type_name, format!("field \"{key}\" is not a string")))
}

fn node_field(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
    type_name: &str,
    key: &str,
) -> Result<NodeId, RegistryError> {
    ctx.decode(field(map, type_name, key)?)
}

fn number(type_name: &str, v: f64) -> Result<Value, RegistryError> {
    Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| RegistryError::malformed(type_name, format!("{v} cannot be written as JSON")))
}

fn fields<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn mismatch(node: &DensityFunction, codec: &str) -> RegistryError {
    RegistryError::malformed(node.type_name(), format!("cannot be written by the {codec} codec"))
}

// === Vanilla combinators ===

pub(crate) fn decode_constant(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    let value = f64_field(map, "minecraft:constant", "argument")?;
    Ok(ctx.graph.constant(value))
}

pub(crate) fn encode_constant(
    node: &DensityFunction,
    _ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    match node {
        DensityFunction::Constant(v) => {
            Ok(fields([("argument", number(node.type_name(), *v)?)]))
        }
        _ => Err(mismatch(node, "constant")),
    }
}

fn decode_binary(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
    type_name: &str,
    make: fn(NodeId, NodeId) -> DensityFunction,
) -> Result<NodeId, RegistryError> {
    let a = node_field(map, ctx, type_name, "argument1")?;
    let b = node_field(map, ctx, type_name, "argument2")?;
    Ok(ctx.graph.push(make(a, b)))
}

pub(crate) fn decode_add(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    decode_binary(map, ctx, "minecraft:add", DensityFunction::Add)
}

pub(crate) fn decode_mul(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    decode_binary(map, ctx, "minecraft:mul", DensityFunction::Mul)
}

pub(crate) fn decode_min(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    decode_binary(map, ctx, "minecraft:min", DensityFunction::Min)
}

pub(crate) fn decode_max(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    decode_binary(map, ctx, "minecraft:max", DensityFunction::Max)
}

pub(crate) fn encode_binary(
    node: &DensityFunction,
    ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    match node {
        DensityFunction::Add(a, b)
        | DensityFunction::Mul(a, b)
        | DensityFunction::Min(a, b)
        | DensityFunction::Max(a, b) => Ok(fields([
            ("argument1", ctx.encode(*a)?),
            ("argument2", ctx.encode(*b)?),
        ])),
        _ => Err(mismatch(node, "binary")),
    }
}

fn decode_unary(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
    type_name: &str,
    make: fn(NodeId) -> DensityFunction,
) -> Result<NodeId, RegistryError> {
    let argument = node_field(map, ctx, type_name, "argument")?;
    Ok(ctx.graph.push(make(argument)))
}

pub(crate) fn decode_abs(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    decode_unary(map, ctx, "minecraft:abs", DensityFunction::Abs)
}

pub(crate) fn decode_half_negative(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    decode_unary(map, ctx, "minecraft:half_negative", DensityFunction::HalfNegative)
}

pub(crate) fn decode_flat_cache(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    decode_unary(map, ctx, "minecraft:flat_cache", DensityFunction::FlatCache)
}

pub(crate) fn decode_interpolated(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    decode_unary(map, ctx, "minecraft:interpolated", DensityFunction::Interpolated)
}

pub(crate) fn decode_sqrt(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    decode_unary(map, ctx, "twilightforest:sqrt", DensityFunction::Sqrt)
}

pub(crate) fn encode_unary(
    node: &DensityFunction,
    ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    match node {
        DensityFunction::Abs(a)
        | DensityFunction::HalfNegative(a)
        | DensityFunction::FlatCache(a)
        | DensityFunction::Interpolated(a)
        | DensityFunction::Sqrt(a) => Ok(fields([("argument", ctx.encode(*a)?)])),
        _ => Err(mismatch(node, "unary")),
    }
}

pub(crate) fn decode_clamp(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    const TYPE: &str = "minecraft:clamp";
    let input = node_field(map, ctx, TYPE, "input")?;
    let min = f64_field(map, TYPE, "min")?;
    let max = f64_field(map, TYPE, "max")?;
    Ok(ctx.graph.clamp(input, min, max))
}

pub(crate) fn encode_clamp(
    node: &DensityFunction,
    ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    let DensityFunction::Clamp { input, min, max } = node else {
        return Err(mismatch(node, "clamp"));
    };
    let type_name = node.type_name();
    Ok(fields([
        ("input", ctx.encode(*input)?),
        ("min", number(type_name, *min)?),
        ("max", number(type_name, *max)?),
    ]))
}

pub(crate) fn decode_y_clamped_gradient(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    const TYPE: &str = "minecraft:y_clamped_gradient";
    Ok(ctx.graph.y_clamped_gradient(
        i32_field(map, TYPE, "from_y")?,
        i32_field(map, TYPE, "to_y")?,
        f64_field(map, TYPE, "from_value")?,
        f64_field(map, TYPE, "to_value")?,
    ))
}

pub(crate) fn encode_y_clamped_gradient(
    node: &DensityFunction,
    _ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    let DensityFunction::YClampedGradient {
        from_y,
        to_y,
        from_value,
        to_value,
    } = node
    else {
        return Err(mismatch(node, "y_clamped_gradient"));
    };
    let type_name = node.type_name();
    Ok(fields([
        ("from_y", Value::from(*from_y)),
        ("to_y", Value::from(*to_y)),
        ("from_value", number(type_name, *from_value)?),
        ("to_value", number(type_name, *to_value)?),
    ]))
}

pub(crate) fn decode_noise(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    const TYPE: &str = "minecraft:noise";
    let noise = ctx.noises.lookup(str_field(map, TYPE, "noise")?)?;
    let xz_scale = f64_field(map, TYPE, "xz_scale")?;
    let y_scale = f64_field(map, TYPE, "y_scale")?;
    Ok(ctx.graph.noise(noise, xz_scale, y_scale))
}

pub(crate) fn encode_noise(
    node: &DensityFunction,
    _ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    let DensityFunction::Noise {
        noise,
        xz_scale,
        y_scale,
    } = node
    else {
        return Err(mismatch(node, "noise"));
    };
    let type_name = node.type_name();
    Ok(fields([
        ("noise", Value::String(noise.noise_id.to_string())),
        ("xz_scale", number(type_name, *xz_scale)?),
        ("y_scale", number(type_name, *y_scale)?),
    ]))
}

// === Twilight nodes ===

pub(crate) fn decode_lerp(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    const TYPE: &str = "twilightforest:lerp";
    let delta = node_field(map, ctx, TYPE, "delta")?;
    let from = node_field(map, ctx, TYPE, "from")?;
    let to = node_field(map, ctx, TYPE, "to")?;
    Ok(ctx.graph.lerp(delta, from, to))
}

pub(crate) fn encode_lerp(
    node: &DensityFunction,
    ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    let DensityFunction::Lerp { delta, from, to } = node else {
        return Err(mismatch(node, "lerp"));
    };
    Ok(fields([
        ("delta", ctx.encode(*delta)?),
        ("from", ctx.encode(*from)?),
        ("to", ctx.encode(*to)?),
    ]))
}

pub(crate) fn decode_biome_driven(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    const TYPE: &str = "twilightforest:biome_driven";
    let grid = ctx.biome_grids.lookup(str_field(map, TYPE, "biome_grid")?)?;
    let noise = ctx.noises.lookup(str_field(map, TYPE, "noise")?)?;
    let lower_density_bound = f64_field(map, TYPE, "lower_density_bound")?;
    let upper_density_bound = f64_field(map, TYPE, "upper_density_bound")?;
    let smoothing = f64_field(map, TYPE, "smoothing")?;
    let frequency = node_field(map, ctx, TYPE, "frequency")?;
    let offset = node_field(map, ctx, TYPE, "offset")?;
    Ok(ctx.graph.biome_driven(TerrainDensityRouter {
        grid,
        noise,
        lower_density_bound,
        upper_density_bound,
        smoothing,
        frequency,
        offset,
    }))
}

pub(crate) fn encode_biome_driven(
    node: &DensityFunction,
    ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    let DensityFunction::BiomeDriven(router) = node else {
        return Err(mismatch(node, "biome_driven"));
    };
    let type_name = node.type_name();
    Ok(fields([
        ("biome_grid", Value::String(router.grid.grid_id.to_string())),
        ("noise", Value::String(router.noise.noise_id.to_string())),
        ("lower_density_bound", number(type_name, router.lower_density_bound)?),
        ("upper_density_bound", number(type_name, router.upper_density_bound)?),
        ("smoothing", number(type_name, router.smoothing)?),
        ("frequency", ctx.encode(router.frequency)?),
        ("offset", ctx.encode(router.offset)?),
    ]))
}

pub(crate) fn decode_focused(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    const TYPE: &str = "twilightforest:focused";
    let input = node_field(map, ctx, TYPE, "input")?;
    Ok(ctx.graph.focused(FocusedDensity {
        input,
        focus_x: f64_field(map, TYPE, "focus_x")?,
        focus_y: f64_field(map, TYPE, "focus_y")?,
        focus_z: f64_field(map, TYPE, "focus_z")?,
        radius: f64_field(map, TYPE, "radius")?,
        strength: f64_field(map, TYPE, "strength")?,
    }))
}

pub(crate) fn encode_focused(
    node: &DensityFunction,
    ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    let DensityFunction::Focused(focused) = node else {
        return Err(mismatch(node, "focused"));
    };
    let type_name = node.type_name();
    Ok(fields([
        ("input", ctx.encode(focused.input)?),
        ("focus_x", number(type_name, focused.focus_x)?),
        ("focus_y", number(type_name, focused.focus_y)?),
        ("focus_z", number(type_name, focused.focus_z)?),
        ("radius", number(type_name, focused.radius)?),
        ("strength", number(type_name, focused.strength)?),
    ]))
}

pub(crate) fn decode_hollow_hill(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    const TYPE: &str = "twilightforest:hollow_hill";
    Ok(ctx.graph.hollow_hill(HollowHill {
        center_x: f64_field(map, TYPE, "center_x")?,
        center_y: f64_field(map, TYPE, "center_y")?,
        center_z: f64_field(map, TYPE, "center_z")?,
        radius: f64_field(map, TYPE, "radius")?,
        thickness: f64_field(map, TYPE, "thickness")?,
        y_scale: f64_field(map, TYPE, "y_scale")?,
    }))
}

pub(crate) fn encode_hollow_hill(
    node: &DensityFunction,
    _ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    let DensityFunction::HollowHill(hill) = node else {
        return Err(mismatch(node, "hollow_hill"));
    };
    let type_name = node.type_name();
    Ok(fields([
        ("center_x", number(type_name, hill.center_x)?),
        ("center_y", number(type_name, hill.center_y)?),
        ("center_z", number(type_name, hill.center_z)?),
        ("radius", number(type_name, hill.radius)?),
        ("thickness", number(type_name, hill.thickness)?),
        ("y_scale", number(type_name, hill.y_scale)?),
    ]))
}

fn decode_absolute_difference(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
    type_name: &str,
) -> Result<AbsoluteDifference, RegistryError> {
    Ok(AbsoluteDifference {
        input: node_field(map, ctx, type_name, "input")?,
        lower: f64_field(map, type_name, "lower")?,
        upper: f64_field(map, type_name, "upper")?,
    })
}

pub(crate) fn decode_coord_min(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    let diff = decode_absolute_difference(map, ctx, "twilightforest:coord_min")?;
    Ok(ctx.graph.coord_min(diff))
}

pub(crate) fn decode_coord_max(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<NodeId, RegistryError> {
    let diff = decode_absolute_difference(map, ctx, "twilightforest:coord_max")?;
    Ok(ctx.graph.coord_max(diff))
}

pub(crate) fn encode_absolute_difference(
    node: &DensityFunction,
    ctx: &EncodeContext<'_>,
) -> Result<Map<String, Value>, RegistryError> {
    let (DensityFunction::CoordMin(diff) | DensityFunction::CoordMax(diff)) = node else {
        return Err(mismatch(node, "coord_min/coord_max"));
    };
    let type_name = node.type_name();
    Ok(fields([
        ("input", ctx.encode(diff.input)?),
        ("lower", number(type_name, diff.lower)?),
        ("upper", number(type_name, diff.upper)?),
    ]))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use twilight_utils::biome::BiomeInfluenceSource;
    use twilight_utils::density::{DensityContext, DensityEvaluator, EvalCache};
    use twilight_utils::noise::NoiseParameters;

    use super::*;
    use crate::error::DependencyKind;

    struct Flat;

    impl BiomeInfluenceSource for Flat {
        fn sample(&self, _x: i32, _z: i32) -> f64 {
            1.5
        }

        fn range(&self) -> (f64, f64) {
            (1.5, 1.5)
        }
    }

    struct Fixture {
        graph: DensityGraph,
        node_types: NodeTypeRegistry,
        noises: NoiseRegistry,
        biome_grids: BiomeGridRegistry,
        graphs: GraphRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let mut biome_grids = BiomeGridRegistry::new();
            biome_grids
                .register("twilightforest:biome_grid", Arc::new(Flat))
                .unwrap();
            Self {
                graph: DensityGraph::new(),
                node_types: NodeTypeRegistry::with_builtins().unwrap(),
                noises: NoiseRegistry::from_parameters(
                    5,
                    [("minecraft:surface", &NoiseParameters::surface())],
                )
                .unwrap(),
                biome_grids,
                graphs: GraphRegistry::new(),
            }
        }

        fn decode(&mut self, value: &Value) -> Result<NodeId, RegistryError> {
            DecodeContext {
                graph: &mut self.graph,
                node_types: &self.node_types,
                noises: &self.noises,
                biome_grids: &self.biome_grids,
                graphs: &self.graphs,
            }
            .decode(value)
        }

        fn encode(&self, id: NodeId) -> Result<Value, RegistryError> {
            EncodeContext {
                graph: &self.graph,
                node_types: &self.node_types,
            }
            .encode(id)
        }

        fn eval(&self, id: NodeId, x: i32, y: i32, z: i32) -> f64 {
            DensityEvaluator::new(&self.graph).evaluate(
                id,
                &DensityContext::new(x, y, z),
                &mut EvalCache::new(),
            )
        }
    }

    #[test]
    fn test_decode_arithmetic() {
        let mut fixture = Fixture::new();
        let json = json!({
            "type": "minecraft:clamp",
            "input": {"type": "add", "argument1": 2.0, "argument2": {"type": "minecraft:constant", "argument": 3.0}},
            "min": -1.0,
            "max": 4.0
        });
        let root = fixture.decode(&json).unwrap();
        assert!((fixture.eval(root, 0, 0, 0) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_round_trip_twilight_nodes() {
        let mut fixture = Fixture::new();
        let json = json!({
            "type": "twilightforest:coord_max",
            "input": {
                "type": "twilightforest:focused",
                "input": {
                    "type": "twilightforest:biome_driven",
                    "biome_grid": "twilightforest:biome_grid",
                    "noise": "minecraft:surface",
                    "lower_density_bound": -31.0,
                    "upper_density_bound": 64.0,
                    "smoothing": 1.0,
                    "frequency": 8.0,
                    "offset": -1.25
                },
                "focus_x": 0.0,
                "focus_y": 64.0,
                "focus_z": 0.0,
                "radius": 32.0,
                "strength": 1.5
            },
            "lower": 0.0,
            "upper": 10.0
        });
        let root = fixture.decode(&json).unwrap();
        let encoded = fixture.encode(root).unwrap();
        assert_eq!(encoded, json);

        let again = fixture.decode(&encoded).unwrap();
        for (x, y, z) in [(0, 64, 0), (17, 40, -9), (-100, 90, 33)] {
            assert_eq!(
                fixture.eval(root, x, y, z).to_bits(),
                fixture.eval(again, x, y, z).to_bits()
            );
        }
    }

    #[test]
    fn test_hollow_hill_and_sqrt() {
        let mut fixture = Fixture::new();
        let json = json!({
            "type": "twilightforest:sqrt",
            "argument": {
                "type": "minecraft:clamp",
                "input": {
                    "type": "twilightforest:hollow_hill",
                    "center_x": 0.0, "center_y": 0.0, "center_z": 0.0,
                    "radius": 10.0, "thickness": 4.0, "y_scale": 1.0
                },
                "min": 0.0,
                "max": 1.0
            }
        });
        let root = fixture.decode(&json).unwrap();
        assert!((fixture.eval(root, 7, 0, 0) - 0.5_f64.sqrt()).abs() < 1e-10);
        assert_eq!(fixture.encode(root).unwrap(), json);
    }

    #[test]
    fn test_reference_strings() {
        let mut fixture = Fixture::new();
        let seven = fixture.graph.constant(7.0);
        fixture
            .graphs
            .register(&fixture.graph, "test:seven", seven)
            .unwrap();

        let root = fixture
            .decode(&json!({"type": "minecraft:mul", "argument1": "test:seven", "argument2": 2.0}))
            .unwrap();
        assert!((fixture.eval(root, 0, 0, 0) - 14.0).abs() < 1e-10);
        assert_eq!(
            fixture.encode(root).unwrap(),
            json!({"type": "minecraft:mul", "argument1": "test:seven", "argument2": 2.0})
        );

        let err = fixture.decode(&json!("test:eight")).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingDependency { kind: DependencyKind::DensityFunction, .. }
        ));
    }

    #[test]
    fn test_decode_errors() {
        let mut fixture = Fixture::new();

        let err = fixture
            .decode(&json!({"type": "minecraft:spline", "spline": 0.0}))
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownType(name) if name == "minecraft:spline"));

        let err = fixture
            .decode(&json!({"type": "minecraft:clamp", "input": 1.0, "min": 0.0}))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MalformedNode { ref type_name, ref reason }
                if type_name == "minecraft:clamp" && reason.contains("\"max\"")
        ));

        let err = fixture
            .decode(&json!({"type": "minecraft:noise", "noise": "minecraft:ridge", "xz_scale": 1.0, "y_scale": 0.0}))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingDependency { kind: DependencyKind::Noise, ref id } if id == "minecraft:ridge"
        ));

        let err = fixture.decode(&json!([1.0, 2.0])).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedNode { .. }));

        let err = fixture.decode(&json!({"argument": 1.0})).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedNode { .. }));
    }

    #[test]
    fn test_encode_requires_registered_type() {
        let mut fixture = Fixture::new();
        let input = fixture.graph.constant(4.0);
        let root = fixture.graph.sqrt(input);
        let vanilla = NodeTypeRegistry::vanilla().unwrap();
        let err = EncodeContext {
            graph: &fixture.graph,
            node_types: &vanilla,
        }
        .encode(root)
        .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownType(name) if name == "twilightforest:sqrt"));
    }

    #[test]
    fn test_encode_rejects_non_finite() {
        let mut fixture = Fixture::new();
        let root = fixture.graph.constant(f64::INFINITY);
        assert!(matches!(
            fixture.encode(root),
            Err(RegistryError::MalformedNode { .. })
        ));
    }
}
