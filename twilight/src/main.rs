//! Command line preview of Twilight terrain graphs.
//!
//! Bootstraps a world from a config file (or the built-in defaults), then
//! prints a heightmap, exports a graph as JSON, or scans for discontinuities.

mod logger;
mod preview;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use twilight_core::WorldGenConfig;
use twilight_core::worldgen::{ColumnSampler, FORESTED_TERRAIN, WorldGenContext};

#[derive(Parser, Debug)]
#[command(name = "twilight")]
#[command(about = "Sample and inspect Twilight Forest terrain density graphs")]
struct Args {
    /// World generation config (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the config seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Graph to sample or export
    #[arg(short, long, default_value = FORESTED_TERRAIN)]
    graph: String,

    /// Additional graphs to register first, as NAME=FILE
    #[arg(long = "import", value_name = "NAME=FILE")]
    imports: Vec<String>,

    /// Center block x
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    x: i32,

    /// Center block z
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    z: i32,

    /// Half width of the sampled square, in blocks
    #[arg(short, long, default_value = "8")]
    radius: i32,

    /// Lowest y considered
    #[arg(long, default_value = "-32", allow_hyphen_values = true)]
    min_y: i32,

    /// Highest y considered
    #[arg(long, default_value = "256")]
    max_y: i32,

    /// Print the graph as JSON instead of sampling it
    #[arg(long)]
    export: bool,

    /// Scan rows along x for second-difference spikes above this threshold
    #[arg(long)]
    scan: Option<f64>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => WorldGenConfig::load(path)?,
        None => WorldGenConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut context = WorldGenContext::bootstrap(&config)?;
    for import in &args.imports {
        let Some((name, path)) = import.split_once('=') else {
            bail!("--import expects NAME=FILE, got {import}");
        };
        let json = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
        let graph = context.load_graph_json(name, &json)?;
        log::info!("imported {} from {path}", graph.name);
    }

    if args.export {
        println!("{}", context.export_graph_json(&args.graph)?);
        return Ok(());
    }

    let graph = context.lookup(&args.graph)?;
    if let Some(threshold) = args.scan {
        let step = ((args.max_y - args.min_y) / 16).max(1) as usize;
        print!(
            "{}",
            preview::discontinuities(
                &context,
                &graph,
                args.x,
                args.z,
                args.radius,
                (args.min_y..=args.max_y).step_by(step),
                threshold,
            )
        );
        return Ok(());
    }

    let sampler = ColumnSampler::for_graph(&context, graph).with_y_range(args.min_y, args.max_y);
    log::info!(
        "surface heights of {} around ({}, {}), seed {}",
        sampler.graph().name,
        args.x,
        args.z,
        context.seed()
    );
    print!("{}", preview::heightmap(&sampler, args.x, args.z, args.radius));
    Ok(())
}
