//! Talweg command-line drivers.
//!
//! Each subcommand reads ESRI ASCII layers, validates that every layer
//! shares the extent of the first one read, runs the requested pass or
//! aggregation, and writes the result. Read, compute, and write
//! wall-clock times are logged at info level after each run.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use talweg_core::CellValue;
use talweg_engine::{run_pass, PassInput, RunConfig};
use talweg_grid::Spacing;
use talweg_passes::{OutletDistance, SeedOrigin, StreamDistance};
use talweg_raster::{read_grid, write_grid, GridHeader};
use talweg_stats::{classify_subareas, lorenz_report, read_index_table, WatershedLayers};

/// Nodata sentinel written into every output grid.
const OUTPUT_NODATA: f64 = -9999.0;

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "talweg",
    version,
    about = "Distributed D8 flow-path distances and watershed statistics"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Distance from each stream cell to its subarea outlet
    OutletDistance(OutletArgs),
    /// Overland distance from each cell to the stream network
    StreamDistance(StreamArgs),
    /// Whole flow-path distance: the outlet pass, then the overland pass
    /// seeded from its output
    FlowpathDistance(FlowpathArgs),
    /// Lorenz-curve statistics per land use over a watershed
    Lorenz(LorenzArgs),
    /// Paint per-subarea index classes over the subarea grid
    ClassifyIndex(ClassifyArgs),
}

#[derive(Args, Debug)]
struct EngineOpts {
    /// Worker threads the grid is banded across
    #[arg(long, default_value_t = 1)]
    workers: u32,

    /// Stream threshold: cells at or above it belong to the network
    #[arg(long, default_value_t = 1)]
    threshold: i32,
}

impl EngineOpts {
    fn to_config(&self) -> RunConfig {
        RunConfig {
            workers: self.workers,
            threshold: self.threshold,
        }
    }
}

#[derive(Args, Debug)]
struct OutletArgs {
    /// D8 flow-direction grid
    #[arg(long)]
    directions: PathBuf,

    /// Stream network grid compared against the threshold
    #[arg(long)]
    streams: PathBuf,

    /// Subarea id grid; distance restarts at subarea boundaries
    #[arg(long)]
    subareas: PathBuf,

    /// Output distance grid
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    engine: EngineOpts,
}

#[derive(Args, Debug)]
struct StreamArgs {
    /// D8 flow-direction grid
    #[arg(long)]
    directions: PathBuf,

    /// Stream network grid compared against the threshold
    #[arg(long)]
    streams: PathBuf,

    /// Output distance grid
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    engine: EngineOpts,
}

#[derive(Args, Debug)]
struct FlowpathArgs {
    /// D8 flow-direction grid
    #[arg(long)]
    directions: PathBuf,

    /// Stream network grid compared against the threshold
    #[arg(long)]
    streams: PathBuf,

    /// Subarea id grid; distance restarts at subarea boundaries
    #[arg(long)]
    subareas: PathBuf,

    /// Output distance grid
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    engine: EngineOpts,
}

#[derive(Args, Debug)]
struct LorenzArgs {
    /// Watershed mask grid; nodata marks cells outside the watershed
    #[arg(long)]
    watershed: PathBuf,

    /// Land-use id grid
    #[arg(long)]
    land_use: PathBuf,

    /// Elevation grid
    #[arg(long)]
    elevation: PathBuf,

    /// Distance-to-outlet grid, as produced by flowpath-distance
    #[arg(long)]
    distance: PathBuf,

    /// Slope grid
    #[arg(long)]
    slope: PathBuf,

    /// Output JSON report
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Subarea id grid
    #[arg(long)]
    subareas: PathBuf,

    /// JSON index map of the form {"<subarea>": {"comb": value}}
    #[arg(long)]
    index: PathBuf,

    /// Output class grid
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match Cli::parse().command {
        Command::OutletDistance(args) => run_outlet(args),
        Command::StreamDistance(args) => run_stream(args),
        Command::FlowpathDistance(args) => run_flowpath(args),
        Command::Lorenz(args) => run_lorenz(args),
        Command::ClassifyIndex(args) => run_classify(args),
    }
}

// ── Distance passes ──────────────────────────────────────────────────────────

fn run_outlet(args: OutletArgs) -> Result<()> {
    let t0 = Instant::now();
    let (header, directions) = read_layer::<i16>(&args.directions)?;
    let streams = read_matching::<i32>(&args.streams, &header, &args.directions)?;
    let subareas = read_matching::<i32>(&args.subareas, &header, &args.directions)?;
    let read = t0.elapsed();

    let t1 = Instant::now();
    let spacing = Spacing::uniform(header.cellsize)?;
    let input = PassInput {
        rows: header.nrows,
        cols: header.ncols,
        spacing: &spacing,
        directions: &directions,
        source: &streams,
        subareas: Some(&subareas),
        baseline: None,
    };
    let output = run_pass(&OutletDistance::new(), &input, &args.engine.to_config())?;
    let compute = t1.elapsed();

    let t2 = Instant::now();
    write_layer(&args.output, &output_header(&header), &output.distances)?;
    log_timing("outlet-distance", read, compute, t2.elapsed());
    Ok(())
}

fn run_stream(args: StreamArgs) -> Result<()> {
    let t0 = Instant::now();
    let (header, directions) = read_layer::<i16>(&args.directions)?;
    let streams = read_matching::<i32>(&args.streams, &header, &args.directions)?;
    let read = t0.elapsed();

    let t1 = Instant::now();
    let spacing = Spacing::uniform(header.cellsize)?;
    let input = PassInput {
        rows: header.nrows,
        cols: header.ncols,
        spacing: &spacing,
        directions: &directions,
        source: &streams,
        subareas: None,
        baseline: None,
    };
    let output = run_pass(&StreamDistance::new(), &input, &args.engine.to_config())?;
    let compute = t1.elapsed();

    let t2 = Instant::now();
    write_layer(&args.output, &output_header(&header), &output.distances)?;
    log_timing("stream-distance", read, compute, t2.elapsed());
    Ok(())
}

fn run_flowpath(args: FlowpathArgs) -> Result<()> {
    let t0 = Instant::now();
    let (header, directions) = read_layer::<i16>(&args.directions)?;
    let streams = read_matching::<i32>(&args.streams, &header, &args.directions)?;
    let subareas = read_matching::<i32>(&args.subareas, &header, &args.directions)?;
    let read = t0.elapsed();

    let t1 = Instant::now();
    let spacing = Spacing::uniform(header.cellsize)?;
    let config = args.engine.to_config();
    let outlet_input = PassInput {
        rows: header.nrows,
        cols: header.ncols,
        spacing: &spacing,
        directions: &directions,
        source: &streams,
        subareas: Some(&subareas),
        baseline: None,
    };
    let outlet = run_pass(&OutletDistance::new(), &outlet_input, &config)?;
    let overland_input = PassInput {
        subareas: None,
        baseline: Some(&outlet.distances),
        ..outlet_input
    };
    let overland = StreamDistance::seeded_from(SeedOrigin::Baseline);
    let output = run_pass(&overland, &overland_input, &config)?;
    let compute = t1.elapsed();

    let t2 = Instant::now();
    write_layer(&args.output, &output_header(&header), &output.distances)?;
    log_timing("flowpath-distance", read, compute, t2.elapsed());
    Ok(())
}

// ── Watershed statistics ─────────────────────────────────────────────────────

fn run_lorenz(args: LorenzArgs) -> Result<()> {
    let t0 = Instant::now();
    let (header, watershed) = read_layer::<i32>(&args.watershed)?;
    let land_use = read_matching::<i32>(&args.land_use, &header, &args.watershed)?;
    let elevation = read_matching::<f32>(&args.elevation, &header, &args.watershed)?;
    let distance = read_matching::<f32>(&args.distance, &header, &args.watershed)?;
    let slope = read_matching::<f32>(&args.slope, &header, &args.watershed)?;
    let read = t0.elapsed();

    let t1 = Instant::now();
    let layers = WatershedLayers {
        watershed: &watershed,
        land_use: &land_use,
        elevation: &elevation,
        distance: &distance,
        slope: &slope,
    };
    let report = lorenz_report(&layers, header.cellsize, header.cellsize)?;
    let compute = t1.elapsed();

    let t2 = Instant::now();
    let file = File::create(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    writer
        .flush()
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    log_timing("lorenz", read, compute, t2.elapsed());
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    let t0 = Instant::now();
    let (header, subareas) = read_layer::<i32>(&args.subareas)?;
    let index = File::open(&args.index)
        .with_context(|| format!("cannot open {}", args.index.display()))?;
    let table = read_index_table(BufReader::new(index))
        .with_context(|| format!("cannot read {}", args.index.display()))?;
    let read = t0.elapsed();

    let t1 = Instant::now();
    let classes = classify_subareas(&subareas, &table)?;
    let compute = t1.elapsed();

    let t2 = Instant::now();
    write_layer(&args.output, &output_header(&header), &classes)?;
    log_timing("classify-index", read, compute, t2.elapsed());
    Ok(())
}

// ── Layer plumbing ───────────────────────────────────────────────────────────

fn read_layer<T: CellValue>(path: &Path) -> Result<(GridHeader, Vec<T>)> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    read_grid(BufReader::new(file)).with_context(|| format!("cannot read {}", path.display()))
}

/// Read a layer and require it to share the reference extent.
fn read_matching<T: CellValue>(
    path: &Path,
    reference: &GridHeader,
    reference_path: &Path,
) -> Result<Vec<T>> {
    let (header, cells) = read_layer(path)?;
    if !reference.matches(&header) {
        bail!(
            "extent of {} does not match {}",
            path.display(),
            reference_path.display()
        );
    }
    Ok(cells)
}

fn write_layer<T: CellValue>(path: &Path, header: &GridHeader, cells: &[T]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_grid(&mut writer, header, cells)
        .with_context(|| format!("cannot write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

fn output_header(reference: &GridHeader) -> GridHeader {
    GridHeader {
        nodata: Some(OUTPUT_NODATA),
        ..reference.clone()
    }
}

fn log_timing(command: &str, read: Duration, compute: Duration, write: Duration) {
    let total = read + compute + write;
    info!(
        "{command}: read {:.3}s, compute {:.3}s, write {:.3}s, total {:.3}s",
        read.as_secs_f64(),
        compute.as_secs_f64(),
        write.as_secs_f64(),
        total.as_secs_f64()
    );
}
