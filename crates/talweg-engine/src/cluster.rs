//! Job setup: validation, banding, worker spawn, and result stitching.

use std::thread;

use log::{debug, info, warn};
use talweg_core::CellValue;
use talweg_grid::{wire_links, Band, BandDecomposition, BandGeometry, Spacing};
use talweg_pass::{DistancePass, WeightTable};

use crate::config::RunConfig;
use crate::error::EngineError;
use crate::worker::{PassWorker, WorkerOutcome};

/// Input layers of one run, in global row-major order.
pub struct PassInput<'a> {
    /// Total grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Cell spacing of the grid.
    pub spacing: &'a Spacing,
    /// D8 direction codes.
    pub directions: &'a [i16],
    /// Source-network raster compared against the run threshold.
    pub source: &'a [i32],
    /// Subarea id raster, when the pass asks for one.
    pub subareas: Option<&'a [i32]>,
    /// Baseline distance raster, when the pass asks for one.
    pub baseline: Option<&'a [f32]>,
}

/// Totals of a finished run, summed over all workers.
#[derive(Clone, Copy, Debug)]
pub struct RunStats {
    /// Workers the grid was banded across after clamping.
    pub workers: u32,
    /// Exchange rounds until the termination ring agreed.
    pub rounds: u32,
    /// Cells queued by the classification sweeps.
    pub seeds: usize,
    /// Cells that started out waiting on their downstream target.
    pub pending: usize,
    /// Cells finalized over the whole traversal.
    pub finalized: usize,
}

/// A finished pass: the global distance raster plus run totals.
pub struct PassOutput {
    /// Row-major distance values, nodata where undefined.
    pub distances: Vec<f32>,
    /// Run totals.
    pub stats: RunStats,
}

/// Run one distance pass across `config.workers` worker threads.
///
/// Validates the inputs, bands the grid by rows, moves each band into
/// its own thread, and stitches the finished bands back together in
/// rank order. All validation happens before the first thread starts;
/// after that the only failures are a worker panic or a broken channel,
/// either of which aborts the whole job.
pub fn run_pass<P: DistancePass>(
    pass: &P,
    input: &PassInput<'_>,
    config: &RunConfig,
) -> Result<PassOutput, EngineError> {
    if pass.needs_subareas() && input.subareas.is_none() {
        return Err(EngineError::MissingLayer {
            pass: pass.name().into(),
            layer: "subareas",
        });
    }
    if pass.needs_baseline() && input.baseline.is_none() {
        return Err(EngineError::MissingLayer {
            pass: pass.name().into(),
            layer: "baseline",
        });
    }

    let workers = effective_workers(config.workers, input.rows);
    let decomp = BandDecomposition::new(input.rows, input.cols, workers)?;
    let cells = decomp.total_rows() as usize * decomp.cols() as usize;
    check_len("directions", input.directions.len(), cells)?;
    check_len("source", input.source.len(), cells)?;
    if let Some(layer) = input.subareas {
        check_len("subareas", layer.len(), cells)?;
    }
    if let Some(layer) = input.baseline {
        check_len("baseline", layer.len(), cells)?;
    }

    let links = wire_links(workers)?;
    let mut band_set = Vec::with_capacity(workers as usize);
    for geo in decomp.geometries() {
        band_set.push(build_worker(geo, input, config.threshold)?);
    }

    let outcomes = thread::scope(|scope| -> Result<Vec<WorkerOutcome>, EngineError> {
        let mut handles = Vec::with_capacity(band_set.len());
        for (worker, link) in band_set.into_iter().zip(links) {
            let rank = worker.geo.rank();
            let handle = thread::Builder::new()
                .name(format!("talweg-{rank}"))
                .spawn_scoped(scope, move || worker.run(pass, link))
                .map_err(|source| EngineError::WorkerSpawn { rank, source })?;
            handles.push((rank, handle));
        }
        let mut outcomes = Vec::with_capacity(handles.len());
        for (rank, handle) in handles {
            match handle.join() {
                Ok(Ok(outcome)) => outcomes.push(outcome),
                Ok(Err(source)) => return Err(EngineError::Exchange { rank, source }),
                Err(_) => return Err(EngineError::WorkerPanicked { rank }),
            }
        }
        Ok(outcomes)
    })?;

    let mut distances = Vec::with_capacity(cells);
    let mut stats = RunStats {
        workers,
        rounds: 0,
        seeds: 0,
        pending: 0,
        finalized: 0,
    };
    for outcome in outcomes {
        debug!(
            "rank {}: {} seeds, {} pending, {} finalized",
            outcome.stats.rank,
            outcome.stats.seeds,
            outcome.stats.pending,
            outcome.stats.finalized
        );
        distances.extend_from_slice(&outcome.rows);
        stats.rounds = stats.rounds.max(outcome.stats.rounds);
        stats.seeds += outcome.stats.seeds;
        stats.pending += outcome.stats.pending;
        stats.finalized += outcome.stats.finalized;
    }
    info!(
        "pass {}: {} workers, {} rounds, {} cells finalized",
        pass.name(),
        workers,
        stats.rounds,
        stats.finalized
    );
    Ok(PassOutput { distances, stats })
}

/// Clamp the requested worker count to the row total; a band cannot be
/// thinner than one row.
fn effective_workers(requested: u32, rows: u32) -> u32 {
    if rows > 0 && requested > rows {
        warn!("clamping {requested} workers to {rows} grid rows");
        return rows;
    }
    requested
}

fn check_len(layer: &'static str, got: usize, expected: usize) -> Result<(), EngineError> {
    if got != expected {
        return Err(EngineError::LayerLength {
            layer,
            expected,
            got,
        });
    }
    Ok(())
}

fn band_slice<T: CellValue>(
    layer: &[T],
    geo: BandGeometry,
    nodata: T,
) -> Result<Band<T>, EngineError> {
    let cols = geo.cols() as usize;
    let from = geo.start_row() as usize * cols;
    let take = geo.rows() as usize * cols;
    Band::from_rows(geo, nodata, layer[from..from + take].to_vec()).map_err(EngineError::from)
}

fn build_worker(
    geo: BandGeometry,
    input: &PassInput<'_>,
    threshold: i32,
) -> Result<PassWorker, EngineError> {
    Ok(PassWorker {
        geo,
        threshold,
        weights: WeightTable::build(&geo, input.spacing),
        directions: band_slice(input.directions, geo, i16::NODATA)?,
        source: band_slice(input.source, geo, i32::NODATA)?,
        subareas: input
            .subareas
            .map(|layer| band_slice(layer, geo, i32::NODATA))
            .transpose()?,
        baseline: input
            .baseline
            .map(|layer| band_slice(layer, geo, f32::NODATA))
            .transpose()?,
    })
}
