//! One worker's traversal over its band.

use log::debug;
use talweg_core::{CellValue, Rank};
use talweg_grid::{Band, BandGeometry, Edge, ExchangeError, GridLinks};
use talweg_pass::{DistancePass, Finalize, FlowField, PassContext, Resolved, WeightTable};

use crate::counters::DependencyCounters;
use crate::worklist::Worklist;

/// Totals one worker reports after a pass.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WorkerStats {
    pub rank: Rank,
    pub seeds: usize,
    pub pending: usize,
    pub finalized: usize,
    pub rounds: u32,
}

/// A finished worker's distance rows plus its stats.
pub(crate) struct WorkerOutcome {
    pub rows: Vec<f32>,
    pub stats: WorkerStats,
}

/// Everything one worker owns going into a pass.
///
/// The cluster moves one of these into each worker thread; nothing is
/// shared but the channel endpoints inside [`GridLinks`].
pub(crate) struct PassWorker {
    pub geo: BandGeometry,
    pub threshold: i32,
    pub weights: WeightTable,
    pub directions: Band<i16>,
    pub source: Band<i32>,
    pub subareas: Option<Band<i32>>,
    pub baseline: Option<Band<f32>>,
}

impl PassWorker {
    /// Run the pass to global quiescence and return the finished band.
    ///
    /// Every worker executes the same sequence in lockstep; the blocking
    /// collective calls (`share`, `add_borders`, `ring_term`) are what
    /// keep the set synchronized, there is no shared memory.
    pub fn run<P: DistancePass + ?Sized>(
        mut self,
        pass: &P,
        links: GridLinks,
    ) -> Result<WorkerOutcome, ExchangeError> {
        let rank = self.geo.rank();

        // 1. Refresh halo rows of the static layers so classification
        //    and finalization see the neighbors' edge cells.
        links.share(&mut self.directions)?;
        links.share(&mut self.source)?;
        if let Some(band) = self.subareas.as_mut() {
            links.share(band)?;
        }
        if let Some(band) = self.baseline.as_mut() {
            links.share(band)?;
        }

        let flow = FlowField::new(&self.directions);
        let mut ctx = PassContext::new(flow, &self.source, self.threshold, &self.weights);
        if let Some(band) = self.subareas.as_ref() {
            ctx = ctx.with_subareas(band);
        }
        if let Some(band) = self.baseline.as_ref() {
            ctx = ctx.with_baseline(band);
        }

        // 2. Preseed distances, then classify every owned cell. The
        //    sweep queues the seeds in row-major order.
        let mut dist = Band::filled(self.geo, f32::NODATA, f32::NODATA);
        for r in 0..self.geo.rows() as i32 {
            for c in 0..self.geo.cols() as i32 {
                if let Some(value) = pass.preseed(&ctx, r, c) {
                    dist.set(r, c, value);
                }
            }
        }
        let mut worklist = Worklist::new(self.geo.cols());
        let (counters, counts) =
            DependencyCounters::build(pass, &ctx, self.geo, &mut worklist);
        let mut state = Traversal {
            dist,
            counters,
            worklist,
            finalized: 0,
        };

        // 3. Alternate local draining with border exchange until the
        //    termination ring reports every worker out of work.
        let mut rounds = 0u32;
        loop {
            rounds += 1;
            state.counters.clear_deltas();
            state.drain(pass, &ctx);
            state.counters.exchange(&links)?;
            links.share(&mut state.dist)?;
            state.requeue_released_edges();
            if links.ring_term(state.worklist.is_empty())? {
                break;
            }
        }
        debug!(
            "rank {rank}: finalized {} cells in {rounds} rounds",
            state.finalized
        );

        Ok(WorkerOutcome {
            rows: state.dist.into_rows(),
            stats: WorkerStats {
                rank,
                seeds: counts.seeds,
                pending: counts.pending,
                finalized: state.finalized,
                rounds,
            },
        })
    }
}

/// The state a draining phase mutates: the distance band under
/// construction, the counters, and the queue.
struct Traversal {
    dist: Band<f32>,
    counters: DependencyCounters,
    worklist: Worklist,
    finalized: usize,
}

impl Traversal {
    /// Pop and finalize cells until the queue runs dry.
    fn drain<P: DistancePass + ?Sized>(&mut self, pass: &P, ctx: &PassContext<'_>) {
        while let Some((r, c)) = self.worklist.pop() {
            self.finalize_cell(pass, ctx, r, c);
        }
    }

    fn finalize_cell<P: DistancePass + ?Sized>(
        &mut self,
        pass: &P,
        ctx: &PassContext<'_>,
        r: i32,
        c: i32,
    ) {
        let resolved = ctx.flow().target_of(r, c).and_then(|(dir, tr, tc)| {
            if self.dist.is_nodata(tr, tc) {
                None
            } else {
                Some(Resolved {
                    dir,
                    row: tr,
                    col: tc,
                    distance: self.dist.get(tr, tc),
                })
            }
        });
        match pass.finalize(ctx, r, c, resolved.as_ref()) {
            Finalize::Write(value) => self.dist.set(r, c, value),
            Finalize::Nodata => self.dist.set_nodata(r, c),
            Finalize::Keep => {}
        }
        self.finalized += 1;

        // Release the upstream neighbors that were waiting on this cell.
        // Decrements for cells a neighbor worker owns are staged in the
        // halo buffers and travel with the next border exchange.
        let geo = *self.dist.geometry();
        for (_, nr, nc) in ctx.flow().contributors(r, c) {
            if !pass.contributes(ctx, nr, nc) {
                continue;
            }
            if geo.is_in_partition(nr, nc) {
                if self.counters.release_local(nr, nc) {
                    self.worklist.push(nr, nc);
                }
            } else {
                self.counters.stage_remote(nr, nc);
            }
        }
    }

    /// Queue edge cells the folded border deltas just released.
    ///
    /// A nonzero received delta combined with a zero counter is the
    /// handoff: a neighbor finalized this cell's downstream target
    /// since the last round. Top edge first, then bottom, each left to
    /// right, so the queue order is identical run to run.
    fn requeue_released_edges(&mut self) {
        let geo = *self.dist.geometry();
        if geo.has_up() {
            self.requeue_edge_row(Edge::Top, 0);
        }
        if geo.has_down() {
            self.requeue_edge_row(Edge::Bottom, geo.rows() as i32 - 1);
        }
    }

    fn requeue_edge_row(&mut self, edge: Edge, r: i32) {
        let cols = self.dist.geometry().cols() as usize;
        for c in 0..cols {
            let delta = self.counters.delta_row(edge)[c];
            if delta != 0 && self.counters.is_zero(r, c as i32) {
                self.worklist.push(r, c as i32);
            }
        }
    }
}
