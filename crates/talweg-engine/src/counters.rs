//! Dependency counters driving the topological traversal order.

use log::debug;
use talweg_core::CellValue;
use talweg_grid::{Band, BandGeometry, Edge, ExchangeError, GridLinks};
use talweg_pass::{CellClass, DistancePass, PassContext};

use crate::worklist::Worklist;

/// Totals from the classification sweep.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SweepCounts {
    /// Cells queued immediately.
    pub seeds: usize,
    /// Cells waiting on their downstream target.
    pub pending: usize,
}

/// Per-cell count of unresolved downstream dependencies.
///
/// Every cell drains to exactly one neighbor, so a count is only ever
/// zero or one; cells outside the pass keep the nodata sentinel. A cell
/// enters the worklist exactly once: at the classification sweep when it
/// starts at zero, or through the single decrement its downstream target
/// delivers on finalization. Decrements aimed at a neighbor worker's
/// cells accumulate in the halo delta buffers until the next border
/// exchange.
pub(crate) struct DependencyCounters {
    band: Band<i16>,
}

impl DependencyCounters {
    /// Classify every owned cell, queueing seeds and marking pending
    /// cells. Scans row-major so the seed order is identical on every
    /// run of the same partition.
    pub fn build<P: DistancePass + ?Sized>(
        pass: &P,
        ctx: &PassContext<'_>,
        geo: BandGeometry,
        worklist: &mut Worklist,
    ) -> (Self, SweepCounts) {
        let mut band = Band::filled(geo, i16::NODATA, i16::NODATA);
        let mut counts = SweepCounts::default();
        for r in 0..geo.rows() as i32 {
            for c in 0..geo.cols() as i32 {
                match pass.classify(ctx, r, c) {
                    CellClass::Outside => {}
                    CellClass::Ready => {
                        band.set(r, c, 0);
                        worklist.push(r, c);
                        counts.seeds += 1;
                    }
                    CellClass::Pending => {
                        band.set(r, c, 1);
                        counts.pending += 1;
                    }
                }
            }
        }
        debug!(
            "rank {}: classified {} seed and {} pending cells",
            geo.rank(),
            counts.seeds,
            counts.pending
        );
        (Self { band }, counts)
    }

    /// Decrement an owned cell. True when it just became eligible.
    pub fn release_local(&mut self, r: i32, c: i32) -> bool {
        let next = self.band.get(r, c) - 1;
        self.band.set(r, c, next);
        next == 0
    }

    /// Stage a decrement for a halo cell a neighbor worker owns.
    pub fn stage_remote(&mut self, r: i32, c: i32) {
        self.band.add_to(r, c, -1);
    }

    /// Swap staged decrements with both neighbors and fold the received
    /// ones into the edge rows. The received rows stay readable through
    /// [`delta_row`](Self::delta_row) until the next
    /// [`clear_deltas`](Self::clear_deltas).
    pub fn exchange(&mut self, links: &GridLinks) -> Result<(), ExchangeError> {
        links.add_borders(&mut self.band)
    }

    /// The decrements received for the edge row nearest `edge`.
    pub fn delta_row(&self, edge: Edge) -> &[i16] {
        self.band.halo(edge)
    }

    /// Whether an owned cell's count has reached zero.
    pub fn is_zero(&self, r: i32, c: i32) -> bool {
        self.band.get(r, c) == 0
    }

    /// Zero the delta buffers before a draining phase accumulates into
    /// them. Skipping this would fold a neighbor's stale or nodata
    /// buffer into live counters.
    pub fn clear_deltas(&mut self) {
        self.band.clear_halos();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talweg_core::Rank;
    use talweg_grid::{BandDecomposition, Spacing};
    use talweg_pass::{FlowField, WeightTable};

    struct EveryCell;

    impl DistancePass for EveryCell {
        fn name(&self) -> &str {
            "every_cell"
        }

        fn classify(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> CellClass {
            match ctx.flow().target_of(r, c) {
                Some((_, tr, tc)) if ctx.in_reach(tr, tc) => CellClass::Pending,
                Some(_) => CellClass::Ready,
                None => CellClass::Outside,
            }
        }

        fn finalize(
            &self,
            _ctx: &PassContext<'_>,
            _r: i32,
            _c: i32,
            _target: Option<&talweg_pass::Resolved>,
        ) -> talweg_pass::Finalize {
            talweg_pass::Finalize::Write(0.0)
        }

        fn contributes(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> bool {
            ctx.flow().direction_at(r, c).is_some()
        }
    }

    #[test]
    fn sweep_queues_seeds_and_marks_pending() {
        let geo = BandDecomposition::new(1, 4, 1)
            .unwrap()
            .geometry(Rank(0))
            .unwrap();
        // Chain 0 -> 1 -> 2 -> 3, last cell drains off-grid east.
        let dirs = Band::from_rows(geo, i16::NODATA, vec![1, 1, 1, 1]).unwrap();
        let source = Band::filled(geo, i32::NODATA, 1);
        let weights = WeightTable::build(&geo, &Spacing::uniform(10.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights);

        let mut worklist = Worklist::new(4);
        let (counters, counts) =
            DependencyCounters::build(&EveryCell, &ctx, geo, &mut worklist);
        assert_eq!(counts.seeds, 1);
        assert_eq!(counts.pending, 3);
        assert_eq!(worklist.len(), 1);
        assert!(counters.is_zero(0, 3));
        assert!(!counters.is_zero(0, 0));
    }

    #[test]
    fn cells_outside_the_pass_keep_nodata_counters() {
        let geo = BandDecomposition::new(1, 3, 1)
            .unwrap()
            .geometry(Rank(0))
            .unwrap();
        // Directed into a neighbor, directionless, directed off-grid.
        let dirs = Band::from_rows(geo, i16::NODATA, vec![1, i16::NODATA, 1]).unwrap();
        let source = Band::filled(geo, i32::NODATA, 1);
        let weights = WeightTable::build(&geo, &Spacing::uniform(10.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights);

        let mut worklist = Worklist::new(3);
        let (counters, counts) =
            DependencyCounters::build(&EveryCell, &ctx, geo, &mut worklist);
        assert_eq!(counts.seeds, 1);
        assert_eq!(counts.pending, 1);
        assert!(!counters.is_zero(0, 0));
        // The directionless cell is not a zeroed participant.
        assert!(!counters.is_zero(0, 1));
        assert!(counters.is_zero(0, 2));
    }

    #[test]
    fn release_reports_the_zero_crossing() {
        let geo = BandDecomposition::new(1, 2, 1)
            .unwrap()
            .geometry(Rank(0))
            .unwrap();
        let dirs = Band::from_rows(geo, i16::NODATA, vec![1, 1]).unwrap();
        let source = Band::filled(geo, i32::NODATA, 1);
        let weights = WeightTable::build(&geo, &Spacing::uniform(10.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights);

        let mut worklist = Worklist::new(2);
        let (mut counters, _) =
            DependencyCounters::build(&EveryCell, &ctx, geo, &mut worklist);
        assert!(counters.release_local(0, 0));
        assert!(!counters.release_local(0, 0));
    }
}
