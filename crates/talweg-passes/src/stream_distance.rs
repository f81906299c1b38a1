//! Flow-path distance from every cell down to the source network.

use talweg_pass::{CellClass, DistancePass, Finalize, PassContext, Resolved};

/// Where the source cells get their starting distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOrigin {
    /// Source cells start at zero: the result is the distance to the
    /// nearest downstream source cell.
    Zero,
    /// Source cells start at the baseline layer's value: chained after
    /// [`OutletDistance`](crate::OutletDistance), the result is the
    /// whole flow-path distance to the subarea outlet.
    Baseline,
}

/// Distance along the flow path to the nearest downstream source cell.
///
/// Source cells are the seeds; every directed cell above them sums hop
/// lengths down its path:
///
/// ```text
/// source cell:             seed value (kept as preseeded)
/// directed cell:           downstream + hop
/// path leaves the grid:    nodata     (no source ever reached)
/// ```
///
/// A cell whose path dead-ends before any source cell inherits nodata
/// from the dead end, cell by cell back up the path.
#[derive(Clone, Copy, Debug)]
pub struct StreamDistance {
    seed: SeedOrigin,
}

impl StreamDistance {
    /// Zero-seeded pass: plain distance to the source network.
    pub fn new() -> Self {
        Self {
            seed: SeedOrigin::Zero,
        }
    }

    /// Pass seeded from a baseline layer.
    pub fn seeded_from(seed: SeedOrigin) -> Self {
        Self { seed }
    }
}

impl Default for StreamDistance {
    fn default() -> Self {
        Self::new()
    }
}

impl DistancePass for StreamDistance {
    fn name(&self) -> &str {
        "StreamDistance"
    }

    fn needs_baseline(&self) -> bool {
        self.seed == SeedOrigin::Baseline
    }

    fn classify(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> CellClass {
        if ctx.is_source(r, c) {
            return CellClass::Ready;
        }
        if ctx.flow().direction_at(r, c).is_none() {
            return CellClass::Outside;
        }
        // Wait for the target only if this pass will finalize it some
        // day; dead ends and off-grid exits are taken immediately and
        // resolve to nodata.
        match ctx.flow().target_of(r, c) {
            Some((_, tr, tc))
                if ctx.is_source(tr, tc) || ctx.flow().direction_at(tr, tc).is_some() =>
            {
                CellClass::Pending
            }
            _ => CellClass::Ready,
        }
    }

    fn preseed(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> Option<f32> {
        if !ctx.is_source(r, c) {
            return None;
        }
        match self.seed {
            SeedOrigin::Zero => Some(0.0),
            SeedOrigin::Baseline => Some(ctx.baseline_at(r, c)),
        }
    }

    fn finalize(
        &self,
        ctx: &PassContext<'_>,
        r: i32,
        c: i32,
        target: Option<&Resolved>,
    ) -> Finalize {
        if ctx.is_source(r, c) {
            return Finalize::Keep;
        }
        match target {
            Some(t) => Finalize::Write(t.distance + ctx.weight(r, t.dir)),
            None => Finalize::Nodata,
        }
    }

    fn contributes(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> bool {
        !ctx.is_source(r, c)
    }
}
