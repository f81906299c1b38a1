//! Along-network distance to the subarea outlet.

use talweg_core::CellValue;
use talweg_pass::{CellClass, DistancePass, Finalize, PassContext, Resolved};

/// Distance along the source network to the downstream subarea outlet.
///
/// Only source cells with a direction participate; everything else is
/// left at nodata. The traversal starts at the network termini (source
/// cells whose downstream neighbor is off the network) and accumulates
/// hop lengths upstream:
///
/// ```text
/// terminus:                     0
/// same subarea as downstream:   downstream + hop
/// different or unknown subarea: hop        (restart at the boundary)
/// ```
///
/// The restart makes each value a distance to the point where the flow
/// leaves the cell's own subarea, not to the grid's final outlet. A
/// nodata subarea id on either side of a hop counts as a boundary.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutletDistance;

impl OutletDistance {
    /// The pass. It has no knobs; the source threshold lives in the
    /// run configuration.
    pub fn new() -> Self {
        Self
    }
}

impl DistancePass for OutletDistance {
    fn name(&self) -> &str {
        "OutletDistance"
    }

    fn needs_subareas(&self) -> bool {
        true
    }

    fn classify(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> CellClass {
        if !ctx.is_source(r, c) || ctx.flow().direction_at(r, c).is_none() {
            return CellClass::Outside;
        }
        // A terminus waits on nothing: its downstream is off the
        // network, off the grid entirely, or directionless, and will
        // never be finalized by this pass.
        match ctx.flow().target_of(r, c) {
            Some((_, tr, tc))
                if ctx.is_source(tr, tc) && ctx.flow().direction_at(tr, tc).is_some() =>
            {
                CellClass::Pending
            }
            _ => CellClass::Ready,
        }
    }

    fn finalize(
        &self,
        ctx: &PassContext<'_>,
        r: i32,
        c: i32,
        target: Option<&Resolved>,
    ) -> Finalize {
        let Some(t) = target else {
            return Finalize::Write(0.0);
        };
        let own = ctx.subarea_at(r, c);
        let downstream = ctx.subarea_at(t.row, t.col);
        let hop = ctx.weight(r, t.dir);
        if own != i32::NODATA && own == downstream {
            Finalize::Write(t.distance + hop)
        } else {
            Finalize::Write(hop)
        }
    }

    fn contributes(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> bool {
        ctx.is_source(r, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talweg_core::{Direction, Rank};
    use talweg_grid::{Band, BandDecomposition, BandGeometry, Spacing};
    use talweg_pass::{FlowField, WeightTable};

    fn geo(rows: u32, cols: u32) -> BandGeometry {
        BandDecomposition::new(rows, cols, 1)
            .unwrap()
            .geometry(Rank(0))
            .unwrap()
    }

    fn resolved(dir: Direction, row: i32, col: i32, distance: f32) -> Resolved {
        Resolved {
            dir,
            row,
            col,
            distance,
        }
    }

    // ---------------------------------------------------------------
    // Classification
    // ---------------------------------------------------------------

    #[test]
    fn only_directed_source_cells_participate() {
        let geo = geo(1, 4);
        // source, source, non-source, source-without-direction
        let dirs = Band::from_rows(geo, i16::NODATA, vec![1, 1, 1, i16::NODATA]).unwrap();
        let source =
            Band::from_rows(geo, i32::NODATA, vec![5, 5, i32::NODATA, 5]).unwrap();
        let subareas = Band::filled(geo, i32::NODATA, 1);
        let weights = WeightTable::build(&geo, &Spacing::uniform(10.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights)
            .with_subareas(&subareas);

        let pass = OutletDistance::new();
        // (0,0) drains into the source cell (0,1).
        assert_eq!(pass.classify(&ctx, 0, 0), CellClass::Pending);
        // (0,1) drains into a non-source cell: terminus.
        assert_eq!(pass.classify(&ctx, 0, 1), CellClass::Ready);
        assert_eq!(pass.classify(&ctx, 0, 2), CellClass::Outside);
        assert_eq!(pass.classify(&ctx, 0, 3), CellClass::Outside);
    }

    #[test]
    fn draining_into_a_directionless_source_cell_is_a_terminus() {
        let geo = geo(1, 2);
        let dirs = Band::from_rows(geo, i16::NODATA, vec![1, i16::NODATA]).unwrap();
        let source = Band::from_rows(geo, i32::NODATA, vec![5, 5]).unwrap();
        let subareas = Band::filled(geo, i32::NODATA, 1);
        let weights = WeightTable::build(&geo, &Spacing::uniform(10.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights)
            .with_subareas(&subareas);

        // (0,1) is a source cell but can never be finalized; waiting on
        // it would strand (0,0) forever.
        assert_eq!(OutletDistance::new().classify(&ctx, 0, 0), CellClass::Ready);
    }

    #[test]
    fn draining_off_the_grid_is_a_terminus() {
        let geo = geo(1, 2);
        let dirs = Band::from_rows(geo, i16::NODATA, vec![1, 1]).unwrap();
        let source = Band::from_rows(geo, i32::NODATA, vec![5, 5]).unwrap();
        let subareas = Band::filled(geo, i32::NODATA, 1);
        let weights = WeightTable::build(&geo, &Spacing::uniform(10.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights)
            .with_subareas(&subareas);

        let pass = OutletDistance::new();
        // (0,1) pours over the grid edge: the pour point itself.
        assert_eq!(pass.classify(&ctx, 0, 1), CellClass::Ready);
        assert_eq!(pass.classify(&ctx, 0, 0), CellClass::Pending);
        assert_eq!(pass.finalize(&ctx, 0, 1, None), Finalize::Write(0.0));
    }

    // ---------------------------------------------------------------
    // Finalization
    // ---------------------------------------------------------------

    #[test]
    fn accumulates_inside_a_subarea_and_restarts_at_the_boundary() {
        let geo = geo(1, 3);
        let dirs = Band::from_rows(geo, i16::NODATA, vec![1, 1, 1]).unwrap();
        let source = Band::from_rows(geo, i32::NODATA, vec![5, 5, 5]).unwrap();
        let subareas = Band::from_rows(geo, i32::NODATA, vec![7, 7, 8]).unwrap();
        let weights = WeightTable::build(&geo, &Spacing::uniform(10.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights)
            .with_subareas(&subareas);

        let pass = OutletDistance::new();
        // Same subarea: carry the downstream total.
        let t = resolved(Direction::East, 0, 1, 30.0);
        assert_eq!(pass.finalize(&ctx, 0, 0, Some(&t)), Finalize::Write(40.0));
        // Crossing 7 -> 8: restart at the hop length.
        let t = resolved(Direction::East, 0, 2, 30.0);
        assert_eq!(pass.finalize(&ctx, 0, 1, Some(&t)), Finalize::Write(10.0));
        // Terminus.
        assert_eq!(pass.finalize(&ctx, 0, 2, None), Finalize::Write(0.0));
    }

    #[test]
    fn nodata_subarea_on_either_side_restarts() {
        let geo = geo(1, 3);
        let dirs = Band::from_rows(geo, i16::NODATA, vec![1, 1, 1]).unwrap();
        let source = Band::from_rows(geo, i32::NODATA, vec![5, 5, 5]).unwrap();
        let subareas =
            Band::from_rows(geo, i32::NODATA, vec![i32::NODATA, 7, i32::NODATA]).unwrap();
        let weights = WeightTable::build(&geo, &Spacing::uniform(10.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights)
            .with_subareas(&subareas);

        let pass = OutletDistance::new();
        let t = resolved(Direction::East, 0, 1, 25.0);
        assert_eq!(pass.finalize(&ctx, 0, 0, Some(&t)), Finalize::Write(10.0));
        let t = resolved(Direction::East, 0, 2, 25.0);
        assert_eq!(pass.finalize(&ctx, 0, 1, Some(&t)), Finalize::Write(10.0));
    }

    #[test]
    fn diagonal_hops_use_the_diagonal_edge_length() {
        let geo = geo(2, 2);
        // (0,0) drains southeast into (1,1).
        let dirs = Band::from_rows(geo, i16::NODATA, vec![8, 1, 1, 1]).unwrap();
        let source = Band::filled(geo, i32::NODATA, 5);
        let subareas = Band::filled(geo, i32::NODATA, 7);
        let weights = WeightTable::build(&geo, &Spacing::rectangular(3.0, 4.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights)
            .with_subareas(&subareas);

        let t = resolved(Direction::SouthEast, 1, 1, 0.0);
        let decided = OutletDistance::new().finalize(&ctx, 0, 0, Some(&t));
        match decided {
            Finalize::Write(d) => assert!((d - 5.0).abs() < 1e-6),
            other => panic!("expected a write, got {other:?}"),
        }
    }

    #[test]
    fn contributors_are_source_cells() {
        let geo = geo(1, 2);
        let dirs = Band::from_rows(geo, i16::NODATA, vec![1, 1]).unwrap();
        let source = Band::from_rows(geo, i32::NODATA, vec![5, i32::NODATA]).unwrap();
        let subareas = Band::filled(geo, i32::NODATA, 1);
        let weights = WeightTable::build(&geo, &Spacing::uniform(10.0).unwrap());
        let ctx = PassContext::new(FlowField::new(&dirs), &source, 1, &weights)
            .with_subareas(&subareas);

        let pass = OutletDistance::new();
        assert!(pass.contributes(&ctx, 0, 0));
        assert!(!pass.contributes(&ctx, 0, 1));
    }
}
