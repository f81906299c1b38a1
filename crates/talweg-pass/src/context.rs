//! Read-only view bundle handed to a pass for every per-cell question.

use talweg_core::{CellValue, Direction};
use talweg_grid::Band;

use crate::flow::FlowField;
use crate::weights::WeightTable;

/// Everything a pass may consult about a single worker's slice.
///
/// The engine builds one context per worker after the static layers
/// (direction, source, and any optional layers) have refreshed their
/// halo rows, so lookups here see their neighbors' edge values too.
/// Layers a pass did not declare read as nodata everywhere.
pub struct PassContext<'a> {
    flow: FlowField<'a>,
    source: &'a Band<i32>,
    threshold: i32,
    subareas: Option<&'a Band<i32>>,
    baseline: Option<&'a Band<f32>>,
    weights: &'a WeightTable,
}

impl<'a> PassContext<'a> {
    /// Bundle the mandatory layers: flow directions, the source raster
    /// with its membership threshold, and the band's edge weights.
    pub fn new(
        flow: FlowField<'a>,
        source: &'a Band<i32>,
        threshold: i32,
        weights: &'a WeightTable,
    ) -> Self {
        Self {
            flow,
            source,
            threshold,
            subareas: None,
            baseline: None,
            weights,
        }
    }

    /// Attach the subarea id layer.
    pub fn with_subareas(mut self, subareas: &'a Band<i32>) -> Self {
        self.subareas = Some(subareas);
        self
    }

    /// Attach a baseline distance layer for seeding.
    pub fn with_baseline(mut self, baseline: &'a Band<f32>) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// The flow-graph view.
    pub fn flow(&self) -> FlowField<'a> {
        self.flow
    }

    /// Raw source-layer value at a cell.
    pub fn source_at(&self, r: i32, c: i32) -> i32 {
        self.source.get(r, c)
    }

    /// Whether a cell meets the source-membership threshold.
    pub fn is_source(&self, r: i32, c: i32) -> bool {
        let v = self.source.get(r, c);
        v != i32::NODATA && v >= self.threshold
    }

    /// Subarea id at a cell, or nodata when no layer is attached.
    pub fn subarea_at(&self, r: i32, c: i32) -> i32 {
        match self.subareas {
            Some(band) => band.get(r, c),
            None => i32::NODATA,
        }
    }

    /// Baseline distance at a cell, or nodata when no layer is attached.
    pub fn baseline_at(&self, r: i32, c: i32) -> f32 {
        match self.baseline {
            Some(band) => band.get(r, c),
            None => f32::NODATA,
        }
    }

    /// Whether `(r, c)` is an owned cell or a populated halo cell.
    pub fn in_reach(&self, r: i32, c: i32) -> bool {
        self.source.geometry().has_access(r, c)
    }

    /// Edge length of one hop from `local_row` in direction `dir`.
    pub fn weight(&self, local_row: i32, dir: Direction) -> f32 {
        self.weights.weight(local_row, dir)
    }
}
