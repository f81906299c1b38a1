//! Lorenz-curve aggregation over a watershed.
//!
//! Cells inside the watershed mask are grouped by land-use id. For each
//! land use the elevation, distance-to-outlet, and slope samples are
//! sorted and ranked with cumulative percents, adjacent duplicates are
//! dropped keeping the last (highest-ranked) occurrence, and the area
//! under each value-vs-percent curve is summed by trapezoids. Cell
//! counts and hectare areas are structural: a cell missing one sample
//! layer still counts toward its land use, it just contributes no point
//! to that curve.

use indexmap::IndexMap;
use log::debug;

use talweg_core::CellValue;

use crate::error::StatsError;
use crate::report::{AreaSection, CurveSection, LandUseEntry, LorenzReport, WatershedTotals};

/// Slope values closer than this collapse into one curve point.
///
/// Elevation and distance points are compared exactly. Slope rasters
/// carry derivative noise in the fourth decimal, so near-equal runs are
/// treated as one plateau.
const SLOPE_EPS: f32 = 0.001;

/// Square meters per hectare.
const M2_PER_HA: f64 = 10_000.0;

/// Input layers for one watershed, all in row-major cell order.
///
/// The watershed mask gates every other layer: cells where it is nodata
/// are outside the watershed and never sampled.
#[derive(Debug, Clone, Copy)]
pub struct WatershedLayers<'a> {
    /// Watershed mask; nodata marks cells outside the watershed.
    pub watershed: &'a [i32],
    /// Land-use id per cell.
    pub land_use: &'a [i32],
    /// Elevation per cell.
    pub elevation: &'a [f32],
    /// Distance to the watershed outlet per cell.
    pub distance: &'a [f32],
    /// Slope per cell.
    pub slope: &'a [f32],
}

impl WatershedLayers<'_> {
    fn check(&self) -> Result<(), StatsError> {
        let expected = self.watershed.len();
        for (layer, got) in [
            ("land use", self.land_use.len()),
            ("elevation", self.elevation.len()),
            ("distance", self.distance.len()),
            ("slope", self.slope.len()),
        ] {
            if got != expected {
                return Err(StatsError::LayerLen {
                    layer,
                    expected,
                    got,
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct LandUseSamples {
    cells: u64,
    elevation: Vec<f32>,
    distance: Vec<f32>,
    slope: Vec<f32>,
}

/// Build the Lorenz report for one watershed.
///
/// `dx` and `dy` are the cell extents in meters, used for the hectare
/// conversions. Land uses appear in the report in the order they are
/// first encountered scanning the grid.
pub fn lorenz_report(
    layers: &WatershedLayers<'_>,
    dx: f64,
    dy: f64,
) -> Result<LorenzReport, StatsError> {
    layers.check()?;
    if !(dx > 0.0) || !(dy > 0.0) {
        return Err(StatsError::BadSpacing { dx, dy });
    }

    let mut groups: IndexMap<i32, LandUseSamples> = IndexMap::new();
    for i in 0..layers.watershed.len() {
        if layers.watershed[i] == i32::NODATA || layers.land_use[i] == i32::NODATA {
            continue;
        }
        let group = groups.entry(layers.land_use[i]).or_default();
        group.cells += 1;
        if layers.elevation[i] != f32::NODATA {
            group.elevation.push(layers.elevation[i]);
        }
        if layers.distance[i] != f32::NODATA {
            group.distance.push(layers.distance[i]);
        }
        if layers.slope[i] != f32::NODATA {
            group.slope.push(layers.slope[i]);
        }
    }
    let total_cells: u64 = groups.values().map(|g| g.cells).sum();
    debug!(
        "lorenz: {} land uses over {} watershed cells",
        groups.len(),
        total_cells
    );

    let cell_ha = dx * dy / M2_PER_HA;
    let mut report = LorenzReport::default();
    for (id, samples) in groups {
        let elevation = ranked_curve(samples.elevation, |a, b| a == b);
        let distance = ranked_curve(samples.distance, |a, b| a == b);
        let slope = ranked_curve(samples.slope, |a, b| (a - b).abs() < SLOPE_EPS);
        let areas = AreaSection {
            elevation: elevation.area,
            distance: distance.area,
            slope: slope.area,
            cells: samples.cells,
            area_ha: samples.cells as f64 * cell_ha,
            area_fraction: samples.cells as f32 / total_cells as f32,
        };
        report.0.insert(
            id.to_string(),
            LandUseEntry {
                elevation: elevation.section,
                distance: distance.section,
                slope: slope.section,
                areas,
                totals: WatershedTotals {
                    cells: total_cells,
                    area_ha: total_cells as f64 * cell_ha,
                },
            },
        );
    }
    Ok(report)
}

struct RankedCurve {
    section: CurveSection,
    area: f32,
}

fn ranked_curve<F>(mut values: Vec<f32>, same: F) -> RankedCurve
where
    F: Fn(f32, f32) -> bool,
{
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    let mut section = CurveSection {
        values: Vec::with_capacity(n),
        percents: Vec::with_capacity(n),
    };
    for (i, &v) in values.iter().enumerate() {
        // A run of equal values keeps only its last member, which
        // carries the run's full cumulative rank.
        if i + 1 < n && same(v, values[i + 1]) {
            continue;
        }
        section.values.push(v);
        section
            .percents
            .push(((i + 1) as f64 * 100.0 / n as f64) as f32);
    }

    let mut area = 0.0f32;
    for i in 1..section.values.len() {
        area += (section.values[i] - section.values[i - 1])
            * (section.percents[i - 1] + section.percents[i])
            / 2.0;
    }
    RankedCurve { section, area }
}
