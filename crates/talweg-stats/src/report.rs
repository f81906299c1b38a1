//! Lorenz report structure.
//!
//! The report is a JSON object keyed by land-use id in first-encounter
//! order. Each land use carries three ranked curves (elevation, distance
//! to the watershed outlet, slope), the areas under those curves, and
//! the watershed totals the fractions are taken against. Key names
//! follow the downstream consumers of these reports and are fixed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-watershed Lorenz statistics, keyed by land-use id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LorenzReport(pub IndexMap<String, LandUseEntry>);

/// Statistics for one land use within the watershed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandUseEntry {
    /// Ranked elevation curve.
    #[serde(rename = "Elevation")]
    pub elevation: CurveSection,
    /// Ranked distance-to-outlet curve.
    #[serde(rename = "Dist2WSOlt")]
    pub distance: CurveSection,
    /// Ranked slope curve.
    #[serde(rename = "Slope")]
    pub slope: CurveSection,
    /// Areas under the curves and land-use extent.
    #[serde(rename = "LULZAreas")]
    pub areas: AreaSection,
    /// Watershed totals, repeated per land use for consumer convenience.
    #[serde(rename = "TotalSubArea")]
    pub totals: WatershedTotals,
}

/// One ranked curve: sorted values with their cumulative percents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveSection {
    /// Sorted sample values, adjacent duplicates removed.
    #[serde(rename = "Value")]
    pub values: Vec<f32>,
    /// Cumulative percent rank of each kept value.
    #[serde(rename = "Percent")]
    pub percents: Vec<f32>,
}

/// Areas under the curves plus the land use's share of the watershed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSection {
    /// Trapezoid area under the elevation curve.
    #[serde(rename = "lzAreaElevation")]
    pub elevation: f32,
    /// Trapezoid area under the distance curve.
    #[serde(rename = "lzAreaDistance")]
    pub distance: f32,
    /// Trapezoid area under the slope curve.
    #[serde(rename = "lzAreaSlope")]
    pub slope: f32,
    /// Cells of this land use inside the watershed.
    #[serde(rename = "totalCell")]
    pub cells: u64,
    /// Land-use area in hectares.
    #[serde(rename = "totalLuArea")]
    pub area_ha: f64,
    /// Land-use share of the watershed, as a fraction.
    #[serde(rename = "totalLuAreaPer")]
    pub area_fraction: f32,
}

/// Whole-watershed cell count and area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatershedTotals {
    /// Valid cells in the watershed.
    #[serde(rename = "TotalCellCount")]
    pub cells: u64,
    /// Watershed area in hectares.
    #[serde(rename = "TotalArea")]
    pub area_ha: f64,
}
