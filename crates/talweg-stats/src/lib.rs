//! Watershed statistics over talweg distance layers.
//!
//! Two consumers sit downstream of the distance engine. The Lorenz
//! module ranks elevation, distance-to-outlet, and slope per land use
//! and reports curve points, areas under the curves, and hectare
//! extents as JSON ([`lorenz_report`]). The classify module paints a
//! per-subarea combined index into display classes over the subarea
//! raster ([`classify_subareas`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod error;
pub mod lorenz;
pub mod report;

pub use classify::{class_of, classify_subareas, read_index_table, IndexTable};
pub use error::StatsError;
pub use lorenz::{lorenz_report, WatershedLayers};
pub use report::{AreaSection, CurveSection, LandUseEntry, LorenzReport, WatershedTotals};
