//! Talweg: flow-path distances and watershed statistics over D8 rasters.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Talweg sub-crates. For most users, adding `talweg` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use talweg::prelude::*;
//!
//! // A single west-to-east flow line. The rightmost cell is on the
//! // source network; the two cells above it drain toward it.
//! let spacing = Spacing::uniform(30.0).unwrap();
//! let directions: Vec<i16> = vec![1, 1, 0];
//! let source: Vec<i32> = vec![0, 0, 1];
//!
//! let input = PassInput {
//!     rows: 1,
//!     cols: 3,
//!     spacing: &spacing,
//!     directions: &directions,
//!     source: &source,
//!     subareas: None,
//!     baseline: None,
//! };
//! let output = run_pass(&StreamDistance::new(), &input, &RunConfig::default()).unwrap();
//! assert_eq!(output.distances, vec![60.0, 30.0, 0.0]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `talweg-core` | Cell value trait, direction codes, worker ranks |
//! | [`grid`] | `talweg-grid` | Row bands, decomposition, halo links, spacing |
//! | [`pass`] | `talweg-pass` | The [`pass::DistancePass`] trait and flow-graph view |
//! | [`passes`] | `talweg-passes` | Shipped passes (outlet and stream distance) |
//! | [`engine`] | `talweg-engine` | The [`engine::run_pass`] driver and its configuration |
//! | [`raster`] | `talweg-raster` | ESRI ASCII grid reading and writing |
//! | [`stats`] | `talweg-stats` | Lorenz-curve reports and index classification |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Cell values, direction codes, and worker ranks (`talweg-core`).
///
/// The [`types::CellValue`] trait defines the three layer kinds the
/// engine moves over the wire; [`types::Direction`] decodes D8 codes.
pub use talweg_core as types;

/// Banded raster storage and halo exchange (`talweg-grid`).
///
/// [`grid::Band`] holds one worker's rows plus halo, and
/// [`grid::BandDecomposition`] splits a grid across workers.
pub use talweg_grid as grid;

/// The distance-pass trait and flow-graph accessors (`talweg-pass`).
///
/// Implement [`pass::DistancePass`] to define a new traversal; the
/// [`pass::FlowField`] view resolves D8 codes into drain targets.
pub use talweg_pass as pass;

/// Shipped distance passes (`talweg-passes`).
///
/// [`passes::OutletDistance`] walks the source network down to each
/// subarea outlet; [`passes::StreamDistance`] measures every cell's
/// path down to the network, optionally seeded from a baseline layer.
pub use talweg_passes as passes;

/// The worklist engine (`talweg-engine`).
///
/// [`engine::run_pass`] drives a pass over in-process workers and
/// stitches the per-band results back into one grid.
pub use talweg_engine as engine;

/// ESRI ASCII grid I/O (`talweg-raster`).
///
/// [`raster::read_grid`] and [`raster::write_grid`] move typed layers
/// between files and the flat row-major slices the engine consumes.
pub use talweg_raster as raster;

/// Watershed statistics (`talweg-stats`).
///
/// Build Lorenz-curve reports with [`stats::lorenz_report`] and paint
/// classified index rasters with [`stats::classify_subareas`].
pub use talweg_stats as stats;

/// Common imports for typical Talweg usage.
///
/// ```rust
/// use talweg::prelude::*;
/// ```
///
/// This imports the most frequently used items: the engine entry point
/// and its input/output types, the shipped passes, grid spacing, cell
/// values, raster I/O, and the statistics builders.
pub mod prelude {
    // Cell values and directions
    pub use talweg_core::{CellKind, CellValue, Direction};

    // Grid geometry
    pub use talweg_grid::{Band, BandDecomposition, Spacing};

    // Errors
    pub use talweg_engine::EngineError;
    pub use talweg_grid::GridError;
    pub use talweg_raster::RasterError;
    pub use talweg_stats::StatsError;

    // Pass trait
    pub use talweg_pass::{CellClass, DistancePass, Finalize, PassContext, Resolved};

    // Shipped passes
    pub use talweg_passes::{OutletDistance, SeedOrigin, StreamDistance};

    // Engine
    pub use talweg_engine::{run_pass, PassInput, PassOutput, RunConfig, RunStats};

    // Raster I/O
    pub use talweg_raster::{read_grid, write_grid, GridHeader};

    // Statistics
    pub use talweg_stats::{classify_subareas, lorenz_report, LorenzReport, WatershedLayers};
}
