//! Benchmark profiles for the Talweg distance engine.
//!
//! Provides pre-built drainage grids for benchmarking:
//!
//! - [`reference_profile`]: 100x100 grid (10K cells), seeded southeast
//!   drainage with sparse stream cells and striped subareas
//! - [`stress_profile`]: 316x316 grid (~100K cells), same structure at
//!   10x the cell count

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use talweg_engine::PassInput;
use talweg_grid::Spacing;
use talweg_test_utils::{southeast_drainage, sparse_sources, striped_subareas};

/// Owned input layers for one benchmark grid.
pub struct BenchGrid {
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Uniform 30 m cell spacing.
    pub spacing: Spacing,
    /// Seeded acyclic direction layer with sparse holes.
    pub directions: Vec<i16>,
    /// Sparse stream network.
    pub source: Vec<i32>,
    /// Subarea stripes 25 rows tall.
    pub subareas: Vec<i32>,
}

impl BenchGrid {
    /// Borrow the layers as a pass input.
    pub fn input(&self) -> PassInput<'_> {
        PassInput {
            rows: self.rows,
            cols: self.cols,
            spacing: &self.spacing,
            directions: &self.directions,
            source: &self.source,
            subareas: Some(&self.subareas),
            baseline: None,
        }
    }
}

/// Build a reference benchmark grid: 100x100 (10K cells).
///
/// Roughly one cell in 12 has no direction and one in 6 is a stream
/// cell, which keeps both passes busy without letting either finish in
/// a single sweep.
pub fn reference_profile(seed: u64) -> BenchGrid {
    drainage_profile(100, 100, seed)
}

/// Build a stress benchmark grid: 316x316 (~100K cells).
///
/// Same structure as [`reference_profile`] at 10x the cell count.
pub fn stress_profile(seed: u64) -> BenchGrid {
    drainage_profile(316, 316, seed)
}

fn drainage_profile(rows: u32, cols: u32, seed: u64) -> BenchGrid {
    BenchGrid {
        rows,
        cols,
        spacing: Spacing::uniform(30.0).unwrap(),
        directions: southeast_drainage(rows, cols, seed, 12),
        source: sparse_sources(rows, cols, seed ^ 0x5eed, 6),
        subareas: striped_subareas(rows, cols, 25),
    }
}
