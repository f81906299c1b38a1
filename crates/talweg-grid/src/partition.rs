//! Row-band decomposition of a global grid.
//!
//! Rows are dealt out as evenly as possible: with `total_rows = q * size + r`,
//! the first `r` ranks get `q + 1` rows and the rest get `q`. Bands are
//! contiguous and ordered by rank, top to bottom.

use talweg_core::Rank;

use crate::error::GridError;

/// A validated split of `total_rows x cols` into one band per worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandDecomposition {
    total_rows: u32,
    cols: u32,
    size: u32,
}

impl BandDecomposition {
    /// Validate and build a decomposition.
    ///
    /// Requires a non-empty grid addressable with `i32` coordinates and
    /// `1 <= size <= total_rows` so that every band owns at least one row.
    pub fn new(total_rows: u32, cols: u32, size: u32) -> Result<Self, GridError> {
        if total_rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid);
        }
        let addressable = total_rows <= i32::MAX as u32
            && cols <= i32::MAX as u32
            && (total_rows as usize).checked_mul(cols as usize).is_some();
        if !addressable {
            return Err(GridError::DimensionTooLarge {
                rows: total_rows,
                cols,
            });
        }
        if size == 0 || size > total_rows {
            return Err(GridError::TooManyWorkers {
                workers: size,
                rows: total_rows,
            });
        }
        Ok(Self {
            total_rows,
            cols,
            size,
        })
    }

    /// Number of workers in the decomposition.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total rows of the global grid.
    pub fn total_rows(&self) -> u32 {
        self.total_rows
    }

    /// Columns of the global grid.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Geometry of one rank's band.
    pub fn geometry(&self, rank: Rank) -> Result<BandGeometry, GridError> {
        if rank.0 >= self.size {
            return Err(GridError::RankOutOfRange {
                rank,
                size: self.size,
            });
        }
        Ok(self.band_of(rank.0))
    }

    /// Geometries for every rank, in rank order.
    pub fn geometries(&self) -> Vec<BandGeometry> {
        (0..self.size).map(|r| self.band_of(r)).collect()
    }

    fn band_of(&self, rank: u32) -> BandGeometry {
        let base = self.total_rows / self.size;
        let extra = self.total_rows % self.size;
        let (start_row, rows) = if rank < extra {
            (rank * (base + 1), base + 1)
        } else {
            (extra * (base + 1) + (rank - extra) * base, base)
        };
        BandGeometry {
            rank: Rank(rank),
            size: self.size,
            total_rows: self.total_rows,
            cols: self.cols,
            start_row,
            rows,
        }
    }
}

/// Geometry of a single worker's band within the decomposition.
///
/// Local rows span `0..rows`; signed local row `-1` addresses the halo
/// above and `rows` the halo below. Halo rows are *accessible* only where
/// a neighboring band exists: rank 0 has nothing above it, the last rank
/// nothing below.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandGeometry {
    rank: Rank,
    size: u32,
    total_rows: u32,
    cols: u32,
    start_row: u32,
    rows: u32,
}

impl BandGeometry {
    /// Rank that owns this band.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Number of workers in the decomposition.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total rows of the global grid.
    pub fn total_rows(&self) -> u32 {
        self.total_rows
    }

    /// Columns of every row.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Global row index of local row 0.
    pub fn start_row(&self) -> u32 {
        self.start_row
    }

    /// Number of locally owned rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Whether a band exists above this one.
    pub fn has_up(&self) -> bool {
        self.rank.0 > 0
    }

    /// Whether a band exists below this one.
    pub fn has_down(&self) -> bool {
        self.rank.0 + 1 < self.size
    }

    /// Whether `(r, c)` is a locally owned cell.
    pub fn is_in_partition(&self, r: i32, c: i32) -> bool {
        r >= 0 && (r as u32) < self.rows && c >= 0 && (c as u32) < self.cols
    }

    /// Whether `(r, c)` can hold meaningful data here: a local cell, or a
    /// halo cell mirrored from an existing neighbor band.
    pub fn has_access(&self, r: i32, c: i32) -> bool {
        if c < 0 || (c as u32) >= self.cols {
            return false;
        }
        if r == -1 {
            return self.has_up();
        }
        if r >= 0 && (r as u32) < self.rows {
            return true;
        }
        r as u32 == self.rows && self.has_down()
    }

    /// Translate a local row (halo rows included) to its global row.
    pub fn global_row(&self, local: i32) -> i32 {
        self.start_row as i32 + local
    }

    /// Translate a global row to this band's local row coordinate.
    ///
    /// The result may lie outside the accessible window; pair with
    /// [`BandGeometry::has_access`] when that matters.
    pub fn local_row(&self, global: i32) -> i32 {
        global - self.start_row as i32
    }

    /// Number of locally owned cells.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_empty_and_oversubscribed_grids() {
        assert_eq!(
            BandDecomposition::new(0, 10, 1).unwrap_err(),
            GridError::EmptyGrid
        );
        assert_eq!(
            BandDecomposition::new(10, 0, 1).unwrap_err(),
            GridError::EmptyGrid
        );
        assert_eq!(
            BandDecomposition::new(3, 10, 4).unwrap_err(),
            GridError::TooManyWorkers {
                workers: 4,
                rows: 3
            }
        );
        assert_eq!(
            BandDecomposition::new(3, 10, 0).unwrap_err(),
            GridError::TooManyWorkers {
                workers: 0,
                rows: 3
            }
        );
    }

    #[test]
    fn remainder_rows_go_to_low_ranks() {
        let decomp = BandDecomposition::new(10, 4, 3).unwrap();
        let geos = decomp.geometries();
        assert_eq!(geos[0].rows(), 4);
        assert_eq!(geos[1].rows(), 3);
        assert_eq!(geos[2].rows(), 3);
        assert_eq!(geos[0].start_row(), 0);
        assert_eq!(geos[1].start_row(), 4);
        assert_eq!(geos[2].start_row(), 7);
    }

    #[test]
    fn geometry_matches_geometries() {
        let decomp = BandDecomposition::new(17, 9, 5).unwrap();
        for (i, geo) in decomp.geometries().into_iter().enumerate() {
            assert_eq!(decomp.geometry(Rank(i as u32)).unwrap(), geo);
        }
        assert!(matches!(
            decomp.geometry(Rank(5)),
            Err(GridError::RankOutOfRange { .. })
        ));
    }

    #[test]
    fn halo_access_respects_grid_edges() {
        let decomp = BandDecomposition::new(6, 3, 3).unwrap();
        let geos = decomp.geometries();
        // Top band: no halo above, halo below.
        assert!(!geos[0].has_access(-1, 0));
        assert!(geos[0].has_access(geos[0].rows() as i32, 0));
        // Middle band: both halos.
        assert!(geos[1].has_access(-1, 2));
        assert!(geos[1].has_access(geos[1].rows() as i32, 2));
        // Bottom band: halo above only.
        assert!(geos[2].has_access(-1, 0));
        assert!(!geos[2].has_access(geos[2].rows() as i32, 0));
        // Columns are always bounded.
        assert!(!geos[1].has_access(0, -1));
        assert!(!geos[1].has_access(0, 3));
    }

    #[test]
    fn row_translation_round_trips() {
        let geo = BandDecomposition::new(20, 4, 4)
            .unwrap()
            .geometry(Rank(2))
            .unwrap();
        assert_eq!(geo.start_row(), 10);
        assert_eq!(geo.global_row(0), 10);
        assert_eq!(geo.global_row(-1), 9);
        assert_eq!(geo.local_row(14), 4);
        assert_eq!(geo.local_row(geo.global_row(3)), 3);
    }

    proptest! {
        #[test]
        fn bands_tile_the_grid_exactly(total in 1u32..500, cols in 1u32..64, size in 1u32..32) {
            prop_assume!(size <= total);
            let decomp = BandDecomposition::new(total, cols, size).unwrap();
            let geos = decomp.geometries();
            prop_assert_eq!(geos.len() as u32, size);
            let mut next_row = 0u32;
            for geo in &geos {
                prop_assert!(geo.rows() >= 1);
                prop_assert_eq!(geo.start_row(), next_row);
                next_row += geo.rows();
            }
            prop_assert_eq!(next_row, total);
            // Row counts differ by at most one across ranks.
            let min = geos.iter().map(|g| g.rows()).min().unwrap();
            let max = geos.iter().map(|g| g.rows()).max().unwrap();
            prop_assert!(max - min <= 1);
        }
    }
}
