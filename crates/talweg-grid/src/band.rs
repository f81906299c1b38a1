//! Per-layer band storage with halo rows.

use talweg_core::CellValue;

use crate::error::GridError;
use crate::partition::BandGeometry;

/// Which halo row of a band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// The halo above local row 0 (local row `-1`).
    Top,
    /// The halo below the last local row (local row `rows`).
    Bottom,
}

/// One layer's storage for a single worker: the locally owned rows plus
/// two halo rows.
///
/// The halo rows have two uses, mirroring how the traversal drives them.
/// For value layers, [`GridLinks::share`](crate::GridLinks::share) fills
/// them with the neighbors' current edge rows and they are read like any
/// other cell. For the dependency-counter layer they act as delta
/// accumulators: [`Band::add_to`] routes halo-row writes into them,
/// [`GridLinks::add_borders`](crate::GridLinks::add_borders) swaps them
/// with the neighbors and folds the received deltas into the local edge
/// rows (keeping the received deltas readable until the next round), and
/// [`Band::clear_halos`] zeroes them for the next round.
///
/// Reads outside the local-plus-halo window return the nodata sentinel;
/// writes outside the local window are silently ignored except for the
/// halo-row accumulation described above.
#[derive(Clone, Debug)]
pub struct Band<T: CellValue> {
    geo: BandGeometry,
    nodata: T,
    cells: Vec<T>,
    top: Vec<T>,
    bottom: Vec<T>,
}

impl<T: CellValue> Band<T> {
    /// Build a band with every local cell set to `fill` and halos nodata.
    pub fn filled(geo: BandGeometry, nodata: T, fill: T) -> Self {
        let cols = geo.cols() as usize;
        Self {
            geo,
            nodata,
            cells: vec![fill; geo.cell_count()],
            top: vec![nodata; cols],
            bottom: vec![nodata; cols],
        }
    }

    /// Build a band over existing row-major local rows.
    pub fn from_rows(geo: BandGeometry, nodata: T, rows: Vec<T>) -> Result<Self, GridError> {
        if rows.len() != geo.cell_count() {
            return Err(GridError::DataLength {
                expected: geo.cell_count(),
                got: rows.len(),
            });
        }
        let cols = geo.cols() as usize;
        Ok(Self {
            geo,
            nodata,
            cells: rows,
            top: vec![nodata; cols],
            bottom: vec![nodata; cols],
        })
    }

    /// Geometry of this band.
    pub fn geometry(&self) -> &BandGeometry {
        &self.geo
    }

    /// The layer's nodata sentinel.
    pub fn nodata(&self) -> T {
        self.nodata
    }

    fn index(&self, r: i32, c: i32) -> usize {
        r as usize * self.geo.cols() as usize + c as usize
    }

    /// Read a cell. Local rows and halo rows are addressable; anything
    /// else reads as nodata.
    pub fn get(&self, r: i32, c: i32) -> T {
        if c < 0 || c as u32 >= self.geo.cols() {
            return self.nodata;
        }
        if r == -1 {
            return self.top[c as usize];
        }
        if r >= 0 && (r as u32) < self.geo.rows() {
            return self.cells[self.index(r, c)];
        }
        if r as u32 == self.geo.rows() {
            return self.bottom[c as usize];
        }
        self.nodata
    }

    /// Whether a cell reads as nodata.
    pub fn is_nodata(&self, r: i32, c: i32) -> bool {
        self.get(r, c) == self.nodata
    }

    /// Write a locally owned cell. Writes elsewhere are ignored.
    pub fn set(&mut self, r: i32, c: i32, value: T) {
        if self.geo.is_in_partition(r, c) {
            let idx = self.index(r, c);
            self.cells[idx] = value;
        }
    }

    /// Write nodata to a locally owned cell.
    pub fn set_nodata(&mut self, r: i32, c: i32) {
        self.set(r, c, self.nodata);
    }

    /// Accumulate `delta` into a cell.
    ///
    /// Local cells add in place, except that nodata cells stay nodata.
    /// Writes to the halo rows accumulate into the delta buffers (a nodata
    /// buffer slot starts from zero). Anything else is ignored.
    pub fn add_to(&mut self, r: i32, c: i32, delta: T) {
        if c < 0 || c as u32 >= self.geo.cols() {
            return;
        }
        if self.geo.is_in_partition(r, c) {
            let idx = self.index(r, c);
            if self.cells[idx] != self.nodata {
                self.cells[idx] = self.cells[idx] + delta;
            }
            return;
        }
        let buffer = if r == -1 {
            &mut self.top
        } else if r as u32 == self.geo.rows() {
            &mut self.bottom
        } else {
            return;
        };
        let slot = &mut buffer[c as usize];
        let current = if *slot == self.nodata { T::ZERO } else { *slot };
        *slot = current + delta;
    }

    /// Borrow one locally owned row.
    pub fn row(&self, r: u32) -> &[T] {
        let cols = self.geo.cols() as usize;
        let from = r as usize * cols;
        &self.cells[from..from + cols]
    }

    /// Copy of the local edge row nearest to `edge`.
    pub fn edge_row(&self, edge: Edge) -> Vec<T> {
        match edge {
            Edge::Top => self.row(0).to_vec(),
            Edge::Bottom => self.row(self.geo.rows() - 1).to_vec(),
        }
    }

    /// Borrow a halo row.
    pub fn halo(&self, edge: Edge) -> &[T] {
        match edge {
            Edge::Top => &self.top,
            Edge::Bottom => &self.bottom,
        }
    }

    /// Copy of a halo row (used to hand delta buffers to a neighbor).
    pub fn halo_copy(&self, edge: Edge) -> Vec<T> {
        self.halo(edge).to_vec()
    }

    /// Replace a halo row with a received one.
    pub fn install_halo(&mut self, edge: Edge, row: Vec<T>) -> Result<(), GridError> {
        if row.len() != self.geo.cols() as usize {
            return Err(GridError::DataLength {
                expected: self.geo.cols() as usize,
                got: row.len(),
            });
        }
        match edge {
            Edge::Top => self.top = row,
            Edge::Bottom => self.bottom = row,
        }
        Ok(())
    }

    /// Fold the halo row at `edge` into the adjacent local edge row.
    ///
    /// Cell-wise: if either side is nodata the local cell becomes nodata,
    /// otherwise the halo value is added on. Used after border swap to
    /// apply the deltas a neighbor accumulated for this band.
    pub fn fold_halo(&mut self, edge: Edge) {
        let local_r = match edge {
            Edge::Top => 0,
            Edge::Bottom => self.geo.rows() - 1,
        };
        let cols = self.geo.cols() as usize;
        let from = local_r as usize * cols;
        let halo = match edge {
            Edge::Top => &self.top,
            Edge::Bottom => &self.bottom,
        };
        for c in 0..cols {
            let cell = &mut self.cells[from + c];
            if *cell == self.nodata || halo[c] == self.nodata {
                *cell = self.nodata;
            } else {
                *cell = *cell + halo[c];
            }
        }
    }

    /// Zero both halo rows, readying them as delta accumulators.
    pub fn clear_halos(&mut self) {
        self.top.fill(T::ZERO);
        self.bottom.fill(T::ZERO);
    }

    /// Consume the band, returning its local rows in row-major order.
    pub fn into_rows(self) -> Vec<T> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::BandDecomposition;
    use talweg_core::Rank;

    fn geo(total: u32, cols: u32, size: u32, rank: u32) -> BandGeometry {
        BandDecomposition::new(total, cols, size)
            .unwrap()
            .geometry(Rank(rank))
            .unwrap()
    }

    // ── Addressing ──

    #[test]
    fn reads_outside_the_window_are_nodata() {
        let band = Band::filled(geo(6, 4, 2, 0), -9999i32, 7);
        assert_eq!(band.get(0, 0), 7);
        assert_eq!(band.get(2, 3), 7);
        assert_eq!(band.get(-2, 0), -9999);
        assert_eq!(band.get(4, 0), -9999);
        assert_eq!(band.get(0, -1), -9999);
        assert_eq!(band.get(0, 4), -9999);
    }

    #[test]
    fn halo_rows_start_as_nodata() {
        let band = Band::filled(geo(6, 4, 2, 1), -1i16, 0);
        assert_eq!(band.get(-1, 2), -1);
        assert_eq!(band.get(band.geometry().rows() as i32, 2), -1);
    }

    #[test]
    fn set_ignores_non_local_cells() {
        let mut band = Band::filled(geo(6, 4, 2, 0), -9999i32, 0);
        band.set(-1, 0, 42);
        band.set(3, 0, 42);
        band.set(0, 9, 42);
        assert_eq!(band.get(-1, 0), -9999);
        assert_eq!(band.get(3, 0), -9999);
        band.set(1, 1, 42);
        assert_eq!(band.get(1, 1), 42);
    }

    #[test]
    fn from_rows_checks_length() {
        let g = geo(4, 3, 2, 0);
        assert!(matches!(
            Band::from_rows(g, 0i32, vec![1, 2, 3]),
            Err(GridError::DataLength {
                expected: 6,
                got: 3
            })
        ));
        let band = Band::from_rows(g, 0i32, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(band.row(1), &[4, 5, 6]);
    }

    // ── Delta accumulation ──

    #[test]
    fn add_to_routes_halo_writes_into_buffers() {
        let mut band = Band::filled(geo(6, 4, 3, 1), i16::MIN, 1);
        band.clear_halos();
        band.add_to(-1, 2, -1);
        band.add_to(-1, 2, -1);
        band.add_to(2, 0, -1);
        assert_eq!(band.halo(Edge::Top)[2], -2);
        assert_eq!(band.halo(Edge::Bottom)[0], -1);
        // Local cells accumulate in place.
        band.add_to(0, 0, -1);
        assert_eq!(band.get(0, 0), 0);
        // Off-grid columns are dropped.
        band.add_to(-1, -1, -1);
        band.add_to(-1, 4, -1);
    }

    #[test]
    fn add_to_leaves_nodata_cells_alone() {
        let mut band = Band::filled(geo(4, 2, 2, 0), i16::MIN, i16::MIN);
        band.add_to(0, 0, -1);
        assert_eq!(band.get(0, 0), i16::MIN);
    }

    #[test]
    fn fold_halo_adds_deltas_into_edge_rows() {
        let g = geo(4, 3, 2, 0);
        let mut band = Band::from_rows(g, i16::MIN, vec![1, 1, i16::MIN, 5, 5, 5]).unwrap();
        band.install_halo(Edge::Top, vec![-1, 0, -1]).unwrap();
        band.fold_halo(Edge::Top);
        assert_eq!(band.get(0, 0), 0);
        assert_eq!(band.get(0, 1), 1);
        // Nodata on either side wins.
        assert_eq!(band.get(0, 2), i16::MIN);
        // Bottom edge untouched.
        assert_eq!(band.row(1), &[5, 5, 5]);
    }

    #[test]
    fn fold_halo_with_nodata_delta_poisons_the_cell() {
        let g = geo(4, 2, 2, 1);
        let mut band = Band::from_rows(g, i16::MIN, vec![3, 3, 3, 3]).unwrap();
        band.install_halo(Edge::Bottom, vec![i16::MIN, 2]).unwrap();
        band.fold_halo(Edge::Bottom);
        assert_eq!(band.get(1, 0), i16::MIN);
        assert_eq!(band.get(1, 1), 5);
    }

    #[test]
    fn single_row_band_folds_both_edges_into_one_row() {
        let g = geo(2, 2, 2, 0);
        assert_eq!(g.rows(), 1);
        let mut band = Band::from_rows(g, i16::MIN, vec![4, 4]).unwrap();
        band.install_halo(Edge::Top, vec![-1, 0]).unwrap();
        band.install_halo(Edge::Bottom, vec![-1, -1]).unwrap();
        band.fold_halo(Edge::Top);
        band.fold_halo(Edge::Bottom);
        assert_eq!(band.row(0), &[2, 3]);
    }

    #[test]
    fn install_halo_rejects_wrong_width() {
        let mut band = Band::filled(geo(4, 3, 2, 0), 0i32, 0);
        assert!(matches!(
            band.install_halo(Edge::Top, vec![1, 2]),
            Err(GridError::DataLength {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn clear_halos_zeroes_both_buffers() {
        let mut band = Band::filled(geo(4, 2, 2, 1), i16::MIN, 0);
        band.clear_halos();
        assert_eq!(band.halo(Edge::Top), &[0, 0]);
        assert_eq!(band.halo(Edge::Bottom), &[0, 0]);
    }

    #[test]
    fn into_rows_returns_row_major_cells() {
        let g = geo(4, 2, 2, 1);
        let band = Band::from_rows(g, 0i32, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(band.into_rows(), vec![1, 2, 3, 4]);
    }
}
