//! Precomputed edge weights for one worker's band.
//!
//! Each hop along a flow path costs the geometric length of the step,
//! which depends on the direction taken and on the cell spacing of the
//! row the step starts from. Looking that up per cell would repeat the
//! same hypotenuse over an entire band, so the lengths are materialized
//! once per pass as a rows-by-eight table.

use talweg_core::Direction;
use talweg_grid::{BandGeometry, Spacing};

/// Edge lengths for every (local row, direction) pair of a band.
///
/// Weights exist only for owned rows. Halo rows never start a hop; a
/// finalized cell always lies inside the partition.
#[derive(Clone, Debug)]
pub struct WeightTable {
    rows: u32,
    lengths: Vec<f32>,
}

impl WeightTable {
    /// Materialize the table for a band under the given spacing.
    pub fn build(geo: &BandGeometry, spacing: &Spacing) -> Self {
        let rows = geo.rows();
        let mut lengths = Vec::with_capacity(rows as usize * Direction::ALL.len());
        for local in 0..rows as i32 {
            let (dx, dy) = spacing.at(geo.global_row(local));
            for dir in Direction::ALL {
                lengths.push(dir.edge_length(dx, dy) as f32);
            }
        }
        Self { rows, lengths }
    }

    /// Number of owned rows the table covers.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Length of one hop starting at `local_row` in direction `dir`.
    pub fn weight(&self, local_row: i32, dir: Direction) -> f32 {
        debug_assert!(local_row >= 0 && (local_row as u32) < self.rows);
        let slot = local_row as usize * Direction::ALL.len() + (dir.code() as usize - 1);
        self.lengths[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talweg_core::Rank;
    use talweg_grid::BandDecomposition;

    #[test]
    fn axis_and_diagonal_weights_from_uniform_spacing() {
        let geo = BandDecomposition::new(2, 3, 1)
            .unwrap()
            .geometry(Rank(0))
            .unwrap();
        let spacing = Spacing::rectangular(3.0, 4.0).unwrap();
        let table = WeightTable::build(&geo, &spacing);
        assert_eq!(table.rows(), 2);
        assert_eq!(table.weight(0, Direction::East), 3.0);
        assert_eq!(table.weight(1, Direction::South), 4.0);
        assert!((table.weight(0, Direction::NorthWest) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn rows_index_by_global_position_of_the_band() {
        // Per-row dx shrinks with the row index; rank 1 of a 4-row grid
        // owns global rows 2 and 3.
        let spacing = Spacing::per_row(
            vec![40.0, 30.0, 20.0, 10.0],
            vec![50.0, 50.0, 50.0, 50.0],
        )
        .unwrap();
        let geo = BandDecomposition::new(4, 2, 2)
            .unwrap()
            .geometry(Rank(1))
            .unwrap();
        let table = WeightTable::build(&geo, &spacing);
        assert_eq!(table.weight(0, Direction::East), 20.0);
        assert_eq!(table.weight(1, Direction::West), 10.0);
        assert_eq!(table.weight(0, Direction::North), 50.0);
    }
}
