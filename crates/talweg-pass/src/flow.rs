//! Read-only flow-graph view over a D8 direction band.

use smallvec::SmallVec;
use talweg_core::Direction;
use talweg_grid::Band;

/// A contributing neighbor: the direction from the receiving cell toward
/// it, and its own coordinates.
pub type Contributor = (Direction, i32, i32);

/// Flow-graph accessor over a direction layer.
///
/// Direction codes outside 1-8 (including the layer's nodata sentinel
/// and the flat-cell code 0 some products emit) read as "no resolvable
/// direction".
#[derive(Clone, Copy)]
pub struct FlowField<'a> {
    band: &'a Band<i16>,
}

impl<'a> FlowField<'a> {
    /// View the given direction band as a flow graph.
    pub fn new(band: &'a Band<i16>) -> Self {
        Self { band }
    }

    /// The underlying direction band.
    pub fn band(&self) -> &'a Band<i16> {
        self.band
    }

    /// Decoded direction of a cell, if it has one.
    pub fn direction_at(&self, r: i32, c: i32) -> Option<Direction> {
        let code = self.band.get(r, c);
        if code == self.band.nodata() {
            return None;
        }
        Direction::from_code(code)
    }

    /// Coordinates this cell drains to, with the direction taken.
    pub fn target_of(&self, r: i32, c: i32) -> Option<(Direction, i32, i32)> {
        let dir = self.direction_at(r, c)?;
        let (dr, dc) = dir.offset();
        Some((dir, r + dr, c + dc))
    }

    /// Whether the cell at `(nr, nc)` drains into `(r, c)`.
    pub fn drains_into(&self, nr: i32, nc: i32, r: i32, c: i32) -> bool {
        match self.target_of(nr, nc) {
            Some((_, tr, tc)) => tr == r && tc == c,
            None => false,
        }
    }

    /// Neighbors of `(r, c)` that drain into it, in direction-code order.
    ///
    /// The fixed order keeps decrement delivery deterministic on every
    /// worker.
    pub fn contributors(&self, r: i32, c: i32) -> SmallVec<[Contributor; 8]> {
        let mut found = SmallVec::new();
        for dir in Direction::ALL {
            let (dr, dc) = dir.offset();
            let (nr, nc) = (r + dr, c + dc);
            if self.drains_into(nr, nc, r, c) {
                found.push((dir, nr, nc));
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talweg_core::{CellValue, Rank};
    use talweg_grid::BandDecomposition;

    fn band_3x3(codes: [i16; 9]) -> Band<i16> {
        let geo = BandDecomposition::new(3, 3, 1)
            .unwrap()
            .geometry(Rank(0))
            .unwrap();
        Band::from_rows(geo, i16::NODATA, codes.to_vec()).unwrap()
    }

    #[test]
    fn nodata_and_invalid_codes_have_no_direction() {
        let band = band_3x3([i16::NODATA, 0, 9, 1, 2, 3, 4, 5, 6]);
        let flow = FlowField::new(&band);
        assert_eq!(flow.direction_at(0, 0), None);
        assert_eq!(flow.direction_at(0, 1), None);
        assert_eq!(flow.direction_at(0, 2), None);
        assert_eq!(flow.direction_at(1, 0), Some(Direction::East));
    }

    #[test]
    fn target_follows_the_direction_offset() {
        let band = band_3x3([1, 1, 7, 1, 1, 7, 1, 1, 1]);
        let flow = FlowField::new(&band);
        // (0,2) has code 7 (south): drains to (1,2).
        assert_eq!(flow.target_of(0, 2), Some((Direction::South, 1, 2)));
        // (1,0) has code 1 (east): drains to (1,1).
        assert_eq!(flow.target_of(1, 0), Some((Direction::East, 1, 1)));
        assert!(flow.drains_into(0, 2, 1, 2));
        assert!(!flow.drains_into(0, 2, 0, 1));
    }

    #[test]
    fn contributors_come_back_in_code_order() {
        // Every neighbor points back at the center cell.
        let band = band_3x3([8, 7, 6, 1, i16::NODATA, 5, 2, 3, 4]);
        let flow = FlowField::new(&band);
        let contributors = flow.contributors(1, 1);
        let dirs: Vec<Direction> = contributors.iter().map(|&(d, _, _)| d).collect();
        assert_eq!(
            dirs,
            vec![
                Direction::East,
                Direction::NorthEast,
                Direction::North,
                Direction::NorthWest,
                Direction::West,
                Direction::SouthWest,
                Direction::South,
                Direction::SouthEast,
            ]
        );
        // The reported coordinates are the neighbors themselves.
        assert_eq!(contributors[0].1, 1);
        assert_eq!(contributors[0].2, 2);
    }

    #[test]
    fn contributors_skip_cells_draining_elsewhere() {
        let band = band_3x3([1, 1, 1, 1, 1, 1, 1, 1, 1]);
        let flow = FlowField::new(&band);
        // Everything drains east; only the west neighbor of (1,1) points
        // at it.
        let contributors = flow.contributors(1, 1);
        assert_eq!(contributors.len(), 1);
        assert_eq!(contributors[0], (Direction::West, 1, 0));
    }
}
