//! D8 flow direction codes.
//!
//! Each grid cell drains to exactly one of its 8 neighbors, encoded as a
//! small integer 1-8 counted counterclockwise from east:
//!
//! ```text
//!         4   3   2
//!          \  |  /
//!       5 -- cell -- 1
//!          /  |  \
//!         6   7   8
//! ```
//!
//! Odd codes are axis-aligned, even codes are diagonal, and the opposite
//! of a code differs from it by exactly 4.

use std::fmt;

/// A D8 flow direction code.
///
/// The discriminant is the on-disk code, so `Direction::North as i16 == 3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum Direction {
    /// Code 1: one column right.
    East = 1,
    /// Code 2: one row up, one column right.
    NorthEast = 2,
    /// Code 3: one row up.
    North = 3,
    /// Code 4: one row up, one column left.
    NorthWest = 4,
    /// Code 5: one column left.
    West = 5,
    /// Code 6: one row down, one column left.
    SouthWest = 6,
    /// Code 7: one row down.
    South = 7,
    /// Code 8: one row down, one column right.
    SouthEast = 8,
}

impl Direction {
    /// All eight directions in code order 1-8.
    ///
    /// Neighbor scans iterate this array so that processing order is the
    /// same on every worker.
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Decode a raw cell value; `None` for anything outside 1-8.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Self::East),
            2 => Some(Self::NorthEast),
            3 => Some(Self::North),
            4 => Some(Self::NorthWest),
            5 => Some(Self::West),
            6 => Some(Self::SouthWest),
            7 => Some(Self::South),
            8 => Some(Self::SouthEast),
            _ => None,
        }
    }

    /// The on-disk code, 1-8.
    pub fn code(self) -> i16 {
        self as i16
    }

    /// `(row delta, column delta)` of the drained-to neighbor.
    ///
    /// Row deltas grow downward, matching raster row order.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::East => (0, 1),
            Self::NorthEast => (-1, 1),
            Self::North => (-1, 0),
            Self::NorthWest => (-1, -1),
            Self::West => (0, -1),
            Self::SouthWest => (1, -1),
            Self::South => (1, 0),
            Self::SouthEast => (1, 1),
        }
    }

    /// The direction pointing back at the origin cell.
    pub fn opposite(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::NorthEast => Self::SouthWest,
            Self::North => Self::South,
            Self::NorthWest => Self::SouthEast,
            Self::West => Self::East,
            Self::SouthWest => Self::NorthEast,
            Self::South => Self::North,
            Self::SouthEast => Self::NorthWest,
        }
    }

    /// Whether this direction is diagonal (even code).
    pub fn is_diagonal(self) -> bool {
        self.code() % 2 == 0
    }

    /// Geometric length of the edge to the drained-to neighbor.
    ///
    /// Axis-aligned east/west edges span `dx`, north/south edges span
    /// `dy`, and diagonal edges span the Euclidean combination of both.
    pub fn edge_length(self, dx: f64, dy: f64) -> f64 {
        match self {
            Self::East | Self::West => dx,
            Self::North | Self::South => dy,
            _ => (dx * dx + dy * dy).sqrt(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbrev = match self {
            Self::East => "E",
            Self::NorthEast => "NE",
            Self::North => "N",
            Self::NorthWest => "NW",
            Self::West => "W",
            Self::SouthWest => "SW",
            Self::South => "S",
            Self::SouthEast => "SE",
        };
        write!(f, "{abbrev}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_code(dir.code()), Some(dir));
        }
    }

    #[test]
    fn invalid_codes_are_rejected() {
        assert_eq!(Direction::from_code(0), None);
        assert_eq!(Direction::from_code(9), None);
        assert_eq!(Direction::from_code(-1), None);
        assert_eq!(Direction::from_code(i16::MIN), None);
    }

    #[test]
    fn opposite_is_an_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn opposite_negates_the_offset() {
        for dir in Direction::ALL {
            let (dr, dc) = dir.offset();
            let (or, oc) = dir.opposite().offset();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }

    #[test]
    fn opposite_codes_differ_by_four() {
        for dir in Direction::ALL {
            assert_eq!((dir.code() - dir.opposite().code()).abs(), 4);
        }
    }

    #[test]
    fn diagonal_matches_code_parity() {
        for dir in Direction::ALL {
            let (dr, dc) = dir.offset();
            assert_eq!(dir.is_diagonal(), dr != 0 && dc != 0);
            assert_eq!(dir.is_diagonal(), dir.code() % 2 == 0);
        }
    }

    #[test]
    fn edge_lengths_follow_spacing() {
        assert_eq!(Direction::East.edge_length(30.0, 20.0), 30.0);
        assert_eq!(Direction::South.edge_length(30.0, 20.0), 20.0);
        let diag = Direction::SouthEast.edge_length(3.0, 4.0);
        assert!((diag - 5.0).abs() < 1e-12);
    }
}
