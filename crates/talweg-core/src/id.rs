//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a worker within a band-partitioned run.
///
/// Ranks are dense and zero-based, assigned in top-to-bottom band order:
/// rank 0 owns the topmost rows, rank `size - 1` the bottommost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
