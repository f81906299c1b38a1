//! Error types for partition geometry and halo exchange.

use std::error::Error;
use std::fmt;

use talweg_core::cell::KindError;
use talweg_core::Rank;

/// Errors from partition geometry and band storage.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// The grid has zero rows or zero columns.
    EmptyGrid,
    /// Grid dimensions exceed what signed 32-bit coordinates can address.
    DimensionTooLarge {
        /// Total rows requested.
        rows: u32,
        /// Columns requested.
        cols: u32,
    },
    /// More workers than grid rows; every band needs at least one row.
    TooManyWorkers {
        /// Workers requested.
        workers: u32,
        /// Rows available.
        rows: u32,
    },
    /// A rank outside `0..size` was asked for.
    RankOutOfRange {
        /// The offending rank.
        rank: Rank,
        /// Number of workers in the decomposition.
        size: u32,
    },
    /// A data vector's length does not match the expected cell count.
    DataLength {
        /// Cells expected.
        expected: usize,
        /// Cells provided.
        got: usize,
    },
    /// A cell spacing value is zero, negative, or not finite.
    BadSpacing {
        /// The offending value.
        value: f64,
    },
    /// Per-row spacing tables disagree in length with the grid.
    SpacingLength {
        /// Rows expected.
        expected: usize,
        /// Rows provided.
        got: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid has no cells"),
            Self::DimensionTooLarge { rows, cols } => {
                write!(f, "grid {rows}x{cols} exceeds addressable coordinates")
            }
            Self::TooManyWorkers { workers, rows } => {
                write!(f, "{workers} workers for {rows} rows; every band needs a row")
            }
            Self::RankOutOfRange { rank, size } => {
                write!(f, "rank {rank} outside decomposition of size {size}")
            }
            Self::DataLength { expected, got } => {
                write!(f, "expected {expected} cells, got {got}")
            }
            Self::BadSpacing { value } => {
                write!(f, "cell spacing {value} is not a positive finite number")
            }
            Self::SpacingLength { expected, got } => {
                write!(f, "expected spacing for {expected} rows, got {got}")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from the halo exchange and termination ring.
///
/// All of these indicate a broken worker set, not a recoverable condition:
/// a peer hung up mid-protocol or sent a row for the wrong layer.
#[derive(Clone, Debug, PartialEq)]
pub enum ExchangeError {
    /// A neighbor's channel closed before the exchange completed.
    Disconnected {
        /// Rank of the worker that observed the closure.
        rank: Rank,
    },
    /// A received row was for a layer of a different cell kind.
    RowKind(KindError),
    /// A termination-ring message arrived out of protocol order.
    Protocol {
        /// Rank of the worker that observed the violation.
        rank: Rank,
        /// What was expected at this point.
        expected: &'static str,
    },
    /// Band storage rejected an exchanged row.
    Grid(GridError),
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { rank } => {
                write!(f, "rank {rank}: neighbor channel disconnected")
            }
            Self::RowKind(err) => write!(f, "exchanged row kind mismatch: {err}"),
            Self::Protocol { rank, expected } => {
                write!(f, "rank {rank}: termination ring expected {expected}")
            }
            Self::Grid(err) => write!(f, "exchange rejected by band storage: {err}"),
        }
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RowKind(err) => Some(err),
            Self::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<KindError> for ExchangeError {
    fn from(err: KindError) -> Self {
        Self::RowKind(err)
    }
}

impl From<GridError> for ExchangeError {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}
