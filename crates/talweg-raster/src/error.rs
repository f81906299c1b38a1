//! Error types for raster reading and writing.

use std::fmt;
use std::io;

use talweg_core::CellKind;

/// Errors raised while reading or writing an ASCII grid.
#[derive(Debug)]
pub enum RasterError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// A header line did not split into a key and a value.
    MalformedHeader {
        /// The offending line, trimmed.
        line: String,
    },
    /// A header key is not part of the ASCII grid format.
    UnknownHeaderKey {
        /// The unrecognized key.
        key: String,
    },
    /// A header value failed to parse for its key.
    BadHeaderValue {
        /// Header key the value belongs to.
        key: &'static str,
        /// The unparsable token.
        value: String,
    },
    /// A required header key never appeared.
    MissingHeader {
        /// The absent key.
        key: &'static str,
    },
    /// A cell token is not a number.
    BadCell {
        /// Flat row-major index of the cell.
        index: usize,
        /// The unparsable token.
        token: String,
    },
    /// A cell value cannot be stored in the requested kind without loss.
    LossyCell {
        /// Kind the caller asked for.
        kind: CellKind,
        /// Flat row-major index of the cell.
        index: usize,
        /// The parsed value that does not fit.
        value: f64,
    },
    /// The grid body holds a different number of cells than the header
    /// promises.
    CellCount {
        /// `nrows * ncols` from the header.
        expected: usize,
        /// Cells actually present.
        got: usize,
    },
    /// The grid contains nodata cells but the header declares no
    /// `NODATA_value` to map them to.
    UnmappedNodata,
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MalformedHeader { line } => {
                write!(f, "malformed header line: {line:?}")
            }
            Self::UnknownHeaderKey { key } => {
                write!(f, "unknown header key {key:?}")
            }
            Self::BadHeaderValue { key, value } => {
                write!(f, "bad value {value:?} for header key {key}")
            }
            Self::MissingHeader { key } => {
                write!(f, "header is missing the {key} key")
            }
            Self::BadCell { index, token } => {
                write!(f, "cell {index} is not a number: {token:?}")
            }
            Self::LossyCell { kind, index, value } => {
                write!(f, "cell {index} value {value} does not fit a {kind} grid")
            }
            Self::CellCount { expected, got } => {
                write!(f, "expected {expected} cells, found {got}")
            }
            Self::UnmappedNodata => {
                write!(
                    f,
                    "grid contains nodata cells but the header declares no NODATA_value"
                )
            }
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RasterError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
