//! Engine-level error type.

use std::error::Error;
use std::fmt;
use std::io;

use talweg_core::Rank;
use talweg_grid::{ExchangeError, GridError};

/// Errors from setting up or running a distance pass.
///
/// Everything here is fatal: validation failures are reported before a
/// single worker thread starts, and a worker failure mid-traversal
/// aborts the whole job. There is no partial-result recovery.
#[derive(Debug)]
pub enum EngineError {
    /// Partition geometry or band storage rejected the inputs.
    Grid(GridError),
    /// An input layer's length does not match the grid extent.
    LayerLength {
        /// Which layer.
        layer: &'static str,
        /// Cells expected from rows times columns.
        expected: usize,
        /// Cells provided.
        got: usize,
    },
    /// The pass declared a layer requirement the input did not satisfy.
    MissingLayer {
        /// Name of the pass.
        pass: String,
        /// Which layer is missing.
        layer: &'static str,
    },
    /// The operating system refused to start a worker thread.
    WorkerSpawn {
        /// Rank that failed to start.
        rank: Rank,
        /// Underlying error.
        source: io::Error,
    },
    /// A worker's halo exchange or termination ring failed.
    Exchange {
        /// Rank that reported the failure.
        rank: Rank,
        /// Underlying error.
        source: ExchangeError,
    },
    /// A worker thread panicked; its peers were abandoned.
    WorkerPanicked {
        /// Rank of the dead worker.
        rank: Rank,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(err) => write!(f, "grid setup failed: {err}"),
            Self::LayerLength {
                layer,
                expected,
                got,
            } => {
                write!(f, "{layer} layer holds {got} cells, extent needs {expected}")
            }
            Self::MissingLayer { pass, layer } => {
                write!(f, "pass {pass} requires the {layer} layer")
            }
            Self::WorkerSpawn { rank, source } => {
                write!(f, "could not spawn worker {rank}: {source}")
            }
            Self::Exchange { rank, source } => {
                write!(f, "worker {rank} exchange failed: {source}")
            }
            Self::WorkerPanicked { rank } => {
                write!(f, "worker {rank} panicked during the traversal")
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(err) => Some(err),
            Self::WorkerSpawn { source, .. } => Some(source),
            Self::Exchange { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GridError> for EngineError {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}
