//! Distributed worklist engine computing flow-path distances.
//!
//! One pass runs as a fixed set of worker threads, each owning a
//! horizontal band of the grid. A worker alternates between draining
//! its local worklist and exchanging border state with its vertical
//! neighbors, until a token ring confirms that every worker is out of
//! work at the same time:
//!
//! ```text
//!             +------------+   queue empty    +-------------+
//!   seeds --> |  DRAINING  | ---------------> | EXCHANGING  |
//!             +------------+                  | deltas,     |
//!                   ^                         | halo rows,  |
//!                   |   border deltas         | ring term   |
//!                   +------------------------ +-------------+
//!                                                   | ring unanimous
//!                                                   v
//!                                               +--------+
//!                                               |  DONE  |
//!                                               +--------+
//! ```
//!
//! The traversal itself is topological: a cell is finalized only after
//! its downstream target, so distances accumulate upstream from the
//! seeds no matter how the rows are banded. What "seed", "finalize",
//! and "accumulate" mean is delegated to a
//! [`DistancePass`](talweg_pass::DistancePass) implementation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod error;

mod counters;
mod worker;
mod worklist;

pub use cluster::{run_pass, PassInput, PassOutput, RunStats};
pub use config::RunConfig;
pub use error::EngineError;
