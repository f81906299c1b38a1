//! The distance-pass contract and the flow-graph views it is written
//! against.
//!
//! A pass parameterizes the traversal engine: which cells participate,
//! which start eligible, what distance a cell receives when it is
//! finalized, and which neighbors depend on it. The engine owns the
//! worklist, counters, and halo exchange; a pass only answers questions
//! about single cells through a [`PassContext`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod flow;
pub mod pass;
pub mod weights;

pub use context::PassContext;
pub use flow::FlowField;
pub use pass::{CellClass, DistancePass, Finalize, Resolved};
pub use weights::WeightTable;
