//! The two concrete distance passes of the flow-path toolkit.
//!
//! [`OutletDistance`] walks the source network itself, accumulating
//! distance upstream from each subarea outlet. [`StreamDistance`]
//! walks everything else, accumulating each cell's distance down its
//! flow path to the nearest source cell. Chained together (the second
//! seeded from the first) they yield whole flow-path distances to the
//! subarea outlets.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod outlet_distance;
pub mod stream_distance;

pub use outlet_distance::OutletDistance;
pub use stream_distance::{SeedOrigin, StreamDistance};
