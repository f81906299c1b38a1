//! ESRI ASCII grid reader and writer.
//!
//! Every layer the engine consumes or produces travels as an ASCII grid:
//! a handful of `key value` header lines followed by row-major cells,
//! top row first. [`read_grid`] parses a stream into a [`GridHeader`]
//! plus a cell vector of the requested kind, mapping the file's
//! `NODATA_value` onto the kind's in-memory sentinel; [`write_grid`]
//! does the reverse. Layers of one run are expected to share an extent,
//! which callers check with [`GridHeader::matches`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod ascii;
pub mod error;
pub mod header;

pub use ascii::{read_grid, write_grid};
pub use error::RasterError;
pub use header::GridHeader;
