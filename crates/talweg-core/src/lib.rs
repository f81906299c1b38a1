//! Core types for the Talweg flow-path distance toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: raster cell
//! value kinds with their nodata sentinels, the D8 flow direction codes,
//! and the worker rank identifier.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod direction;
pub mod id;

pub use cell::{CellKind, CellValue, KindError, RowBuf};
pub use direction::Direction;
pub use id::Rank;
