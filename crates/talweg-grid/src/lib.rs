//! Row-band partitioned raster storage with halo exchange.
//!
//! A global grid of `total_rows x cols` cells is split into horizontal
//! bands, one per worker. Each worker stores its own rows plus two extra
//! rows (one above, one below) that serve two roles: after
//! [`GridLinks::share`] they mirror the neighbors' edge-row values, and
//! between [`Band::clear_halos`] and [`GridLinks::add_borders`] they
//! accumulate counter deltas destined for (and then received from) the
//! neighbors.
//!
//! ```text
//!                 cols
//!        ┌──────────────────┐
//!        │      rank 0      │
//!        ├──────────────────┤ ─┐
//!        │      rank 1      │  │  each boundary: one duplex
//!        ├──────────────────┤ ─┤  channel pair (rows move
//!        │      rank 2      │  │  up and down)
//!        ├──────────────────┤ ─┘
//!        │      rank 3      │
//!        └──────────────────┘
//!          rank k: local rows [start_row, start_row + rows)
//!                  + halo row above (-1) + halo row below (rows)
//! ```
//!
//! Local row addressing is signed: row `-1` is the halo above, `rows` the
//! halo below. Coordinates outside that window read as nodata. The
//! termination ring connects all workers in rank order (wrapping), and
//! [`GridLinks::ring_term`] runs a two-trip AND-reduction over it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod band;
pub mod error;
pub mod link;
pub mod partition;
pub mod spacing;

pub use band::{Band, Edge};
pub use error::{ExchangeError, GridError};
pub use link::{wire_links, GridLinks};
pub use partition::{BandDecomposition, BandGeometry};
pub use spacing::Spacing;
