//! Cell spacing lookup.
//!
//! Distances are geometric, so every row needs its x and y cell spacing.
//! Projected grids have one spacing everywhere; geographic grids shrink
//! dx with latitude, hence the per-row variant.

use crate::error::GridError;

/// Per-row cell spacing of a global grid.
#[derive(Clone, Debug, PartialEq)]
pub enum Spacing {
    /// Every row has the same spacing.
    Uniform {
        /// Column spacing.
        dx: f64,
        /// Row spacing.
        dy: f64,
    },
    /// Row-dependent spacing, indexed by global row.
    PerRow {
        /// Column spacing per global row.
        dx: Vec<f64>,
        /// Row spacing per global row.
        dy: Vec<f64>,
    },
}

impl Spacing {
    /// Square cells of side `cell_size`.
    pub fn uniform(cell_size: f64) -> Result<Self, GridError> {
        Self::rectangular(cell_size, cell_size)
    }

    /// Rectangular cells, `dx` across and `dy` down.
    pub fn rectangular(dx: f64, dy: f64) -> Result<Self, GridError> {
        for v in [dx, dy] {
            if !(v.is_finite() && v > 0.0) {
                return Err(GridError::BadSpacing { value: v });
            }
        }
        Ok(Self::Uniform { dx, dy })
    }

    /// Row-dependent spacing tables, one entry per global row.
    pub fn per_row(dx: Vec<f64>, dy: Vec<f64>) -> Result<Self, GridError> {
        if dx.is_empty() {
            return Err(GridError::EmptyGrid);
        }
        if dx.len() != dy.len() {
            return Err(GridError::SpacingLength {
                expected: dx.len(),
                got: dy.len(),
            });
        }
        for &v in dx.iter().chain(dy.iter()) {
            if !(v.is_finite() && v > 0.0) {
                return Err(GridError::BadSpacing { value: v });
            }
        }
        Ok(Self::PerRow { dx, dy })
    }

    /// `(dx, dy)` for a global row. Rows outside a per-row table clamp to
    /// its ends.
    pub fn at(&self, global_row: i32) -> (f64, f64) {
        match self {
            Self::Uniform { dx, dy } => (*dx, *dy),
            Self::PerRow { dx, dy } => {
                let last = dx.len().saturating_sub(1);
                let idx = (global_row.max(0) as usize).min(last);
                (dx[idx], dy[idx])
            }
        }
    }
}
