//! Error types for watershed statistics.

use std::fmt;

/// Errors raised while aggregating statistics or classifying subareas.
#[derive(Debug)]
pub enum StatsError {
    /// A layer holds a different number of cells than the watershed mask.
    LayerLen {
        /// Name of the offending layer.
        layer: &'static str,
        /// Cells in the watershed mask.
        expected: usize,
        /// Cells in the layer.
        got: usize,
    },
    /// Cell spacing must be positive in both axes.
    BadSpacing {
        /// East-west cell extent.
        dx: f64,
        /// North-south cell extent.
        dy: f64,
    },
    /// The index map does not cover a subarea present in the raster.
    MissingSubarea {
        /// The uncovered subarea id.
        id: i32,
    },
    /// An index-map key is not a subarea id.
    BadSubareaKey {
        /// The unparsable key.
        key: String,
    },
    /// An index value is not a number.
    BadIndexValue {
        /// Subarea the value belongs to.
        id: i32,
        /// The unparsable text.
        value: String,
    },
    /// The index map failed to parse as JSON.
    Json(serde_json::Error),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerLen {
                layer,
                expected,
                got,
            } => {
                write!(f, "{layer} layer holds {got} cells, watershed has {expected}")
            }
            Self::BadSpacing { dx, dy } => {
                write!(f, "cell spacing must be positive, got {dx} x {dy}")
            }
            Self::MissingSubarea { id } => {
                write!(f, "index map has no entry for subarea {id}")
            }
            Self::BadSubareaKey { key } => {
                write!(f, "index map key {key:?} is not a subarea id")
            }
            Self::BadIndexValue { id, value } => {
                write!(f, "index value {value:?} for subarea {id} is not a number")
            }
            Self::Json(e) => write!(f, "index map is not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
