//! Raster cell value kinds and their nodata sentinels.
//!
//! Layers come in three storage kinds: `Short` (i16) for direction codes
//! and counters, `Long` (i32) for stream and subarea id grids, and `Float`
//! (f32) for distances. Every layer carries an explicit nodata sentinel;
//! the constants here are the defaults used when a file header does not
//! negotiate one.

use std::error::Error;
use std::fmt;
use std::ops::Add;

/// Storage kind of a raster layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// 16-bit signed integer (direction codes, dependency counters).
    Short,
    /// 32-bit signed integer (stream grids, subarea ids).
    Long,
    /// 32-bit float (distances, elevations, slopes).
    Float,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
            Self::Float => write!(f, "float"),
        }
    }
}

/// A row of cell values with its kind carried at runtime.
///
/// Halo exchange multiplexes rows of different layers over one channel
/// per partition boundary; the kind tag lets the receiving side verify it
/// is unpacking the layer it expects. Construction is by `From` on the
/// element vector, extraction by [`CellValue::unwrap_row`].
#[derive(Clone, Debug, PartialEq)]
pub enum RowBuf {
    /// Row of i16 values.
    Short(Vec<i16>),
    /// Row of i32 values.
    Long(Vec<i32>),
    /// Row of f32 values.
    Float(Vec<f32>),
}

impl RowBuf {
    /// Storage kind of the contained row.
    pub fn kind(&self) -> CellKind {
        match self {
            Self::Short(_) => CellKind::Short,
            Self::Long(_) => CellKind::Long,
            Self::Float(_) => CellKind::Float,
        }
    }

    /// Number of values in the contained row.
    pub fn len(&self) -> usize {
        match self {
            Self::Short(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Float(v) => v.len(),
        }
    }

    /// Whether the contained row is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<i16>> for RowBuf {
    fn from(v: Vec<i16>) -> Self {
        Self::Short(v)
    }
}

impl From<Vec<i32>> for RowBuf {
    fn from(v: Vec<i32>) -> Self {
        Self::Long(v)
    }
}

impl From<Vec<f32>> for RowBuf {
    fn from(v: Vec<f32>) -> Self {
        Self::Float(v)
    }
}

/// A [`RowBuf`] held a different kind than the caller expected.
///
/// Raised when halo exchange unpacks a row, or when raster negotiation
/// is asked to reinterpret a grid as an incompatible kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindError {
    /// Kind the caller asked for.
    pub expected: CellKind,
    /// Kind actually present.
    pub got: CellKind,
}

impl fmt::Display for KindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} cells, got {}", self.expected, self.got)
    }
}

impl Error for KindError {}

/// A value that can live in a raster layer.
///
/// Implemented for exactly `i16`, `i32`, and `f32`. The trait carries the
/// kind tag, the default nodata sentinel, and the conversions the raster
/// reader and halo exchange need. Nodata comparison is by `==`; the float
/// sentinel is a finite value (most-negative f32), never NaN.
pub trait CellValue:
    Copy + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Add<Output = Self> + Send + 'static
{
    /// Storage kind of this value type.
    const KIND: CellKind;

    /// Default nodata sentinel for this kind.
    const NODATA: Self;

    /// Additive identity, used to reset border delta buffers.
    const ZERO: Self;

    /// Wrap a row of values for the wire.
    fn wrap_row(row: Vec<Self>) -> RowBuf;

    /// Unwrap a wire row, verifying the kind.
    fn unwrap_row(buf: RowBuf) -> Result<Vec<Self>, KindError>;

    /// Checked conversion from a parsed f64.
    ///
    /// Integer kinds reject fractional or out-of-range values; the float
    /// kind rejects values that are not finite.
    fn from_f64(v: f64) -> Option<Self>;

    /// Lossless widening to f64.
    fn to_f64(self) -> f64;
}

impl CellValue for i16 {
    const KIND: CellKind = CellKind::Short;
    const NODATA: Self = i16::MIN;
    const ZERO: Self = 0;

    fn wrap_row(row: Vec<Self>) -> RowBuf {
        RowBuf::Short(row)
    }

    fn unwrap_row(buf: RowBuf) -> Result<Vec<Self>, KindError> {
        match buf {
            RowBuf::Short(v) => Ok(v),
            other => Err(KindError {
                expected: CellKind::Short,
                got: other.kind(),
            }),
        }
    }

    fn from_f64(v: f64) -> Option<Self> {
        if v.fract() == 0.0 && v >= f64::from(i16::MIN) && v <= f64::from(i16::MAX) {
            Some(v as i16)
        } else {
            None
        }
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl CellValue for i32 {
    const KIND: CellKind = CellKind::Long;
    const NODATA: Self = i32::MIN;
    const ZERO: Self = 0;

    fn wrap_row(row: Vec<Self>) -> RowBuf {
        RowBuf::Long(row)
    }

    fn unwrap_row(buf: RowBuf) -> Result<Vec<Self>, KindError> {
        match buf {
            RowBuf::Long(v) => Ok(v),
            other => Err(KindError {
                expected: CellKind::Long,
                got: other.kind(),
            }),
        }
    }

    fn from_f64(v: f64) -> Option<Self> {
        if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
            Some(v as i32)
        } else {
            None
        }
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl CellValue for f32 {
    const KIND: CellKind = CellKind::Float;
    const NODATA: Self = -f32::MAX;
    const ZERO: Self = 0.0;

    fn wrap_row(row: Vec<Self>) -> RowBuf {
        RowBuf::Float(row)
    }

    fn unwrap_row(buf: RowBuf) -> Result<Vec<Self>, KindError> {
        match buf {
            RowBuf::Float(v) => Ok(v),
            other => Err(KindError {
                expected: CellKind::Float,
                got: other.kind(),
            }),
        }
    }

    fn from_f64(v: f64) -> Option<Self> {
        let narrowed = v as f32;
        if narrowed.is_finite() {
            Some(narrowed)
        } else {
            None
        }
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}
