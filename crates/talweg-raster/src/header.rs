//! Grid header carrying extents, georeferencing, and the nodata marker.

/// Tolerance used when comparing georeferencing floats across layers.
///
/// ASCII grids round-trip coordinates through decimal text, so two
/// headers describing the same grid can disagree in the last few
/// digits. Anything beyond a micrometre is a real mismatch.
const GEO_EPS: f64 = 1e-6;

/// Parsed header of an ASCII grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridHeader {
    /// Number of columns.
    pub ncols: u32,
    /// Number of rows.
    pub nrows: u32,
    /// X coordinate of the lower-left corner.
    pub xllcorner: f64,
    /// Y coordinate of the lower-left corner.
    pub yllcorner: f64,
    /// Edge length of a cell, in map units.
    pub cellsize: f64,
    /// Sentinel marking cells with no data, if the grid declares one.
    pub nodata: Option<f64>,
}

impl GridHeader {
    /// Number of cells the body must hold.
    pub fn cell_count(&self) -> usize {
        self.nrows as usize * self.ncols as usize
    }

    /// Whether `other` describes the same grid extent.
    ///
    /// Dimensions must match exactly and georeferencing within a small
    /// tolerance. The nodata sentinel is a per-layer choice and is not
    /// compared.
    pub fn matches(&self, other: &GridHeader) -> bool {
        self.ncols == other.ncols
            && self.nrows == other.nrows
            && (self.xllcorner - other.xllcorner).abs() <= GEO_EPS
            && (self.yllcorner - other.yllcorner).abs() <= GEO_EPS
            && (self.cellsize - other.cellsize).abs() <= GEO_EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> GridHeader {
        GridHeader {
            ncols: 4,
            nrows: 3,
            xllcorner: 451_230.5,
            yllcorner: 6_204_870.0,
            cellsize: 30.0,
            nodata: Some(-9999.0),
        }
    }

    #[test]
    fn identical_headers_match() {
        assert!(header().matches(&header()));
    }

    #[test]
    fn georeferencing_tolerates_text_roundoff() {
        let mut other = header();
        other.xllcorner += 5e-7;
        other.cellsize -= 5e-7;
        assert!(header().matches(&other));
    }

    #[test]
    fn dimension_differences_never_match() {
        let mut other = header();
        other.nrows += 1;
        assert!(!header().matches(&other));
    }

    #[test]
    fn shifted_origin_does_not_match() {
        let mut other = header();
        other.yllcorner += 0.5;
        assert!(!header().matches(&other));
    }

    #[test]
    fn nodata_choice_is_not_part_of_the_extent() {
        let mut other = header();
        other.nodata = None;
        assert!(header().matches(&other));
    }
}
