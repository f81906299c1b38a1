//! ASCII grid reading and writing.
//!
//! The format is a short textual header followed by row-major cell
//! values, top row first. Header keys are matched case-insensitively
//! and `NODATA_value` is optional. Cell tokens are parsed as f64 and
//! narrowed to the requested [`CellValue`] kind; a token that cannot be
//! stored without loss is an error rather than a silent truncation.
//!
//! Generic over `BufRead` and `Write` so tests can use in-memory
//! buffers and production code can use buffered files.

use std::io::{BufRead, Write};

use talweg_core::CellValue;

use crate::error::RasterError;
use crate::header::GridHeader;

/// Read a grid, negotiating cell values into kind `T`.
///
/// Cells equal to the header's `NODATA_value` become [`CellValue::NODATA`]
/// regardless of kind. Returns the parsed header alongside the cells so
/// callers can check extents against other layers.
pub fn read_grid<T, R>(reader: R) -> Result<(GridHeader, Vec<T>), RasterError>
where
    T: CellValue,
    R: BufRead,
{
    let mut lines = reader.lines();

    let mut ncols = None;
    let mut nrows = None;
    let mut xllcorner = None;
    let mut yllcorner = None;
    let mut cellsize = None;
    let mut nodata = None;

    // The header ends at the first line that starts with a number;
    // that line already holds cells and is carried into the body loop.
    let mut pending = None;
    for line in lines.by_ref() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
            pending = Some(line);
            break;
        }
        let mut parts = trimmed.split_whitespace();
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(RasterError::MalformedHeader {
                line: trimmed.to_string(),
            });
        };
        match key.to_ascii_lowercase().as_str() {
            "ncols" => ncols = Some(parse_header(value, "ncols")?),
            "nrows" => nrows = Some(parse_header(value, "nrows")?),
            "xllcorner" => xllcorner = Some(parse_header(value, "xllcorner")?),
            "yllcorner" => yllcorner = Some(parse_header(value, "yllcorner")?),
            "cellsize" => cellsize = Some(parse_header(value, "cellsize")?),
            "nodata_value" => nodata = Some(parse_header(value, "NODATA_value")?),
            _ => {
                return Err(RasterError::UnknownHeaderKey {
                    key: key.to_string(),
                })
            }
        }
    }

    let header = GridHeader {
        ncols: require(ncols, "ncols")?,
        nrows: require(nrows, "nrows")?,
        xllcorner: require(xllcorner, "xllcorner")?,
        yllcorner: require(yllcorner, "yllcorner")?,
        cellsize: require(cellsize, "cellsize")?,
        nodata,
    };

    let expected = header.cell_count();
    let mut cells: Vec<T> = Vec::with_capacity(expected);
    if let Some(line) = pending {
        for token in line.split_whitespace() {
            let index = cells.len();
            cells.push(parse_cell(token, index, header.nodata)?);
        }
    }
    for line in lines {
        let line = line?;
        for token in line.split_whitespace() {
            let index = cells.len();
            cells.push(parse_cell(token, index, header.nodata)?);
        }
    }
    if cells.len() != expected {
        return Err(RasterError::CellCount {
            expected,
            got: cells.len(),
        });
    }
    Ok((header, cells))
}

/// Write a grid with the given header.
///
/// Cells equal to [`CellValue::NODATA`] are written as the header's
/// `NODATA_value`; if the header declares none and such a cell exists,
/// the write fails before emitting the offending row.
pub fn write_grid<T, W>(mut writer: W, header: &GridHeader, cells: &[T]) -> Result<(), RasterError>
where
    T: CellValue,
    W: Write,
{
    let expected = header.cell_count();
    if cells.len() != expected {
        return Err(RasterError::CellCount {
            expected,
            got: cells.len(),
        });
    }
    writeln!(writer, "ncols {}", header.ncols)?;
    writeln!(writer, "nrows {}", header.nrows)?;
    writeln!(writer, "xllcorner {}", header.xllcorner)?;
    writeln!(writer, "yllcorner {}", header.yllcorner)?;
    writeln!(writer, "cellsize {}", header.cellsize)?;
    if let Some(nd) = header.nodata {
        writeln!(writer, "NODATA_value {nd}")?;
    }
    for r in 0..header.nrows as usize {
        let cols = header.ncols as usize;
        let row = &cells[r * cols..(r + 1) * cols];
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                writer.write_all(b" ")?;
            }
            if *cell == T::NODATA {
                match header.nodata {
                    Some(nd) => write!(writer, "{nd}")?,
                    None => return Err(RasterError::UnmappedNodata),
                }
            } else {
                write!(writer, "{cell}")?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn parse_header<F: std::str::FromStr>(value: &str, key: &'static str) -> Result<F, RasterError> {
    value.parse().map_err(|_| RasterError::BadHeaderValue {
        key,
        value: value.to_string(),
    })
}

fn require<F>(field: Option<F>, key: &'static str) -> Result<F, RasterError> {
    field.ok_or(RasterError::MissingHeader { key })
}

fn parse_cell<T: CellValue>(
    token: &str,
    index: usize,
    nodata: Option<f64>,
) -> Result<T, RasterError> {
    let value: f64 = token.parse().map_err(|_| RasterError::BadCell {
        index,
        token: token.to_string(),
    })?;
    if nodata == Some(value) {
        return Ok(T::NODATA);
    }
    T::from_f64(value).ok_or(RasterError::LossyCell {
        kind: T::KIND,
        index,
        value,
    })
}
