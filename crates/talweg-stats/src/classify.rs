//! Subarea index classification.
//!
//! A JSON index map assigns each subarea a combined index value between
//! 0 and 1. [`class_of`] bins that value into display classes 1 to 10
//! (class 0 for values off the scale, which downstream map renderers
//! treat as unset), and [`classify_subareas`] paints the class over
//! every cell of a subarea raster.

use std::io::Read;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use talweg_core::CellValue;

use crate::error::StatsError;

/// Combined index values per subarea id.
pub type IndexTable = IndexMap<i32, f32>;

#[derive(Deserialize)]
struct IndexEntry {
    comb: CombValue,
}

/// Index producers vary: some write `"comb": "0.35"`, some `"comb": 0.35`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CombValue {
    Number(f64),
    Text(String),
}

/// Parse a JSON index map of the form `{"<subarea>": {"comb": value}}`.
pub fn read_index_table<R: Read>(reader: R) -> Result<IndexTable, StatsError> {
    let raw: IndexMap<String, IndexEntry> = serde_json::from_reader(reader)?;
    let mut table = IndexTable::with_capacity(raw.len());
    for (key, entry) in raw {
        let id: i32 = key
            .trim()
            .parse()
            .map_err(|_| StatsError::BadSubareaKey { key: key.clone() })?;
        let comb = match entry.comb {
            CombValue::Number(v) => v as f32,
            CombValue::Text(text) => {
                text.trim()
                    .parse()
                    .map_err(|_| StatsError::BadIndexValue { id, value: text })?
            }
        };
        table.insert(id, comb);
    }
    debug!("index table covers {} subareas", table.len());
    Ok(table)
}

/// Bin a combined index value into a display class.
///
/// Values at or below 0.1 are class 1, then each 0.1-wide bin raises the
/// class by one up to (0.8, 0.9] as class 9. The top bin is stretched to
/// (0.9, 1.9] as class 10 to absorb rounding above 1.0. Anything else
/// is class 0.
pub fn class_of(value: f32) -> i16 {
    if value <= 0.1 {
        1
    } else if value <= 0.2 {
        2
    } else if value <= 0.3 {
        3
    } else if value <= 0.4 {
        4
    } else if value <= 0.5 {
        5
    } else if value <= 0.6 {
        6
    } else if value <= 0.7 {
        7
    } else if value <= 0.8 {
        8
    } else if value <= 0.9 {
        9
    } else if value <= 1.9 {
        10
    } else {
        0
    }
}

/// Paint index classes over a subarea raster.
///
/// Nodata cells stay nodata. Every valid cell's subarea id must be
/// covered by the table; an uncovered id fails the whole run so a stale
/// index map cannot produce a silently patchy output.
pub fn classify_subareas(subareas: &[i32], table: &IndexTable) -> Result<Vec<i16>, StatsError> {
    let mut classes = vec![i16::NODATA; subareas.len()];
    for (slot, &id) in classes.iter_mut().zip(subareas) {
        if id == i32::NODATA {
            continue;
        }
        let comb = table
            .get(&id)
            .copied()
            .ok_or(StatsError::MissingSubarea { id })?;
        *slot = class_of(comb);
    }
    Ok(classes)
}
