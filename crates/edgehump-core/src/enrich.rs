use polars::prelude::*;

use crate::error::Result;
use crate::schema::{COL_CELL_ID, COL_FILE, COL_NO};
use crate::types::{Side, Split, INDEX_PITCH_UM};

/// Last three characters of the cell identifier, or the whole identifier
/// when it is shorter than that.
pub fn cell_suffix(cell_id: &str) -> String {
    let chars: Vec<char> = cell_id.chars().collect();
    let start = chars.len().saturating_sub(3);
    chars[start..].iter().collect()
}

/// Positional code embedded 13 characters before the end of the source
/// filename. Shorter names default to "1".
pub fn position_code(filename: &str) -> String {
    let chars: Vec<char> = filename.chars().collect();
    if chars.len() >= 13 {
        chars[chars.len() - 13].to_string()
    } else {
        "1".to_string()
    }
}

/// Derives the categorical attributes (cell, position, side, split) and the
/// physical x coordinate for every row of a normalized table.
pub fn enrich_metadata(df: &DataFrame) -> Result<DataFrame> {
    let len = df.height();
    let cell_ids = df.column(COL_CELL_ID)?.str()?;
    let files = df.column(COL_FILE)?.str()?;
    let nos = df.column(COL_NO)?.i64()?;

    let mut cells: Vec<Option<String>> = Vec::with_capacity(len);
    let mut positions: Vec<String> = Vec::with_capacity(len);
    let mut sides: Vec<&'static str> = Vec::with_capacity(len);
    let mut splits: Vec<&'static str> = Vec::with_capacity(len);
    let mut xs: Vec<Option<f64>> = Vec::with_capacity(len);

    for idx in 0..len {
        let cell = cell_ids.get(idx).map(cell_suffix);
        let position = files
            .get(idx)
            .map(position_code)
            .unwrap_or_else(|| "1".to_string());
        let side = Side::from_position(&position);
        let split = cell
            .as_deref()
            .map(Split::from_cell)
            .unwrap_or(Split::Unknown);

        sides.push(side.as_str());
        splits.push(split.as_str());
        positions.push(position);
        cells.push(cell);
        xs.push(nos.get(idx).map(|no| no as f64 * INDEX_PITCH_UM));
    }

    let cell_series = Series::new(
        "cell".into(),
        cells.iter().map(|c| c.as_deref()).collect::<Vec<Option<&str>>>(),
    );

    let mut output = df.clone();
    let mut columns = [
        cell_series.into(),
        Series::new("position".into(), positions).into(),
        Series::new("side".into(), sides).into(),
        Series::new("split".into(), splits).into(),
        Series::new("x".into(), xs).into(),
    ];
    output.hstack_mut(columns.as_mut_slice())?;

    Ok(output)
}
