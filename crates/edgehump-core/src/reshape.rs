use std::collections::HashMap;

use polars::prelude::*;
use tracing::{info, warn};

use crate::error::Result;
use crate::schema::{COL_AVG_OFFSET, COL_GLASS_ID, COL_NO};
use crate::types::{LongRecord, Side, REFERENCE_ROW};

/// Composite pivot key; one profile column per distinct combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProfileKey {
    glass: String,
    cell: String,
    position: String,
}

#[derive(Debug, Default)]
pub struct ReshapeOutcome {
    pub records: Vec<LongRecord>,
    /// Number of distinct ordinal values spanning the pivot row axis.
    pub distinct_rows: usize,
    pub reference_no: Option<i64>,
    /// True when the pivot held fewer rows than the nominal reference and
    /// the baseline fell back to the last row.
    pub reference_fallback: bool,
}

/// Pivots edge-position rows into per-(glass, cell, position) profiles,
/// subtracts each profile's reference-row baseline and unpivots the
/// corrected values into long records.
///
/// Duplicate (no, glass, cell, position) combinations keep the first
/// non-null offset in row order. Missing combinations yield no record.
pub fn reshape_edge_profiles(df: &DataFrame) -> Result<ReshapeOutcome> {
    let len = df.height();
    let nos = df.column(COL_NO)?.i64()?;
    let glasses = df.column(COL_GLASS_ID)?.str()?;
    let cells = df.column("cell")?.str()?;
    let positions = df.column("position")?.str()?;
    let offsets = df.column(COL_AVG_OFFSET)?.f64()?;

    // The pivot row axis: distinct ordinal values, ascending.
    let mut distinct: Vec<i64> = nos.into_iter().flatten().collect();
    distinct.sort_unstable();
    distinct.dedup();

    if distinct.is_empty() {
        warn!("edge-position pivot is empty; skipping baseline correction");
        return Ok(ReshapeOutcome::default());
    }

    let row_of: HashMap<i64, usize> = distinct
        .iter()
        .copied()
        .enumerate()
        .map(|(row, no)| (no, row))
        .collect();

    let mut order: Vec<ProfileKey> = Vec::new();
    let mut profiles: HashMap<ProfileKey, Vec<Option<f64>>> = HashMap::new();

    for idx in 0..len {
        let (Some(no), Some(glass), Some(cell), Some(position)) = (
            nos.get(idx),
            glasses.get(idx),
            cells.get(idx),
            positions.get(idx),
        ) else {
            continue;
        };

        let key = ProfileKey {
            glass: glass.to_string(),
            cell: cell.to_string(),
            position: position.to_string(),
        };
        if !profiles.contains_key(&key) {
            order.push(key.clone());
        }
        let slots = profiles
            .entry(key)
            .or_insert_with(|| vec![None; distinct.len()]);
        let row = row_of[&no];
        if slots[row].is_none() {
            slots[row] = offsets.get(idx);
        }
    }

    let reference_row = REFERENCE_ROW.min(distinct.len() - 1);
    let reference_fallback = reference_row < REFERENCE_ROW;
    let reference_no = distinct[reference_row];
    if reference_fallback {
        info!(
            "pivot has {} rows; baseline reference fell back to the last row (no = {reference_no})",
            distinct.len()
        );
    }

    let mut records = Vec::new();
    for key in &order {
        let slots = &profiles[key];
        let Some(baseline) = slots[reference_row] else {
            // No baseline value for this profile; every corrected slot
            // would be undefined, so the profile contributes nothing.
            continue;
        };
        let side = Side::from_position(&key.position);
        for (row, slot) in slots.iter().enumerate() {
            if let Some(value) = slot {
                records.push(LongRecord {
                    no: distinct[row],
                    glass: key.glass.clone(),
                    cell: key.cell.clone(),
                    position: key.position.clone(),
                    side,
                    y: value - baseline,
                });
            }
        }
    }

    Ok(ReshapeOutcome {
        records,
        distinct_rows: distinct.len(),
        reference_no: Some(reference_no),
        reference_fallback,
    })
}
