use std::collections::HashMap;

use polars::prelude::*;

use crate::error::Result;
use crate::schema::{COL_AVG_OFFSET, COL_GLASS_ID};
use crate::types::{HumpRow, LongRecord, Side, Split, INDEX_PITCH_UM};

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round0(value: f64) -> f64 {
    value.round()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    glass: String,
    cell: String,
    side: Side,
}

struct ProfilePeak {
    max_y: f64,
    no_at_max: i64,
}

/// Peak height and location per (glass, cell, side) group of corrected
/// edge-profile records. The strictly-greater update keeps the first
/// occurrence when the maximum is tied.
pub fn profile_humps(records: &[LongRecord]) -> Vec<HumpRow> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, ProfilePeak> = HashMap::new();

    for record in records {
        let key = GroupKey {
            glass: record.glass.clone(),
            cell: record.cell.clone(),
            side: record.side,
        };
        match groups.get_mut(&key) {
            Some(peak) => {
                if record.y > peak.max_y {
                    peak.max_y = record.y;
                    peak.no_at_max = record.no;
                }
            }
            None => {
                order.push(key.clone());
                groups.insert(
                    key,
                    ProfilePeak {
                        max_y: record.y,
                        no_at_max: record.no,
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .map(|key| {
            let peak = &groups[&key];
            HumpRow {
                split: Split::from_cell(&key.cell),
                hump_dy: round1(peak.max_y),
                hump_dx: round0(INDEX_PITCH_UM * peak.no_at_max as f64),
                glass: key.glass,
                cell: key.cell,
                side: key.side,
            }
        })
        .collect()
}

struct AmplitudePeak {
    max_y: f64,
    min_y: f64,
    x_at_max: Option<f64>,
}

/// Peak-to-valley amplitude per (glass, cell, side) group of bottom-edge
/// rows, located at the physical x of the maximum. Rows with a missing
/// offset are skipped; a group with none left produces no result.
pub fn amplitude_humps(df: &DataFrame) -> Result<Vec<HumpRow>> {
    let len = df.height();
    let glasses = df.column(COL_GLASS_ID)?.str()?;
    let cells = df.column("cell")?.str()?;
    let positions = df.column("position")?.str()?;
    let offsets = df.column(COL_AVG_OFFSET)?.f64()?;
    let xs = df.column("x")?.f64()?;

    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, AmplitudePeak> = HashMap::new();

    for idx in 0..len {
        let (Some(glass), Some(cell), Some(position), Some(y)) = (
            glasses.get(idx),
            cells.get(idx),
            positions.get(idx),
            offsets.get(idx),
        ) else {
            continue;
        };

        let key = GroupKey {
            glass: glass.to_string(),
            cell: cell.to_string(),
            side: Side::from_position(position),
        };
        match groups.get_mut(&key) {
            Some(peak) => {
                if y > peak.max_y {
                    peak.max_y = y;
                    peak.x_at_max = xs.get(idx);
                }
                if y < peak.min_y {
                    peak.min_y = y;
                }
            }
            None => {
                order.push(key.clone());
                groups.insert(
                    key,
                    AmplitudePeak {
                        max_y: y,
                        min_y: y,
                        x_at_max: xs.get(idx),
                    },
                );
            }
        }
    }

    Ok(order
        .into_iter()
        .map(|key| {
            let peak = &groups[&key];
            HumpRow {
                split: Split::from_cell(&key.cell),
                hump_dy: round1(peak.max_y - peak.min_y),
                hump_dx: round0(peak.x_at_max.unwrap_or(0.0)),
                glass: key.glass,
                cell: key.cell,
                side: key.side,
            }
        })
        .collect())
}
