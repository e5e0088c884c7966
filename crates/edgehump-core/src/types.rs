use std::fmt;

use serde::{Deserialize, Serialize};

/// Micrometers of physical distance per ordinal index step.
pub const INDEX_PITCH_UM: f64 = 10.96;

/// 0-based index of the baseline reference row in the pivoted profile table.
/// Shorter pivots fall back to their last row.
pub const REFERENCE_ROW: usize = 455;

pub const SP1_CELLS: &[&str] = &["A01", "B02", "C04", "D05", "A06", "B07", "C09", "D10"];
pub const SP2_CELLS: &[&str] = &["A03", "C03", "A08", "C08"];
pub const SP3_CELLS: &[&str] = &["B03", "D03", "B08", "D08"];

/// Physical edge of a panel, derived from the positional code embedded in
/// the source filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Down,
    Unknown,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
            Side::Top => "Top",
            Side::Down => "Down",
            Side::Unknown => "Unknown",
        }
    }

    pub fn from_position(position: &str) -> Self {
        match position {
            "1" => Side::Left,
            "2" => Side::Right,
            "3" => Side::Top,
            "4" => Side::Down,
            _ => Side::Unknown,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-group label of a panel, derived from cell membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Split {
    Sp1,
    Sp2,
    Sp3,
    Unknown,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Sp1 => "Sp1",
            Split::Sp2 => "Sp2",
            Split::Sp3 => "Sp3",
            Split::Unknown => "Unknown",
        }
    }

    pub fn from_cell(cell: &str) -> Self {
        if SP1_CELLS.contains(&cell) {
            Split::Sp1
        } else if SP2_CELLS.contains(&cell) {
            Split::Sp2
        } else if SP3_CELLS.contains(&cell) {
            Split::Sp3
        } else {
            Split::Unknown
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One baseline-corrected observation produced by the edge-profile reshape.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub no: i64,
    pub glass: String,
    pub cell: String,
    pub position: String,
    pub side: Side,
    pub y: f64,
}

/// One hump measurement per (glass, cell, side) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumpRow {
    pub glass: String,
    pub cell: String,
    pub side: Side,
    pub hump_dy: f64,
    pub hump_dx: f64,
    pub split: Split,
}
