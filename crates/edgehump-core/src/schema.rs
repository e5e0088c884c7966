use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AnalysisError, Result};

pub const COL_NO: &str = "no";
pub const COL_CELL_ID: &str = "CELL ID";
pub const COL_AVG_OFFSET: &str = "Avg Offset";
pub const COL_GLASS_ID: &str = "Glass ID";
pub const COL_FILE: &str = "file";

/// Ordinal-column fallbacks, checked in priority order.
const NO_ALIASES: &[&str] = &["No", "NO", "index", "Index"];

const REQUIRED_ALIASES: &[(&str, &[&str])] = &[
    (COL_CELL_ID, &["Cell ID", "cell_id", "cellid", "Cell_ID", "CellID"]),
    (COL_AVG_OFFSET, &["avg_offset", "AvgOffset", "Average Offset", "Offset"]),
    (COL_GLASS_ID, &["Glass_ID", "glass_id", "glassid", "GlassID", "glass"]),
];

#[derive(Debug, Clone, Serialize)]
pub struct ColumnMapping {
    pub canonical: String,
    pub alias: String,
}

/// What the normalizer had to do to reach the canonical schema.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaReport {
    pub mappings: Vec<ColumnMapping>,
    pub synthesized_no: bool,
}

/// Resolves heterogeneous input column names onto the canonical schema and
/// casts the canonical columns to their expected dtypes. Alias columns are
/// copied, not renamed, so the originals stay available downstream.
pub fn normalize_schema(input: &DataFrame) -> Result<(DataFrame, SchemaReport)> {
    let mut df = input.clone();
    let mut report = SchemaReport::default();

    if !has_column(&df, COL_NO) {
        match NO_ALIASES.iter().find(|alias| has_column(&df, alias)) {
            Some(alias) => {
                copy_as(&mut df, alias, COL_NO)?;
                info!("mapped ordinal column '{alias}' to '{COL_NO}'");
                report.mappings.push(ColumnMapping {
                    canonical: COL_NO.to_string(),
                    alias: (*alias).to_string(),
                });
            }
            None => {
                let synthesized: Vec<i64> = (1..=df.height() as i64).collect();
                df.with_column(Series::new(COL_NO.into(), synthesized))?;
                warn!("no ordinal column found; synthesized 1-based row positions");
                report.synthesized_no = true;
            }
        }
    }

    let mut missing: Vec<String> = Vec::new();
    for (canonical, aliases) in REQUIRED_ALIASES {
        if has_column(&df, canonical) {
            continue;
        }
        match aliases.iter().find(|alias| has_column(&df, alias)) {
            Some(alias) => {
                copy_as(&mut df, alias, canonical)?;
                info!("mapped column '{alias}' to '{canonical}'");
                report.mappings.push(ColumnMapping {
                    canonical: (*canonical).to_string(),
                    alias: (*alias).to_string(),
                });
            }
            None => missing.push((*canonical).to_string()),
        }
    }

    if !has_column(&df, COL_FILE) {
        missing.push(COL_FILE.to_string());
    }

    if !missing.is_empty() {
        let available = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        return Err(AnalysisError::Schema { missing, available });
    }

    cast_canonical(&mut df)?;
    Ok((df, report))
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

fn copy_as(df: &mut DataFrame, source: &str, target: &str) -> Result<()> {
    let mut copy = df.column(source)?.clone();
    copy.rename(target.into());
    df.with_column(copy)?;
    Ok(())
}

fn cast_canonical(df: &mut DataFrame) -> Result<()> {
    for (name, dtype) in [
        (COL_NO, DataType::Int64),
        (COL_AVG_OFFSET, DataType::Float64),
        (COL_CELL_ID, DataType::String),
        (COL_GLASS_ID, DataType::String),
        (COL_FILE, DataType::String),
    ] {
        let cast = df.column(name)?.cast(&dtype)?;
        df.with_column(cast)?;
    }
    Ok(())
}
