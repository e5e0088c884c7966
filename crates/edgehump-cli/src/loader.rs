use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::info;

/// Reads every input CSV in caller-supplied order, stamps each with its
/// source filename and concatenates them into one table. The union is
/// diagonal so files with differing headers still combine; columns absent
/// from a file surface as nulls.
pub fn load_measurements(paths: &[PathBuf]) -> Result<DataFrame> {
    let mut frames: Vec<LazyFrame> = Vec::with_capacity(paths.len());

    for path in paths {
        let lf = load_single(path).with_context(|| format!("failed to load {}", path.display()))?;
        frames.push(lf);
    }

    let combined = concat_lf_diagonal(&frames, UnionArgs::default())
        .context("failed to combine input files")?
        .collect()
        .context("failed to materialize the combined table")?;

    Ok(combined)
}

fn load_single(path: &Path) -> Result<LazyFrame> {
    let content = fs::read(path)?;
    let cursor = Cursor::new(content);
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_ignore_errors(true)
        .into_reader_with_file_handle(cursor)
        .finish()?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    info!("loaded {} rows from {name}", df.height());
    Ok(df.lazy().with_column(lit(name).alias("file")))
}
