use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::enrich::enrich_metadata;
use crate::error::{AnalysisError, Result};
use crate::hump::{amplitude_humps, profile_humps};
use crate::reshape::reshape_edge_profiles;
use crate::types::HumpRow;

/// Observability record for one analysis run: row counts per path, the
/// baseline reference that was used, and any stage faults that were
/// contained.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub edge_rows: usize,
    pub down_rows: usize,
    pub pivot_rows: usize,
    pub reference_no: Option<i64>,
    pub reference_fallback: bool,
    pub profile_results: usize,
    pub amplitude_results: usize,
    pub stage_errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub results: Vec<HumpRow>,
    pub result_table: DataFrame,
    /// The enriched per-row dataset, handed onward for plotting/export.
    pub processed: DataFrame,
    pub report: AnalysisReport,
}

/// Runs the full reshape-and-aggregate pipeline over a normalized table.
///
/// The two aggregation paths are isolated: a fault in one is logged and
/// recorded so the other can still contribute results. The run only fails
/// outright when both paths fault, or when neither yields a single row.
pub fn run_analysis(normalized: &DataFrame) -> Result<Analysis> {
    let processed = enrich_metadata(normalized)?;
    let mut report = AnalysisReport::default();

    let profile_rows = match edge_profile_stage(&processed, &mut report) {
        Ok(rows) => rows,
        Err(err) => {
            warn!("edge-profile stage failed: {err}");
            report.stage_errors.push(format!("edge profile: {err}"));
            Vec::new()
        }
    };

    let amplitude_rows = match bottom_edge_stage(&processed, &mut report) {
        Ok(rows) => rows,
        Err(err) => {
            warn!("bottom-edge stage failed: {err}");
            report.stage_errors.push(format!("bottom edge: {err}"));
            Vec::new()
        }
    };

    if report.stage_errors.len() == 2 {
        return Err(AnalysisError::Processing(report.stage_errors.join("; ")));
    }

    report.profile_results = profile_rows.len();
    report.amplitude_results = amplitude_rows.len();

    let mut results = profile_rows;
    results.extend(amplitude_rows);
    if results.is_empty() {
        return Err(AnalysisError::NoResults);
    }

    results.sort_by(|a, b| {
        (a.glass.as_str(), a.cell.as_str(), a.side.as_str())
            .cmp(&(b.glass.as_str(), b.cell.as_str(), b.side.as_str()))
    });

    let result_table = results_dataframe(&results)?;
    info!("analysis produced {} hump results", results.len());

    Ok(Analysis {
        results,
        result_table,
        processed,
        report,
    })
}

fn edge_profile_stage(processed: &DataFrame, report: &mut AnalysisReport) -> Result<Vec<HumpRow>> {
    let edge = processed
        .clone()
        .lazy()
        .filter(col("position").neq(lit("4")))
        .collect()?;
    report.edge_rows = edge.height();
    if edge.height() == 0 {
        info!("no edge-position rows; profile path yields no results");
        return Ok(Vec::new());
    }

    let outcome = reshape_edge_profiles(&edge)?;
    report.pivot_rows = outcome.distinct_rows;
    report.reference_no = outcome.reference_no;
    report.reference_fallback = outcome.reference_fallback;
    Ok(profile_humps(&outcome.records))
}

fn bottom_edge_stage(processed: &DataFrame, report: &mut AnalysisReport) -> Result<Vec<HumpRow>> {
    let down = processed
        .clone()
        .lazy()
        .filter(col("position").eq(lit("4")))
        .collect()?;
    report.down_rows = down.height();
    if down.height() == 0 {
        info!("no bottom-edge rows; amplitude path yields no results");
        return Ok(Vec::new());
    }
    amplitude_humps(&down)
}

fn results_dataframe(rows: &[HumpRow]) -> Result<DataFrame> {
    DataFrame::new(vec![
        Series::new(
            "glass".into(),
            rows.iter().map(|r| r.glass.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "cell".into(),
            rows.iter().map(|r| r.cell.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "side".into(),
            rows.iter().map(|r| r.side.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "hump_dy".into(),
            rows.iter().map(|r| r.hump_dy).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "hump_dx".into(),
            rows.iter().map(|r| r.hump_dx).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "split".into(),
            rows.iter().map(|r| r.split.as_str()).collect::<Vec<_>>(),
        )
        .into(),
    ])
    .map_err(AnalysisError::from)
}
