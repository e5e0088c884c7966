use edgehump_core::analysis::run_analysis;
use edgehump_core::error::AnalysisError;
use edgehump_core::schema::normalize_schema;
use edgehump_core::types::{Side, Split};
use polars::prelude::*;

fn file_for(position: &str) -> String {
    format!("scan_{position}_profile.csv")
}

/// Two files for the same panel: an edge scan (position 1) and a bottom
/// scan (position 4), with aliased column names throughout.
fn raw_frame() -> DataFrame {
    let nos: Vec<i64> = vec![1, 2, 3, 4, 5, 1, 2, 3];
    let offsets: Vec<f64> = vec![0.0, 1.0, 5.0, 3.0, 0.0, 2.0, 7.0, 4.0];
    let files: Vec<String> = std::iter::repeat(file_for("1"))
        .take(5)
        .chain(std::iter::repeat(file_for("4")).take(3))
        .collect();

    df![
        "No" => nos,
        "Cell ID" => vec!["PNL-A01"; 8],
        "Average Offset" => offsets,
        "Glass_ID" => vec!["G1"; 8],
        "file" => files,
    ]
    .expect("frame")
}

#[test]
fn both_paths_contribute_one_row_per_group() {
    let (normalized, _) = normalize_schema(&raw_frame()).expect("normalize");
    let analysis = run_analysis(&normalized).expect("analysis");

    assert_eq!(analysis.results.len(), 2);
    assert_eq!(analysis.report.profile_results, 1);
    assert_eq!(analysis.report.amplitude_results, 1);
    assert!(analysis.report.stage_errors.is_empty());

    // Sorted by (glass, cell, side): Down sorts before Left.
    let down = &analysis.results[0];
    assert_eq!(down.side, Side::Down);
    assert_eq!(down.hump_dy, 5.0);
    assert_eq!(down.hump_dx, 22.0);
    assert_eq!(down.split, Split::Sp1);

    let left = &analysis.results[1];
    assert_eq!(left.side, Side::Left);
    assert_eq!(left.hump_dy, 5.0);
    assert_eq!(left.hump_dx, 33.0);
}

#[test]
fn result_table_matches_the_typed_rows() {
    let (normalized, _) = normalize_schema(&raw_frame()).expect("normalize");
    let analysis = run_analysis(&normalized).expect("analysis");

    assert_eq!(analysis.result_table.height(), analysis.results.len());
    assert_eq!(
        analysis.result_table.get_column_names(),
        vec!["glass", "cell", "side", "hump_dy", "hump_dx", "split"]
    );

    let sides = analysis
        .result_table
        .column("side")
        .expect("side")
        .str()
        .expect("str");
    assert_eq!(sides.get(0), Some("Down"));
    assert_eq!(sides.get(1), Some("Left"));
}

#[test]
fn processed_dataset_carries_the_derived_columns() {
    let (normalized, _) = normalize_schema(&raw_frame()).expect("normalize");
    let analysis = run_analysis(&normalized).expect("analysis");

    for name in ["cell", "position", "side", "split", "x"] {
        assert!(
            analysis.processed.column(name).is_ok(),
            "missing derived column {name}"
        );
    }
    assert_eq!(analysis.processed.height(), 8);
}

#[test]
fn output_is_sorted_by_glass_cell_and_side() {
    let nos: Vec<i64> = vec![1, 1, 1, 1];
    let files = vec![file_for("2"), file_for("1"), file_for("1"), file_for("3")];
    let frame = df![
        "no" => nos,
        "CELL ID" => ["PNL-B02", "PNL-B02", "PNL-A01", "PNL-A01"],
        "Avg Offset" => [1.0f64, 2.0, 3.0, 4.0],
        "Glass ID" => ["G2", "G1", "G2", "G1"],
        "file" => files,
    ]
    .expect("frame");

    let (normalized, _) = normalize_schema(&frame).expect("normalize");
    let analysis = run_analysis(&normalized).expect("analysis");

    let keys: Vec<(String, String, String)> = analysis
        .results
        .iter()
        .map(|r| {
            (
                r.glass.clone(),
                r.cell.clone(),
                r.side.as_str().to_string(),
            )
        })
        .collect();

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    // Every input group shows up exactly once.
    assert_eq!(keys.len(), 4);
    let mut deduped = keys.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), keys.len());
}

#[test]
fn empty_union_is_a_hard_failure() {
    let frame = df![
        "no" => Vec::<i64>::new(),
        "CELL ID" => Vec::<String>::new(),
        "Avg Offset" => Vec::<f64>::new(),
        "Glass ID" => Vec::<String>::new(),
        "file" => Vec::<String>::new(),
    ]
    .expect("frame");

    let err = run_analysis(&frame).expect_err("no results expected");
    assert!(matches!(err, AnalysisError::NoResults));
}

#[test]
fn a_single_path_is_enough() {
    let frame = df![
        "no" => [1i64, 2, 3],
        "CELL ID" => vec!["PNL-A03"; 3],
        "Avg Offset" => [2.0f64, 7.0, 4.0],
        "Glass ID" => vec!["G1"; 3],
        "file" => vec![file_for("4"); 3],
    ]
    .expect("frame");

    let (normalized, _) = normalize_schema(&frame).expect("normalize");
    let analysis = run_analysis(&normalized).expect("analysis");

    assert_eq!(analysis.results.len(), 1);
    assert_eq!(analysis.report.profile_results, 0);
    assert_eq!(analysis.report.edge_rows, 0);
    assert_eq!(analysis.results[0].side, Side::Down);
    assert_eq!(analysis.results[0].split, Split::Sp2);
}
