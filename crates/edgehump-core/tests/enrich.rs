use edgehump_core::enrich::{cell_suffix, enrich_metadata, position_code};
use edgehump_core::types::{Side, Split, SP1_CELLS, SP2_CELLS, SP3_CELLS};
use polars::prelude::*;

fn file_for(position: &str) -> String {
    format!("scan_{position}_profile.csv")
}

fn normalized_frame(files: Vec<String>) -> DataFrame {
    let rows = files.len();
    let nos: Vec<i64> = (1..=rows as i64).collect();
    df![
        "no" => nos,
        "CELL ID" => vec!["PNL-A01"; rows],
        "Avg Offset" => vec![1.0f64; rows],
        "Glass ID" => vec!["G1"; rows],
        "file" => files,
    ]
    .expect("frame")
}

#[test]
fn side_is_a_deterministic_function_of_position() {
    let files = vec![
        file_for("1"),
        file_for("2"),
        file_for("3"),
        file_for("4"),
        file_for("9"),
    ];
    let enriched = enrich_metadata(&normalized_frame(files)).expect("enrich");

    let sides = enriched.column("side").expect("side").str().expect("str");
    let labels: Vec<&str> = sides.into_iter().flatten().collect();
    assert_eq!(labels, vec!["Left", "Right", "Top", "Down", "Unknown"]);
}

#[test]
fn short_filenames_default_to_position_one() {
    assert_eq!(position_code("a.csv"), "1");
    assert_eq!(position_code("scan_2_profile.csv"), "2");

    let enriched = enrich_metadata(&normalized_frame(vec!["a.csv".to_string()])).expect("enrich");
    let positions = enriched
        .column("position")
        .expect("position")
        .str()
        .expect("str");
    assert_eq!(positions.get(0), Some("1"));
}

#[test]
fn cell_is_the_three_character_suffix_of_the_identifier() {
    assert_eq!(cell_suffix("PNL-A01"), "A01");
    assert_eq!(cell_suffix("80103"), "103");
    assert_eq!(cell_suffix("B2"), "B2");

    let enriched = enrich_metadata(&normalized_frame(vec![file_for("1")])).expect("enrich");
    let cells = enriched.column("cell").expect("cell").str().expect("str");
    assert_eq!(cells.get(0), Some("A01"));
}

#[test]
fn x_uses_the_fixed_index_pitch() {
    let files = vec![file_for("1"), file_for("1")];
    let enriched = enrich_metadata(&normalized_frame(files)).expect("enrich");

    let xs = enriched.column("x").expect("x").f64().expect("f64");
    assert!((xs.get(0).expect("row 0") - 10.96).abs() < 1e-9);
    assert!((xs.get(1).expect("row 1") - 21.92).abs() < 1e-9);
}

#[test]
fn split_membership_tables_are_disjoint() {
    for cell in SP1_CELLS {
        assert!(!SP2_CELLS.contains(cell), "{cell} in Sp1 and Sp2");
        assert!(!SP3_CELLS.contains(cell), "{cell} in Sp1 and Sp3");
    }
    for cell in SP2_CELLS {
        assert!(!SP3_CELLS.contains(cell), "{cell} in Sp2 and Sp3");
    }
}

#[test]
fn split_is_a_deterministic_function_of_cell() {
    assert_eq!(Split::from_cell("A01"), Split::Sp1);
    assert_eq!(Split::from_cell("C08"), Split::Sp2);
    assert_eq!(Split::from_cell("D03"), Split::Sp3);
    assert_eq!(Split::from_cell("Z99"), Split::Unknown);
}

#[test]
fn position_thirteen_from_the_end_is_extracted() {
    // Ends in "1_A.csv" with the positional code 13 characters from the end.
    assert_eq!(position_code("EDGE_G1_A01_1_A.csv"), "1");
    assert_eq!(Side::from_position("1"), Side::Left);
}
