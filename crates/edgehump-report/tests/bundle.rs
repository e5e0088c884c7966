use std::io::Cursor;

use edgehump_core::analysis::AnalysisReport;
use edgehump_core::schema::SchemaReport;
use edgehump_report::bundle::{archive_bytes, render_html};
use edgehump_report::plot::Chart;

fn sample_charts() -> Vec<Chart> {
    vec![
        Chart {
            title: "Edge offset overview".to_string(),
            svg: "<svg><circle/></svg>".to_string(),
        },
        Chart {
            title: "Hump height by side".to_string(),
            svg: "<svg><rect/></svg>".to_string(),
        },
    ]
}

#[test]
fn html_bundle_inlines_every_chart() {
    let html = render_html(&sample_charts());

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h2>Edge offset overview</h2>"));
    assert!(html.contains("<h2>Hump height by side</h2>"));
    assert_eq!(html.matches("<svg>").count(), 2);
    // Self-contained: no external script or stylesheet references.
    assert!(!html.contains("<script src"));
}

#[test]
fn archive_contains_result_table_plots_and_metadata() {
    let csv = b"glass,cell\n";
    let html = render_html(&sample_charts());
    let bytes = archive_bytes(
        csv,
        Some(&html),
        &SchemaReport::default(),
        &AnalysisReport::default(),
    )
    .expect("archive");

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
    let names: Vec<String> = (0..archive.len())
        .map(|idx| archive.by_index(idx).expect("entry").name().to_string())
        .collect();

    assert!(names.contains(&"analysis_result.csv".to_string()));
    assert!(names.contains(&"analysis_plots.html".to_string()));
    assert!(names.contains(&"metadata.json".to_string()));
}

#[test]
fn archive_without_plots_skips_the_html_entry() {
    let bytes = archive_bytes(
        b"glass,cell\n",
        None,
        &SchemaReport::default(),
        &AnalysisReport::default(),
    )
    .expect("archive");

    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
    assert_eq!(archive.len(), 2);
}
