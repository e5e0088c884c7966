use std::io::{Cursor, Write};

use chrono::Utc;
use edgehump_core::analysis::AnalysisReport;
use edgehump_core::schema::SchemaReport;
use serde_json::json;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::plot::{side_color_hex, Chart};

const LEGEND_SIDES: [&str; 4] = ["Left", "Right", "Top", "Down"];

/// Renders the charts into one self-contained HTML document with the SVGs
/// inlined, so the bundle opens without network access.
pub fn render_html(charts: &[Chart]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Edge hump analysis</title>\n<style>\n");
    html.push_str("body { font-family: sans-serif; margin: 24px; }\n");
    html.push_str(".chart { margin-bottom: 32px; }\n");
    html.push_str(".legend span { margin-right: 16px; }\n");
    html.push_str("</style>\n</head>\n<body>\n<h1>Edge hump analysis</h1>\n");

    html.push_str("<p class=\"legend\">");
    for side in LEGEND_SIDES {
        html.push_str(&format!(
            "<span style=\"color: {}\">&#9632; {side}</span>",
            side_color_hex(side)
        ));
    }
    html.push_str("</p>\n");

    for chart in charts {
        html.push_str(&format!("<h2>{}</h2>\n<div class=\"chart\">\n", chart.title));
        html.push_str(&chart.svg);
        html.push_str("\n</div>\n");
    }

    html.push_str(&format!(
        "<p>Generated {}</p>\n</body>\n</html>\n",
        Utc::now().to_rfc3339()
    ));
    html
}

/// Packages the result table, the chart bundle and a run-metadata summary
/// into a single deflate-compressed archive.
pub fn archive_bytes(
    result_csv: &[u8],
    plots_html: Option<&str>,
    schema: &SchemaReport,
    analysis: &AnalysisReport,
) -> Result<Vec<u8>> {
    let metadata = json!({
        "generated_at": Utc::now().to_rfc3339(),
        "schema": schema,
        "analysis": analysis,
    });
    let metadata_bytes = serde_json::to_vec_pretty(&metadata)?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("analysis_result.csv", options)?;
        zip.write_all(result_csv)?;

        if let Some(html) = plots_html {
            zip.start_file("analysis_plots.html", options)?;
            zip.write_all(html.as_bytes())?;
        }

        zip.start_file("metadata.json", options)?;
        zip.write_all(&metadata_bytes)?;

        zip.finish()?;
    }
    Ok(buffer)
}
