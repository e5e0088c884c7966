use std::collections::{BTreeMap, HashMap};

use edgehump_core::schema::{COL_AVG_OFFSET, COL_GLASS_ID};
use edgehump_core::types::HumpRow;
use plotters::prelude::*;
use polars::prelude::*;

use crate::error::{ReportError, Result};

const CHART_WIDTH: u32 = 1280;
const CHART_HEIGHT: u32 = 720;

/// One rendered visualization: a title plus a self-contained SVG document.
#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    pub svg: String,
}

/// Shared per-side colors across every chart.
pub fn side_color(side: &str) -> RGBColor {
    match side {
        "Left" => RGBColor(31, 119, 180),
        "Right" => RGBColor(255, 127, 14),
        "Top" => RGBColor(44, 160, 44),
        "Down" => RGBColor(214, 39, 40),
        _ => RGBColor(127, 127, 127),
    }
}

pub fn side_color_hex(side: &str) -> String {
    let color = side_color(side);
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

fn to_plot<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Plot(err.to_string())
}

/// Min/max over both axes, padded so flat data still spans a drawable range.
fn bounds(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;

    for (x, y) in points {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }

    if (x_max - x_min).abs() < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let x_pad = (x_max - x_min) * 0.05;
    let y_pad = (y_max - y_min) * 0.05;
    (x_min - x_pad, x_max + x_pad, y_min - y_pad, y_max + y_pad)
}

fn sorted_unique(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values.dedup();
    values
}

/// Scatter of raw offsets against physical distance, one pane per
/// (glass, cell) combination, points colored by side.
pub fn scatter_svg(processed: &DataFrame) -> Result<Chart> {
    let len = processed.height();
    let xs = processed.column("x")?.f64()?;
    let ys = processed.column(COL_AVG_OFFSET)?.f64()?;
    let sides = processed.column("side")?.str()?;
    let cells = processed.column("cell")?.str()?;
    let glasses = processed.column(COL_GLASS_ID)?.str()?;

    let mut facets: HashMap<(String, String), Vec<(f64, f64, String)>> = HashMap::new();
    let mut all: Vec<(f64, f64)> = Vec::new();

    for idx in 0..len {
        let (Some(x), Some(y), Some(side), Some(cell), Some(glass)) = (
            xs.get(idx),
            ys.get(idx),
            sides.get(idx),
            cells.get(idx),
            glasses.get(idx),
        ) else {
            continue;
        };
        facets
            .entry((glass.to_string(), cell.to_string()))
            .or_default()
            .push((x, y, side.to_string()));
        all.push((x, y));
    }

    if all.is_empty() {
        return Err(ReportError::Plot("no offset points to draw".to_string()));
    }

    let glass_names = sorted_unique(facets.keys().map(|(glass, _)| glass.clone()).collect());
    let cell_names = sorted_unique(facets.keys().map(|(_, cell)| cell.clone()).collect());
    let (x_min, x_max, y_min, y_max) = bounds(&all);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(to_plot)?;
        let panes = root.split_evenly((glass_names.len(), cell_names.len()));

        for (gi, glass) in glass_names.iter().enumerate() {
            for (ci, cell) in cell_names.iter().enumerate() {
                let pane = &panes[gi * cell_names.len() + ci];
                let mut chart = ChartBuilder::on(pane)
                    .caption(format!("{glass} {cell}"), ("sans-serif", 14))
                    .margin(8)
                    .x_label_area_size(24)
                    .y_label_area_size(40)
                    .build_cartesian_2d(x_min..x_max, y_min..y_max)
                    .map_err(to_plot)?;

                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .disable_y_mesh()
                    .x_labels(4)
                    .y_labels(4)
                    .draw()
                    .map_err(to_plot)?;

                if let Some(points) = facets.get(&(glass.clone(), cell.clone())) {
                    chart
                        .draw_series(points.iter().map(|(x, y, side)| {
                            Circle::new((*x, *y), 2, side_color(side).filled())
                        }))
                        .map_err(to_plot)?;
                }
            }
        }

        root.present().map_err(to_plot)?;
    }

    Ok(Chart {
        title: "Edge offset overview".to_string(),
        svg,
    })
}

/// Mean offset per (side, x), each side's curve normalized to its own
/// minimum, drawn as one line per side.
pub fn profile_svg(processed: &DataFrame) -> Result<Chart> {
    let len = processed.height();
    let xs = processed.column("x")?.f64()?;
    let ys = processed.column(COL_AVG_OFFSET)?.f64()?;
    let sides = processed.column("side")?.str()?;

    // x bucketed at nanometer resolution so float keys stay stable.
    let mut acc: BTreeMap<String, BTreeMap<i64, (f64, u32)>> = BTreeMap::new();
    for idx in 0..len {
        let (Some(x), Some(y), Some(side)) = (xs.get(idx), ys.get(idx), sides.get(idx)) else {
            continue;
        };
        let slot = acc
            .entry(side.to_string())
            .or_default()
            .entry((x * 1000.0).round() as i64)
            .or_insert((0.0, 0));
        slot.0 += y;
        slot.1 += 1;
    }

    if acc.is_empty() {
        return Err(ReportError::Plot("no profile data to draw".to_string()));
    }

    let mut lines: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for (side, buckets) in &acc {
        let means: Vec<(f64, f64)> = buckets
            .iter()
            .map(|(key, (sum, count))| (*key as f64 / 1000.0, sum / f64::from(*count)))
            .collect();
        let floor = means.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
        lines.push((
            side.clone(),
            means.into_iter().map(|(x, y)| (x, y - floor)).collect(),
        ));
    }

    let all: Vec<(f64, f64)> = lines.iter().flat_map(|(_, pts)| pts.iter().copied()).collect();
    let (x_min, x_max, y_min, y_max) = bounds(&all);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(to_plot)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Mean edge profile by side", ("sans-serif", 20))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(48)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(to_plot)?;

        chart
            .configure_mesh()
            .x_desc("x [um]")
            .y_desc("height [um]")
            .draw()
            .map_err(to_plot)?;

        for (side, points) in &lines {
            let color = side_color(side);
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(to_plot)?
                .label(side.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.4))
            .draw()
            .map_err(to_plot)?;

        root.present().map_err(to_plot)?;
    }

    Ok(Chart {
        title: "Mean edge profile by side".to_string(),
        svg,
    })
}

/// Hump height per side, one pane per (glass, cell), bottom edge excluded.
pub fn hump_bar_svg(rows: &[HumpRow]) -> Result<Chart> {
    let rows: Vec<&HumpRow> = rows.iter().filter(|r| r.side.as_str() != "Down").collect();
    if rows.is_empty() {
        return Err(ReportError::Plot("no hump rows to draw".to_string()));
    }

    let glass_names = sorted_unique(rows.iter().map(|r| r.glass.clone()).collect());
    let cell_names = sorted_unique(rows.iter().map(|r| r.cell.clone()).collect());
    let side_names = sorted_unique(rows.iter().map(|r| r.side.as_str().to_string()).collect());

    let mut y_min = 0.0f64;
    let mut y_max = f64::MIN;
    for row in &rows {
        y_min = y_min.min(row.hump_dy);
        y_max = y_max.max(row.hump_dy);
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    let y_pad = (y_max - y_min) * 0.1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(to_plot)?;
        let panes = root.split_evenly((glass_names.len(), cell_names.len()));

        for (gi, glass) in glass_names.iter().enumerate() {
            for (ci, cell) in cell_names.iter().enumerate() {
                let pane = &panes[gi * cell_names.len() + ci];
                let mut chart = ChartBuilder::on(pane)
                    .caption(format!("{glass} {cell}"), ("sans-serif", 14))
                    .margin(8)
                    .x_label_area_size(16)
                    .y_label_area_size(40)
                    .build_cartesian_2d(0f64..side_names.len() as f64, y_min..y_max + y_pad)
                    .map_err(to_plot)?;

                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .disable_y_mesh()
                    .x_labels(0)
                    .y_labels(4)
                    .draw()
                    .map_err(to_plot)?;

                let bars = rows.iter().filter(|r| &r.glass == glass && &r.cell == cell);
                chart
                    .draw_series(bars.map(|row| {
                        let slot = side_names
                            .iter()
                            .position(|side| side == row.side.as_str())
                            .unwrap_or(0) as f64;
                        Rectangle::new(
                            [(slot + 0.2, 0.0), (slot + 0.8, row.hump_dy)],
                            side_color(row.side.as_str()).filled(),
                        )
                    }))
                    .map_err(to_plot)?;
            }
        }

        root.present().map_err(to_plot)?;
    }

    Ok(Chart {
        title: "Hump height by side".to_string(),
        svg,
    })
}
