// crates/edgehump-cli/src/main.rs

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use edgehump_core::analysis::{run_analysis, Analysis};
use edgehump_core::schema::{normalize_schema, SchemaReport};
use edgehump_report::plot::Chart;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod loader;

/// Edge-hump analysis for glass-panel offset scans.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full analysis and write export artifacts.
    Analyze(AnalyzeArgs),
    /// Load and normalize the inputs, reporting the resolved schema only.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Measurement CSV files, processed in the given order.
    inputs: Vec<PathBuf>,

    /// Read every *.csv under this directory (sorted by name) instead.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Directory for result artifacts.
    #[arg(long, default_value = "edgehump-out")]
    out_dir: PathBuf,

    /// Also package the artifacts into a single ZIP archive.
    #[arg(long)]
    archive: bool,

    /// Skip chart rendering.
    #[arg(long)]
    no_plots: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Measurement CSV files, processed in the given order.
    inputs: Vec<PathBuf>,

    /// Read every *.csv under this directory (sorted by name) instead.
    #[arg(long)]
    dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => analyze(args),
        Command::Check(args) => check(args),
    }
}

fn analyze(args: AnalyzeArgs) -> Result<()> {
    let paths = resolve_inputs(args.inputs, args.dir)?;
    let combined = loader::load_measurements(&paths)?;
    info!("loaded {} rows from {} files", combined.height(), paths.len());

    let (normalized, schema_report) = normalize_schema(&combined)?;
    print_schema_report(&schema_report);

    let analysis = run_analysis(&normalized)?;
    print_results(&analysis);

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;
    let stamp = Local::now().format("%Y%m%d_%H%M%S");

    let csv_bytes = edgehump_report::export::result_csv_bytes(&analysis.results)?;
    let csv_path = args.out_dir.join(format!("analysis_result_{stamp}.csv"));
    fs::write(&csv_path, &csv_bytes)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    println!("wrote {}", csv_path.display());

    let html = if args.no_plots {
        None
    } else {
        let charts = render_charts(&analysis);
        if charts.is_empty() {
            warn!("no charts could be rendered");
            None
        } else {
            let html = edgehump_report::bundle::render_html(&charts);
            let html_path = args.out_dir.join(format!("analysis_plots_{stamp}.html"));
            fs::write(&html_path, &html)
                .with_context(|| format!("failed to write {}", html_path.display()))?;
            println!("wrote {}", html_path.display());
            Some(html)
        }
    };

    if args.archive {
        let bytes = edgehump_report::bundle::archive_bytes(
            &csv_bytes,
            html.as_deref(),
            &schema_report,
            &analysis.report,
        )?;
        let zip_path = args.out_dir.join(format!("analysis_complete_{stamp}.zip"));
        fs::write(&zip_path, bytes)
            .with_context(|| format!("failed to write {}", zip_path.display()))?;
        println!("wrote {}", zip_path.display());
    }

    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let paths = resolve_inputs(args.inputs, args.dir)?;
    let combined = loader::load_measurements(&paths)?;
    println!(
        "{} rows, {} columns from {} files",
        combined.height(),
        combined.width(),
        paths.len()
    );

    let (normalized, report) = normalize_schema(&combined)?;
    print_schema_report(&report);

    let names: Vec<String> = normalized
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    println!("resolved columns: {}", names.join(", "));
    Ok(())
}

fn resolve_inputs(inputs: Vec<PathBuf>, dir: Option<PathBuf>) -> Result<Vec<PathBuf>> {
    if let Some(dir) = dir {
        let pattern = dir.join("*.csv");
        let pattern = pattern.to_str().context("invalid directory pattern")?;
        let mut paths: Vec<PathBuf> = glob::glob(pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(err) => {
                    warn!("could not read path from glob pattern: {err}");
                    None
                }
            })
            .collect();
        paths.sort();
        if paths.is_empty() {
            bail!("no CSV files found under {}", dir.display());
        }
        return Ok(paths);
    }

    if inputs.is_empty() {
        bail!("no input files given; pass files or --dir");
    }
    Ok(inputs)
}

fn render_charts(analysis: &Analysis) -> Vec<Chart> {
    use edgehump_report::plot;

    let mut charts = Vec::new();
    match plot::scatter_svg(&analysis.processed) {
        Ok(chart) => charts.push(chart),
        Err(err) => warn!("skipping scatter chart: {err}"),
    }
    match plot::profile_svg(&analysis.processed) {
        Ok(chart) => charts.push(chart),
        Err(err) => warn!("skipping profile chart: {err}"),
    }
    match plot::hump_bar_svg(&analysis.results) {
        Ok(chart) => charts.push(chart),
        Err(err) => warn!("skipping hump chart: {err}"),
    }
    charts
}

fn print_schema_report(report: &SchemaReport) {
    for mapping in &report.mappings {
        println!("mapped column '{}' -> '{}'", mapping.alias, mapping.canonical);
    }
    if report.synthesized_no {
        println!("ordinal column missing; synthesized 1-based row numbers");
    }
}

fn print_results(analysis: &Analysis) {
    let mut table = Table::new();
    table.set_header(["glass", "cell", "side", "hump_dy", "hump_dx", "split"]);
    for row in &analysis.results {
        table.add_row([
            row.glass.clone(),
            row.cell.clone(),
            row.side.to_string(),
            format!("{:.1}", row.hump_dy),
            format!("{:.0}", row.hump_dx),
            row.split.to_string(),
        ]);
    }
    println!("{table}");
    println!("{} hump results", analysis.results.len());
}
