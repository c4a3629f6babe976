use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use emissions_core::config::PipelineConfig;
use emissions_core::measurements::HttpMeasurementSource;
use emissions_core::pipeline::{self, FacilityReport, TransformedTables};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Emissions ledger: activity data cleaning and facility reports", long_about = None)]
struct Cli {
    /// Pipeline configuration file (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean the activity workbook and write emission tables as CSV
    Transform(TransformArgs),
    /// Fetch facility measurements and write the per-facility report and chart
    Facilities(FacilitiesArgs),
    /// Run the transform stage, then the facility stage
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
struct TransformArgs {
    /// Spreadsheet file or directory of per-sheet CSV files
    #[arg(long)]
    workbook: Option<PathBuf>,
    /// Directory for the cleaned CSV tables
    #[arg(long)]
    processed_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct FacilitiesArgs {
    /// First day of measurements (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Last day of measurements (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,
    /// Directory for the facility chart
    #[arg(long)]
    graph_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    #[command(flatten)]
    transform: TransformArgs,
    #[command(flatten)]
    facilities: FacilitiesArgs,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Transform(args) => {
            args.apply(&mut config);
            transform(&config)
        }
        Command::Facilities(args) => {
            args.apply(&mut config);
            facilities(&config)
        }
        Command::Run(args) => {
            args.transform.apply(&mut config);
            args.facilities.apply(&mut config);
            transform(&config)?;
            facilities(&config)
        }
    }
}

impl TransformArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(workbook) = &self.workbook {
            config.workbook = workbook.clone();
        }
        if let Some(dir) = &self.processed_dir {
            config.output.processed_dir = dir.clone();
        }
    }
}

impl FacilitiesArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(start) = self.start_date {
            config.api.start_date = start;
        }
        if let Some(end) = self.end_date {
            config.api.end_date = end;
        }
        if let Some(dir) = &self.graph_dir {
            config.output.graph_dir = dir.clone();
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn transform(config: &PipelineConfig) -> Result<()> {
    let (tables, paths) =
        pipeline::run_transform_stage(config).context("transform stage failed")?;
    for path in &paths {
        info!(path = %path.display(), "cleaned table written");
    }
    println!("{}", transform_summary(&tables));
    Ok(())
}

fn facilities(config: &PipelineConfig) -> Result<()> {
    let query = config
        .api
        .query_from_env()
        .context("measurement API is not configured")?;
    let source = HttpMeasurementSource::new(config.api.timeout())
        .context("failed to build HTTP client")?;
    let report = pipeline::run_facility_stage(&source, &query, config)
        .context("facility stage failed")?;
    info!(
        csv = %report.csv_path.display(),
        chart = %report.chart_path.display(),
        "facility report written"
    );
    println!("{}", facility_summary(&report));
    Ok(())
}

fn transform_summary(tables: &TransformedTables) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Table",
        "Rows in",
        "Rows out",
        "Duplicates",
        "Outliers",
        "Ids forced",
        "Ids resolved",
        "t to kg",
        "Unmatched",
    ]);
    for output in tables.iter() {
        let stats = &output.stats;
        table.add_row(vec![
            output.table.to_string(),
            stats.rows_in.to_string(),
            stats.rows_out.to_string(),
            stats.duplicates_removed.to_string(),
            stats.outliers_replaced.to_string(),
            stats.factor_ids_forced.to_string(),
            stats.factor_ids_resolved.to_string(),
            stats.tonnes_converted.to_string(),
            stats.unmatched_rows.to_string(),
        ]);
    }
    table
}

fn facility_summary(report: &FacilityReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Facility", "Emissions"]);
    for row in &report.totals {
        table.add_row(vec![row.facility.clone(), format!("{:.2}", row.emissions)]);
    }
    table
}
