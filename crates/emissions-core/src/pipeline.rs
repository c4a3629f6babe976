//! Stage runners wiring the loaders, transformers and report sink together.
//!
//! Two independent stages: the transform stage turns the activity workbook
//! into three cleaned emission tables, the facility stage turns API
//! measurements into per-facility totals with a chart. Either stage aborts on
//! the first error.

use std::path::PathBuf;

use emissions_sheets::{open_workbook, Workbook};
use tracing::{info, warn};

use crate::aggregation::{aggregate, facility_frame, FacilityEmission};
use crate::chart::{write_bar_chart, BarChart};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::frame::promote_header;
use crate::measurements::{MeasurementQuery, MeasurementSource};
use crate::outputs::write_csv;
use crate::profiling::profile;
use crate::reference::ReferenceTable;
use crate::schema::facility::{EMISSIONS, FACILITY};
use crate::transform::{
    transform_energy, transform_fleet, transform_procurement, TransformOutput,
};

#[derive(Debug, Clone)]
pub struct TransformedTables {
    pub energy: TransformOutput,
    pub fleet: TransformOutput,
    pub procurement: TransformOutput,
}

impl TransformedTables {
    pub fn iter(&self) -> impl Iterator<Item = &TransformOutput> {
        [&self.energy, &self.fleet, &self.procurement].into_iter()
    }
}

pub fn load_reference(workbook: &Workbook, config: &PipelineConfig) -> Result<ReferenceTable> {
    let sheet = workbook.sheet(&config.sheets.reference)?;
    log_profile(&sheet.name, &sheet.df, false);
    Ok(ReferenceTable::from_frame(&sheet.df)?)
}

/// Runs all three transformers against one shared reference table.
pub fn transform_workbook(workbook: &Workbook, config: &PipelineConfig) -> Result<TransformedTables> {
    let reference = load_reference(workbook, config)?;

    let energy_sheet = workbook.sheet(&config.sheets.energy)?;
    log_profile(&energy_sheet.name, &energy_sheet.df, true);
    let energy = transform_energy(&energy_sheet.df, &reference, &config.energy)?;

    let fleet_sheet = workbook.sheet(&config.sheets.fleet)?;
    log_profile(&fleet_sheet.name, &fleet_sheet.df, true);
    let fleet = transform_fleet(&fleet_sheet.df, &reference)?;

    let procurement_sheet = workbook.sheet(&config.sheets.procurement)?;
    log_profile(&procurement_sheet.name, &procurement_sheet.df, false);
    let procurement =
        transform_procurement(&procurement_sheet.df, &reference, &config.procurement)?;

    Ok(TransformedTables {
        energy,
        fleet,
        procurement,
    })
}

pub fn write_transformed(tables: &TransformedTables, config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    let dir = &config.output.processed_dir;
    Ok(vec![
        write_csv(&tables.energy.dataframe, dir, &config.output.energy_file)?,
        write_csv(&tables.fleet.dataframe, dir, &config.output.fleet_file)?,
        write_csv(&tables.procurement.dataframe, dir, &config.output.procurement_file)?,
    ])
}

/// Opens the configured workbook, transforms it and writes the cleaned CSVs.
pub fn run_transform_stage(config: &PipelineConfig) -> Result<(TransformedTables, Vec<PathBuf>)> {
    let workbook = open_workbook(&config.workbook)?;
    info!(
        workbook = %config.workbook.display(),
        sheets = ?workbook.sheet_names(),
        "loaded activity workbook"
    );
    let tables = transform_workbook(&workbook, config)?;
    let paths = write_transformed(&tables, config)?;
    Ok((tables, paths))
}

#[derive(Debug, Clone)]
pub struct FacilityReport {
    pub totals: Vec<FacilityEmission>,
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
}

/// Fetches measurements, sums them per facility and writes the CSV and chart.
pub fn run_facility_stage(
    source: &dyn MeasurementSource,
    query: &MeasurementQuery,
    config: &PipelineConfig,
) -> Result<FacilityReport> {
    let records = source.fetch(query)?;
    let totals = aggregate(&records);
    info!(
        measurements = records.len(),
        facilities = totals.len(),
        "aggregated emissions by facility"
    );

    let frame = facility_frame(&totals)?;
    let csv_path = write_csv(
        &frame,
        &config.output.processed_dir,
        &config.output.facility_file,
    )?;
    let chart = BarChart {
        x_field: FACILITY,
        y_field: EMISSIONS,
        title: &config.api.chart_title,
    };
    let chart_path = write_bar_chart(
        &frame,
        &chart,
        &config.output.graph_dir,
        &config.output.chart_file,
    )?;

    Ok(FacilityReport {
        totals,
        csv_path,
        chart_path,
    })
}

fn log_profile(sheet: &str, df: &polars::prelude::DataFrame, header_in_first_row: bool) {
    let promoted = if header_in_first_row {
        match promote_header(df) {
            Ok(frame) => Some(frame),
            Err(err) => {
                warn!(sheet, error = %err, "could not profile sheet");
                return;
            }
        }
    } else {
        None
    };
    let table = promoted.as_ref().unwrap_or(df);

    match profile(table) {
        Ok(report) => info!(
            sheet,
            rows = report.rows,
            duplicate_rows = report.duplicate_rows,
            null_cells = report.total_nulls(),
            null_counts = ?report.null_counts,
            "profiled sheet"
        ),
        Err(err) => warn!(sheet, error = %err, "could not profile sheet"),
    }
}
