// crates/emissions-core/src/error.rs

use emissions_sheets::SheetError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::measurements::MeasurementError;
use crate::outputs::ReportError;
use crate::reference::ReferenceError;
use crate::transform::TransformError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Spreadsheet loading failed: {0}")]
    Sheets(#[from] SheetError),

    #[error("Reference table invalid: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("Measurement extraction failed: {0}")]
    Measurement(#[from] MeasurementError),

    #[error("Report output failed: {0}")]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
