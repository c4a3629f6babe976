use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to read workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("{} CSV error: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sheet '{name}' not found; available sheets: {available:?}")]
    MissingSheet {
        name: String,
        available: Vec<String>,
    },

    #[error("no reader accepts {}; tried: {readers:?}", .path.display())]
    UnsupportedSource {
        path: PathBuf,
        readers: Vec<&'static str>,
    },

    #[error("sheet '{name}' could not be assembled: {source}")]
    Frame {
        name: String,
        #[source]
        source: PolarsError,
    },
}
