use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("chart data could not be serialized: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes `data` to `output_dir/filename.csv` with a header row and no index
/// column, creating the directory when needed.
pub fn write_csv(
    data: &DataFrame,
    output_dir: &Path,
    filename: &str,
) -> Result<PathBuf, ReportError> {
    ensure_dir(output_dir)?;
    let path = output_dir.join(format!("{filename}.csv"));
    let mut file = File::create(&path).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;

    let mut frame = data.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)?;

    info!(path = %path.display(), rows = frame.height(), "wrote csv report");
    Ok(path)
}
