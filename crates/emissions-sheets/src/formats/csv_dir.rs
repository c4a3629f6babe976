use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::debug;

use crate::errors::SheetError;
use crate::formats::common::normalize_cell;
use crate::model::{RawSheet, Workbook};
use crate::registry::WorkbookReader;

/// Treats a directory of `<sheet name>.csv` files as a workbook.
pub struct CsvDirectoryReader;

impl WorkbookReader for CsvDirectoryReader {
    fn name(&self) -> &'static str {
        "csv-directory"
    }

    fn accepts(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> Result<Workbook, SheetError> {
        let entries = fs::read_dir(path).map_err(|source| SheetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SheetError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let file_path = entry.path();
            let is_csv = file_path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_csv && file_path.is_file() {
                files.push(file_path);
            }
        }
        files.sort();

        let mut sheets = Vec::with_capacity(files.len());
        for file_path in files {
            let name = file_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();
            sheets.push(read_csv_sheet(&file_path, &name)?);
        }

        Ok(Workbook::new(sheets))
    }
}

/// Reads one CSV file into a text sheet; the first record is the header.
pub fn read_csv_sheet(path: &Path, name: &str) -> Result<RawSheet, SheetError> {
    let csv_error = |source| SheetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut header: Option<Vec<Option<String>>> = None;
    let mut body: Vec<Vec<Option<String>>> = Vec::new();

    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let cells: Vec<Option<String>> = record.iter().map(normalize_cell).collect();
        if header.is_none() {
            header = Some(cells);
        } else {
            body.push(cells);
        }
    }

    debug!(sheet = name, rows = body.len(), path = %path.display(), "read csv sheet");
    RawSheet::from_rows(name, header.unwrap_or_default(), body)
}
