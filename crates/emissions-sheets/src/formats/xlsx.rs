use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::errors::SheetError;
use crate::formats::common::normalize_cell;
use crate::model::{RawSheet, Workbook};
use crate::registry::WorkbookReader;

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Reads every worksheet of a spreadsheet file.
pub struct XlsxReader;

impl WorkbookReader for XlsxReader {
    fn name(&self) -> &'static str {
        "xlsx"
    }

    fn accepts(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    SPREADSHEET_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                })
                .unwrap_or(false)
    }

    fn read(&self, path: &Path) -> Result<Workbook, SheetError> {
        let workbook_error = |source| SheetError::Workbook {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
        let names = workbook.sheet_names();
        let mut sheets = Vec::with_capacity(names.len());

        for name in names {
            let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
            let mut rows = range.rows();
            let header: Vec<Option<String>> = rows
                .next()
                .map(|row| row.iter().map(cell_text).collect())
                .unwrap_or_default();
            let body: Vec<Vec<Option<String>>> = rows
                .map(|row| row.iter().map(cell_text).collect())
                .collect();

            debug!(sheet = %name, rows = body.len(), "read worksheet");
            sheets.push(RawSheet::from_rows(&name, header, body)?);
        }

        Ok(Workbook::new(sheets))
    }
}

/// Renders a spreadsheet cell as text. Whole floats print without a
/// fractional part, so an id stored as `259795.0` reads back as `259795`.
/// Dates print as `YYYY-MM-DD`, with ` HH:MM:SS` when they carry a time.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) => normalize_cell(text),
        Data::Float(value) => Some(value.to_string()),
        Data::Int(value) => Some(value.to_string()),
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTime(value) if value.is_datetime() => value
            .as_datetime()
            .map(datetime_text)
            .or_else(|| Some(value.to_string())),
        other => normalize_cell(&other.to_string()),
    }
}

fn datetime_text(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
