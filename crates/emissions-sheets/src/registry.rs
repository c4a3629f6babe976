use std::path::Path;

use tracing::debug;

use crate::errors::SheetError;
use crate::formats::{CsvDirectoryReader, XlsxReader};
use crate::model::Workbook;

pub trait WorkbookReader {
    fn name(&self) -> &'static str;
    fn accepts(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<Workbook, SheetError>;
}

/// Opens a spreadsheet file or a directory of CSV exports.
pub fn open_workbook(path: &Path) -> Result<Workbook, SheetError> {
    let xlsx = XlsxReader;
    let csv_directory = CsvDirectoryReader;
    let readers: [&dyn WorkbookReader; 2] = [&xlsx, &csv_directory];
    open_with_readers(path, &readers)
}

pub fn open_with_readers(
    path: &Path,
    readers: &[&dyn WorkbookReader],
) -> Result<Workbook, SheetError> {
    for reader in readers {
        if reader.accepts(path) {
            let workbook = reader.read(path)?;
            debug!(
                reader = reader.name(),
                sheets = workbook.len(),
                path = %path.display(),
                "opened workbook"
            );
            return Ok(workbook);
        }
    }

    Err(SheetError::UnsupportedSource {
        path: path.to_path_buf(),
        readers: readers.iter().map(|reader| reader.name()).collect(),
    })
}
