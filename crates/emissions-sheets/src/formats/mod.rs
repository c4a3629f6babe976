mod common;
mod csv_dir;
mod xlsx;

pub use common::{normalize_cell, unique_column_names};
pub use csv_dir::{read_csv_sheet, CsvDirectoryReader};
pub use xlsx::{cell_text, XlsxReader};
