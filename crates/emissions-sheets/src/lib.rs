pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::SheetError;
pub use formats::unique_column_names;
pub use model::{RawSheet, Workbook};
pub use registry::{open_with_readers, open_workbook, WorkbookReader};
