use polars::prelude::*;

use crate::errors::SheetError;
use crate::formats::unique_column_names;

/// A single worksheet with every cell kept as text.
///
/// The first row of the sheet becomes the column names; every other row is
/// data. Blank cells are null. No type inference happens here: the
/// transformers decide how each column is coerced.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub df: DataFrame,
}

impl RawSheet {
    pub fn from_rows(
        name: &str,
        header: Vec<Option<String>>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, SheetError> {
        let width = rows
            .iter()
            .map(|row| row.len())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let mut header = header;
        header.resize(width, None);
        let names = unique_column_names(&header);

        let mut values: Vec<Vec<Option<String>>> =
            (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
        for row in rows {
            let mut cells = row.into_iter();
            for column in values.iter_mut() {
                column.push(cells.next().flatten());
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(values)
            .map(|(column_name, column_values)| {
                Series::new(column_name.as_str().into(), column_values).into()
            })
            .collect();

        let df = DataFrame::new(columns).map_err(|source| SheetError::Frame {
            name: name.to_string(),
            source,
        })?;

        Ok(Self {
            name: name.to_string(),
            df,
        })
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }
}

/// All sheets loaded from one workbook, in workbook order.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<RawSheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<RawSheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Result<&RawSheet, SheetError> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .ok_or_else(|| SheetError::MissingSheet {
                name: name.to_string(),
                available: self.sheet_names(),
            })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    pub fn sheets(&self) -> &[RawSheet] {
        &self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
