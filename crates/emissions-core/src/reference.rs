use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::frame::text_values;
use crate::schema::reference::{FACTOR_ID, FACTOR_NAME, FACTOR_UNIT, FACTOR_VALUE, REQUIRED};

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("reference table is missing column '{column}'")]
    MissingColumn { column: &'static str },
    #[error("reference row {row}: factor id '{value}' is not an integer")]
    InvalidFactorId { row: usize, value: String },
    #[error("reference row {row}: factor value '{value}' is not a number")]
    InvalidFactorValue { row: usize, value: String },
    #[error("factor id {factor_id} appears on reference rows {first_row} and {duplicate_row}")]
    DuplicateFactorId {
        factor_id: i64,
        first_row: usize,
        duplicate_row: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRow {
    pub factor_id: i64,
    pub factor_name: String,
    /// Emission per unit of activity. NaN when the sheet leaves it blank.
    pub factor_value: f64,
    pub factor_unit: String,
}

/// Emission factors keyed by `factor_id`, kept in sheet order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    rows: Vec<ReferenceRow>,
    index: HashMap<i64, usize>,
}

impl ReferenceTable {
    pub fn new(rows: Vec<ReferenceRow>) -> Result<Self, ReferenceError> {
        let sheet_rows = (0..rows.len()).collect();
        Self::with_sheet_rows(rows, sheet_rows)
    }

    /// `sheet_rows[i]` is the sheet position of `rows[i]`, used in errors.
    fn with_sheet_rows(
        rows: Vec<ReferenceRow>,
        sheet_rows: Vec<usize>,
    ) -> Result<Self, ReferenceError> {
        let mut index = HashMap::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            if let Some(&first) = index.get(&row.factor_id) {
                return Err(ReferenceError::DuplicateFactorId {
                    factor_id: row.factor_id,
                    first_row: sheet_rows[first],
                    duplicate_row: sheet_rows[position],
                });
            }
            index.insert(row.factor_id, position);
        }
        Ok(Self { rows, index })
    }

    /// Builds the table from the emission factor sheet. Fully blank rows are
    /// skipped; anything else must carry an integral id.
    pub fn from_frame(df: &DataFrame) -> Result<Self, ReferenceError> {
        for column in REQUIRED {
            if df.get_column_index(column).is_none() {
                return Err(ReferenceError::MissingColumn { column });
            }
        }

        let ids = text_values(df, FACTOR_ID)?;
        let names = text_values(df, FACTOR_NAME)?;
        let values = text_values(df, FACTOR_VALUE)?;
        let units = text_values(df, FACTOR_UNIT)?;

        let mut rows = Vec::with_capacity(df.height());
        let mut sheet_rows = Vec::with_capacity(df.height());
        for (idx, (((id, name), value), unit)) in ids
            .into_iter()
            .zip(names)
            .zip(values)
            .zip(units)
            .enumerate()
        {
            let Some(raw_id) = id else {
                if name.is_none() && value.is_none() && unit.is_none() {
                    continue;
                }
                return Err(ReferenceError::InvalidFactorId {
                    row: idx,
                    value: String::new(),
                });
            };

            let factor_id = parse_integer(&raw_id).ok_or_else(|| ReferenceError::InvalidFactorId {
                row: idx,
                value: raw_id.clone(),
            })?;

            let factor_value = match value {
                None => f64::NAN,
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ReferenceError::InvalidFactorValue { row: idx, value: raw })?,
            };

            rows.push(ReferenceRow {
                factor_id,
                factor_name: name.unwrap_or_default(),
                factor_value,
                factor_unit: unit.unwrap_or_default(),
            });
            sheet_rows.push(idx);
        }

        debug!(rows = rows.len(), "loaded emission factor reference table");
        Self::with_sheet_rows(rows, sheet_rows)
    }

    pub fn get(&self, factor_id: i64) -> Option<&ReferenceRow> {
        self.index.get(&factor_id).map(|&position| &self.rows[position])
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Accepts `"259795"` as well as spreadsheet-style `"259795.0"`.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}
