//! The three table transformers and the emission-factor join they share.

mod energy;
mod fleet;
mod procurement;

use std::fmt;

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::reference::ReferenceTable;
use crate::schema::{emissions::EMISSION_CO2E, reference};

pub use energy::{transform_energy, EnergyOptions};
pub use fleet::transform_fleet;
pub use procurement::{
    transform_procurement, FactorOverride, MaterialSearch, ProcurementOptions, RowSelector,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Energy,
    Fleet,
    Procurement,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Energy => "energy",
            TableKind::Fleet => "fleet",
            TableKind::Procurement => "procurement",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row indices are zero-based positions in the data body, after any header
/// promotion.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("{table} table is missing column '{column}'")]
    MissingColumn {
        table: TableKind,
        column: &'static str,
    },
    #[error("{table} row {row}: column '{column}' value '{value}' is not a number")]
    InvalidNumber {
        table: TableKind,
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("{table} row {row}: no emission factor id could be resolved (material {material:?})")]
    UnresolvedFactorId {
        table: TableKind,
        row: usize,
        material: Option<String>,
    },
    #[error("{table} row {row}: emission factor id {value} is not an integer")]
    NonIntegralFactorId {
        table: TableKind,
        row: usize,
        value: f64,
    },
}

/// What a transformer did to its table, for logging and the CLI summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub rows_in: usize,
    pub rows_out: usize,
    pub duplicates_removed: usize,
    pub outliers_replaced: usize,
    pub factor_ids_forced: usize,
    pub factor_ids_resolved: usize,
    pub tonnes_converted: usize,
    pub unmatched_rows: usize,
}

#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub table: TableKind,
    pub dataframe: DataFrame,
    pub stats: TransformStats,
}

pub(crate) fn require_columns(
    df: &DataFrame,
    table: TableKind,
    required: &[&'static str],
) -> Result<(), TransformError> {
    for &column in required {
        if df.get_column_index(column).is_none() {
            return Err(TransformError::MissingColumn { table, column });
        }
    }
    Ok(())
}

/// Nulls and blank cells stay null; any other text must parse as a float.
pub(crate) fn parse_quantities(
    table: TableKind,
    column: &'static str,
    values: &[Option<String>],
) -> Result<Vec<Option<f64>>, TransformError> {
    values
        .iter()
        .enumerate()
        .map(|(row, value)| match value.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => {
                text.parse::<f64>()
                    .map(Some)
                    .map_err(|_| TransformError::InvalidNumber {
                        table,
                        row,
                        column,
                        value: text.to_string(),
                    })
            }
        })
        .collect()
}

/// Numeric coercion where failure means "missing".
pub(crate) fn coerce_number(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|number| number.is_finite())
}

/// Join keys for [`attach_emissions`].
///
/// `typed` decides whether the id column is rewritten as integers. When it is
/// false the sheet's own text stays in the output, so an id such as `"TBD"`
/// is still visible on its unmatched row.
pub(crate) struct FactorIds {
    pub ids: Vec<Option<i64>>,
    pub typed: bool,
}

impl FactorIds {
    /// Ids that have already been validated as integers.
    pub fn strict(ids: Vec<Option<i64>>) -> Self {
        Self { ids, typed: true }
    }

    /// Anything that is not an integral number simply finds no reference
    /// row. The column is only retyped when every non-blank id coerced.
    pub fn lenient(values: &[Option<String>]) -> Self {
        let ids: Vec<Option<i64>> = values
            .iter()
            .map(|value| {
                coerce_number(value.as_deref())
                    .filter(|number| number.fract() == 0.0)
                    .map(|number| number as i64)
            })
            .collect();
        let typed = values.iter().zip(&ids).all(|(raw, id)| {
            id.is_some() || raw.as_deref().map_or(true, |text| text.trim().is_empty())
        });
        Self { ids, typed }
    }
}

/// Left-joins the activity rows against the reference table and appends
/// `emission_co2e = quantity * factor_value`.
///
/// The quantity column is rewritten with its typed values, the factor id
/// column only when `factor_ids.typed` is set. Reference metadata columns are never part of the result, and a previous
/// `emission_co2e` column is replaced. Rows without a matching factor keep
/// a null emission. Returns the frame and the number of unmatched rows.
pub(crate) fn attach_emissions(
    mut df: DataFrame,
    quantity_column: &str,
    quantities: Vec<Option<f64>>,
    factor_ids: FactorIds,
    reference_table: &ReferenceTable,
) -> Result<(DataFrame, usize), TransformError> {
    let mut unmatched = 0;
    let emissions: Vec<Option<f64>> = quantities
        .iter()
        .zip(&factor_ids.ids)
        .map(|(quantity, factor_id)| {
            let factor = factor_id.and_then(|id| reference_table.get(id));
            if factor.is_none() {
                unmatched += 1;
            }
            match (quantity, factor) {
                (Some(quantity), Some(factor)) => {
                    Some(quantity * factor.factor_value).filter(|value| !value.is_nan())
                }
                _ => None,
            }
        })
        .collect();

    df.with_column(Series::new(quantity_column.into(), quantities))?;
    if factor_ids.typed {
        df.with_column(Series::new(reference::FACTOR_ID.into(), factor_ids.ids))?;
    }
    crate::frame::drop_columns_if_present(&mut df, &reference::METADATA)?;
    crate::frame::drop_columns_if_present(&mut df, &[EMISSION_CO2E])?;
    df.with_column(Series::new(EMISSION_CO2E.into(), emissions))?;

    Ok((df, unmatched))
}
