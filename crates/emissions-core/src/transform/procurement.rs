use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    attach_emissions, coerce_number, parse_quantities, require_columns, FactorIds,
    TableKind, TransformError, TransformOutput, TransformStats,
};
use crate::frame::text_values;
use crate::material_resolver::MaterialResolver;
use crate::reference::ReferenceTable;
use crate::schema::procurement::{
    FACTOR_ID, KG_PER_TONNE, KILOGRAM, MATERIAL, QUANTITY_KG, REQUIRED, TONNE, UNIT,
};

/// Which rows a [`FactorOverride`] applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowSelector {
    /// Zero-based row positions `first..=last`.
    RowRange { first: usize, last: usize },
    /// Rows whose material description contains `text`, ignoring case.
    MaterialContains { text: String },
}

impl RowSelector {
    pub fn matches(&self, row: usize, material: Option<&str>) -> bool {
        match self {
            RowSelector::RowRange { first, last } => (*first..=*last).contains(&row),
            RowSelector::MaterialContains { text } => material
                .map(|description| description.to_lowercase().contains(&text.to_lowercase()))
                .unwrap_or(false),
        }
    }
}

/// Forces a known factor id onto a homogeneous product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorOverride {
    pub selector: RowSelector,
    pub factor_id: i64,
}

/// Search text handed to the material resolver for rows without an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MaterialSearch {
    /// Each row's own `Material` description.
    RowMaterial,
    /// One fixed term for every row, whatever its description says.
    FixedTerm { term: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcurementOptions {
    /// Checked in order; the first matching selector wins.
    pub overrides: Vec<FactorOverride>,
    pub material_search: MaterialSearch,
}

impl Default for ProcurementOptions {
    fn default() -> Self {
        Self {
            overrides: vec![FactorOverride {
                selector: RowSelector::RowRange { first: 0, last: 12 },
                factor_id: 259795,
            }],
            material_search: MaterialSearch::RowMaterial,
        }
    }
}

/// Cleans the procurement sheet and computes its emissions.
///
/// Factor ids come from, in order: the configured overrides, the id already
/// in the sheet, and the material resolver. Tonnes are converted to
/// kilograms before the join. A row left without an integral factor id
/// aborts the transform.
pub fn transform_procurement(
    raw: &DataFrame,
    reference: &ReferenceTable,
    options: &ProcurementOptions,
) -> Result<TransformOutput, TransformError> {
    const TABLE: TableKind = TableKind::Procurement;

    require_columns(raw, TABLE, &REQUIRED)?;
    let mut df = raw.clone();
    let rows_in = df.height();

    let materials = text_values(&df, MATERIAL)?;
    let mut factor_ids: Vec<Option<f64>> = text_values(&df, FACTOR_ID)?
        .iter()
        .map(|value| coerce_number(value.as_deref()))
        .collect();

    let mut forced = vec![false; rows_in];
    for (row, material) in materials.iter().enumerate() {
        if let Some(rule) = options
            .overrides
            .iter()
            .find(|rule| rule.selector.matches(row, material.as_deref()))
        {
            factor_ids[row] = Some(rule.factor_id as f64);
            forced[row] = true;
        }
    }
    let factor_ids_forced = forced.iter().filter(|was_forced| **was_forced).count();

    let resolver = MaterialResolver::new(reference);
    let mut factor_ids_resolved = 0;
    for row in 0..rows_in {
        if forced[row] || factor_ids[row].is_some() {
            continue;
        }
        let term = match &options.material_search {
            MaterialSearch::RowMaterial => materials[row].as_deref(),
            MaterialSearch::FixedTerm { term } => Some(term.as_str()),
        };
        match term.and_then(|text| resolver.resolve(text)) {
            Some(factor_id) => {
                factor_ids[row] = Some(factor_id as f64);
                factor_ids_resolved += 1;
            }
            None => debug!(row, material = ?materials[row], "no emission factor matched material"),
        }
    }

    let mut units = text_values(&df, UNIT)?;
    let mut quantities = parse_quantities(TABLE, QUANTITY_KG, &text_values(&df, QUANTITY_KG)?)?;
    let mut tonnes_converted = 0;
    for (unit, quantity) in units.iter_mut().zip(quantities.iter_mut()) {
        if unit.as_deref() == Some(TONNE) {
            *quantity = quantity.map(|tonnes| tonnes * KG_PER_TONNE);
            *unit = Some(KILOGRAM.to_string());
            tonnes_converted += 1;
        }
    }
    df.with_column(Series::new(UNIT.into(), units))?;

    let factor_ids = factor_ids
        .into_iter()
        .enumerate()
        .map(|(row, factor_id)| match factor_id {
            None => Err(TransformError::UnresolvedFactorId {
                table: TABLE,
                row,
                material: materials[row].clone(),
            }),
            Some(value) if value.fract() != 0.0 => Err(TransformError::NonIntegralFactorId {
                table: TABLE,
                row,
                value,
            }),
            Some(value) => Ok(Some(value as i64)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (dataframe, unmatched_rows) = attach_emissions(
        df,
        QUANTITY_KG,
        quantities,
        FactorIds::strict(factor_ids),
        reference,
    )?;

    let stats = TransformStats {
        rows_in,
        rows_out: dataframe.height(),
        factor_ids_forced,
        factor_ids_resolved,
        tonnes_converted,
        unmatched_rows,
        ..TransformStats::default()
    };

    info!(
        table = %TABLE,
        rows = stats.rows_out,
        factor_ids_forced,
        factor_ids_resolved,
        tonnes_converted,
        unmatched_rows,
        "transformed procurement table"
    );

    Ok(TransformOutput {
        table: TABLE,
        dataframe,
        stats,
    })
}
