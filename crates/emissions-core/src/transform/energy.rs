use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    attach_emissions, parse_quantities, require_columns, FactorIds, TableKind, TransformError,
    TransformOutput, TransformStats,
};
use crate::frame::{promote_header, text_values};
use crate::outliers::{median, replace_outliers, OutlierBounds};
use crate::reference::ReferenceTable;
use crate::schema::energy::{FACTOR_ID, PERCENT_MISSING, PRO_RATED, QUANTITY, REQUIRED, TYPE};

const MISSING_FILL: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyOptions {
    /// Rows of this `Type` supply the median that replaces outlier quantities.
    pub reference_type: String,
}

impl Default for EnergyOptions {
    fn default() -> Self {
        Self {
            reference_type: "Gas".to_string(),
        }
    }
}

/// Cleans the energy usage sheet and computes its emissions.
///
/// The raw sheet carries its real column names in the first data row. After
/// promoting them, blank `%missing` cells become `"0"`, trailing slashes are
/// stripped from the pro-ration flag, and quantities outside the Tukey fences
/// are replaced by the median quantity of the reference type. Every row is
/// kept; rows whose factor id has no reference entry get a null emission.
pub fn transform_energy(
    raw: &DataFrame,
    reference: &ReferenceTable,
    options: &EnergyOptions,
) -> Result<TransformOutput, TransformError> {
    let mut df = promote_header(raw)?;
    require_columns(&df, TableKind::Energy, &REQUIRED)?;
    let rows_in = df.height();

    let percent_missing: Vec<Option<String>> = text_values(&df, PERCENT_MISSING)?
        .into_iter()
        .map(|value| value.or_else(|| Some(MISSING_FILL.to_string())))
        .collect();
    df.with_column(Series::new(PERCENT_MISSING.into(), percent_missing))?;

    let pro_rated: Vec<Option<String>> = text_values(&df, PRO_RATED)?
        .into_iter()
        .map(|value| value.map(|flag| flag.trim_end_matches('/').to_string()))
        .collect();
    df.with_column(Series::new(PRO_RATED.into(), pro_rated))?;

    let mut quantities =
        parse_quantities(TableKind::Energy, QUANTITY, &text_values(&df, QUANTITY)?)?;
    let types = text_values(&df, TYPE)?;

    let observed: Vec<f64> = quantities.iter().flatten().copied().collect();
    let bounds = OutlierBounds::from_values(&observed);

    let reference_quantities: Vec<f64> = quantities
        .iter()
        .zip(&types)
        .filter(|(_, kind)| kind.as_deref() == Some(options.reference_type.as_str()))
        .filter_map(|(quantity, _)| *quantity)
        .collect();
    let replacement = Some(median(&reference_quantities)).filter(|value| !value.is_nan());

    let outliers_replaced = replace_outliers(&mut quantities, bounds, replacement);
    if outliers_replaced > 0 && replacement.is_none() {
        warn!(
            table = %TableKind::Energy,
            outliers = outliers_replaced,
            reference_type = %options.reference_type,
            "no rows of the reference type; outlier quantities set to null"
        );
    }

    let factor_ids = FactorIds::lenient(&text_values(&df, FACTOR_ID)?);
    let (dataframe, unmatched_rows) =
        attach_emissions(df, QUANTITY, quantities, factor_ids, reference)?;

    let stats = TransformStats {
        rows_in,
        rows_out: dataframe.height(),
        outliers_replaced,
        unmatched_rows,
        ..TransformStats::default()
    };

    info!(
        table = %TableKind::Energy,
        rows = stats.rows_out,
        lower_bound = bounds.lower,
        upper_bound = bounds.upper,
        outliers_replaced,
        unmatched_rows,
        "transformed energy table"
    );

    Ok(TransformOutput {
        table: TableKind::Energy,
        dataframe,
        stats,
    })
}
