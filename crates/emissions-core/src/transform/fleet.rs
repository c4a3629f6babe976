use polars::prelude::*;
use tracing::info;

use super::{
    attach_emissions, parse_quantities, require_columns, FactorIds, TableKind, TransformError,
    TransformOutput, TransformStats,
};
use crate::frame::{drop_duplicate_rows, promote_header, text_values};
use crate::reference::ReferenceTable;
use crate::schema::fleet::{FACTOR_ID, QUANTITY, REQUIRED};

/// Cleans the fleet/travel sheet: header promotion, exact-duplicate removal
/// and the emission-factor join. Quantities are taken as reported.
pub fn transform_fleet(
    raw: &DataFrame,
    reference: &ReferenceTable,
) -> Result<TransformOutput, TransformError> {
    let promoted = promote_header(raw)?;
    require_columns(&promoted, TableKind::Fleet, &REQUIRED)?;
    let rows_in = promoted.height();

    let (df, duplicates_removed) = drop_duplicate_rows(&promoted)?;

    let quantities = parse_quantities(TableKind::Fleet, QUANTITY, &text_values(&df, QUANTITY)?)?;
    let factor_ids = FactorIds::lenient(&text_values(&df, FACTOR_ID)?);
    let (dataframe, unmatched_rows) =
        attach_emissions(df, QUANTITY, quantities, factor_ids, reference)?;

    let stats = TransformStats {
        rows_in,
        rows_out: dataframe.height(),
        duplicates_removed,
        unmatched_rows,
        ..TransformStats::default()
    };

    info!(
        table = %TableKind::Fleet,
        rows = stats.rows_out,
        duplicates_removed,
        unmatched_rows,
        "transformed fleet table"
    );

    Ok(TransformOutput {
        table: TableKind::Fleet,
        dataframe,
        stats,
    })
}
