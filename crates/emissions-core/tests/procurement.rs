mod common;

use common::{assert_close, f64_values, reference_table, str_values, ALUMINUM_SHEET, STEEL_BEAM};
use emissions_core::schema::emissions::EMISSION_CO2E;
use emissions_core::transform::{
    transform_procurement, FactorOverride, MaterialSearch, ProcurementOptions, RowSelector,
    TableKind, TransformError,
};
use polars::prelude::*;

fn options(overrides: Vec<FactorOverride>) -> ProcurementOptions {
    ProcurementOptions {
        overrides,
        material_search: MaterialSearch::RowMaterial,
    }
}

fn cans_override() -> FactorOverride {
    FactorOverride {
        selector: RowSelector::RowRange { first: 0, last: 1 },
        factor_id: ALUMINUM_SHEET,
    }
}

fn procurement_sheet() -> PolarsResult<DataFrame> {
    df!(
        "Material" => &["Aluminium can", "Cans", "Steel", "Aluminum", "Widget"],
        "Unit" => &["t", "kg", "kg", "kg", "kg"],
        "Quantity in kg" => &[2.0, 3.0, 10.0, 1.0, 4.0],
        "Emission Factor ID" => &[None, Some("5"), None, Some("n/a"), Some("2")],
    )
}

#[test]
fn resolves_factor_ids_and_converts_tonnes() -> PolarsResult<()> {
    let output = transform_procurement(
        &procurement_sheet()?,
        &reference_table(),
        &options(vec![cans_override()]),
    )
    .expect("procurement transform");
    let df = &output.dataframe;

    assert_eq!(output.table, TableKind::Procurement);
    assert_eq!(df.height(), 5);
    assert_eq!(output.stats.factor_ids_forced, 2);
    assert_eq!(output.stats.factor_ids_resolved, 2);
    assert_eq!(output.stats.tonnes_converted, 1);
    assert_eq!(output.stats.unmatched_rows, 0);

    let ids: Vec<Option<i64>> = df.column("Emission Factor ID")?.i64()?.into_iter().collect();
    assert_eq!(
        ids,
        vec![
            Some(ALUMINUM_SHEET),
            Some(ALUMINUM_SHEET),
            Some(STEEL_BEAM),
            Some(ALUMINUM_SHEET),
            Some(2),
        ]
    );

    assert_eq!(str_values(df, "Unit")[0].as_deref(), Some("kg"));
    assert_close(f64_values(df, "Quantity in kg")[0], 2000.0);

    let emissions = f64_values(df, EMISSION_CO2E);
    assert_close(emissions[0], 17000.0);
    assert_close(emissions[1], 25.5);
    assert_close(emissions[2], 19.0);
    assert_close(emissions[3], 8.5);
    assert_close(emissions[4], 2.0);
    Ok(())
}

#[test]
fn transform_is_idempotent_on_its_own_output() -> PolarsResult<()> {
    let reference = reference_table();
    let rules = options(vec![cans_override()]);
    let first = transform_procurement(&procurement_sheet()?, &reference, &rules)
        .expect("first pass");

    let mut cleaned = first.dataframe.clone();
    cleaned.drop_in_place(EMISSION_CO2E)?;
    let second = transform_procurement(&cleaned, &reference, &rules).expect("second pass");

    assert_eq!(second.stats.tonnes_converted, 0);
    assert_eq!(second.stats.factor_ids_resolved, 0);
    assert_eq!(
        f64_values(&first.dataframe, EMISSION_CO2E),
        f64_values(&second.dataframe, EMISSION_CO2E)
    );
    assert_eq!(
        f64_values(&first.dataframe, "Quantity in kg"),
        f64_values(&second.dataframe, "Quantity in kg")
    );
    Ok(())
}

#[test]
fn default_override_forces_the_first_thirteen_rows() {
    let defaults = ProcurementOptions::default();

    assert_eq!(defaults.material_search, MaterialSearch::RowMaterial);
    assert_eq!(
        defaults.overrides,
        vec![FactorOverride {
            selector: RowSelector::RowRange { first: 0, last: 12 },
            factor_id: 259795,
        }]
    );
    assert!(defaults.overrides[0].selector.matches(12, None));
    assert!(!defaults.overrides[0].selector.matches(13, None));
}

#[test]
fn material_selector_matches_description_text() -> PolarsResult<()> {
    let sheet = df!(
        "Material" => &["Steel beam", "ALUMINIUM CAN 33cl"],
        "Unit" => &["kg", "kg"],
        "Quantity in kg" => &[1.0, 1.0],
        "Emission Factor ID" => &[Some("2"), None],
    )?;
    let rules = vec![FactorOverride {
        selector: RowSelector::MaterialContains {
            text: "aluminium can".to_string(),
        },
        factor_id: ALUMINUM_SHEET,
    }];

    let output = transform_procurement(&sheet, &reference_table(), &options(rules))
        .expect("procurement transform");

    let ids: Vec<Option<i64>> = output
        .dataframe
        .column("Emission Factor ID")?
        .i64()?
        .into_iter()
        .collect();
    assert_eq!(ids, vec![Some(2), Some(ALUMINUM_SHEET)]);
    assert_eq!(output.stats.factor_ids_forced, 1);
    Ok(())
}

#[test]
fn fixed_term_search_ignores_row_descriptions() -> PolarsResult<()> {
    let sheet = df!(
        "Material" => &["Plastic crate"],
        "Unit" => &["kg"],
        "Quantity in kg" => &[2.0],
        "Emission Factor ID" => &[None::<&str>],
    )?;
    let legacy = ProcurementOptions {
        overrides: Vec::new(),
        material_search: MaterialSearch::FixedTerm {
            term: "aluminum".to_string(),
        },
    };

    let output =
        transform_procurement(&sheet, &reference_table(), &legacy).expect("procurement transform");

    assert_close(f64_values(&output.dataframe, EMISSION_CO2E)[0], 17.0);
    Ok(())
}

#[test]
fn unresolvable_material_aborts_the_transform() -> PolarsResult<()> {
    let sheet = df!(
        "Material" => &["Steel", "Plastic crate"],
        "Unit" => &["kg", "kg"],
        "Quantity in kg" => &[1.0, 1.0],
        "Emission Factor ID" => &[None::<&str>, None],
    )?;

    match transform_procurement(&sheet, &reference_table(), &options(Vec::new())) {
        Err(TransformError::UnresolvedFactorId {
            table,
            row,
            material,
        }) => {
            assert_eq!(table, TableKind::Procurement);
            assert_eq!(row, 1);
            assert_eq!(material.as_deref(), Some("Plastic crate"));
        }
        other => panic!("expected unresolved factor id, got {other:?}"),
    }
    Ok(())
}

#[test]
fn fractional_factor_id_is_rejected() -> PolarsResult<()> {
    let sheet = df!(
        "Material" => &["Steel"],
        "Unit" => &["kg"],
        "Quantity in kg" => &[1.0],
        "Emission Factor ID" => &["12.5"],
    )?;

    assert!(matches!(
        transform_procurement(&sheet, &reference_table(), &options(Vec::new())),
        Err(TransformError::NonIntegralFactorId { row: 0, .. })
    ));
    Ok(())
}

#[test]
fn unknown_integral_id_keeps_the_row() -> PolarsResult<()> {
    let sheet = df!(
        "Material" => &["Steel"],
        "Unit" => &["t"],
        "Quantity in kg" => &[1.5],
        "Emission Factor ID" => &["999"],
    )?;

    let output = transform_procurement(&sheet, &reference_table(), &options(Vec::new()))
        .expect("procurement transform");

    assert_eq!(output.dataframe.height(), 1);
    assert_eq!(output.stats.unmatched_rows, 1);
    assert_close(f64_values(&output.dataframe, "Quantity in kg")[0], 1500.0);
    assert_eq!(f64_values(&output.dataframe, EMISSION_CO2E)[0], None);
    Ok(())
}

#[test]
fn missing_material_column_is_reported() -> PolarsResult<()> {
    let sheet = df!(
        "Unit" => &["kg"],
        "Quantity in kg" => &[1.0],
        "Emission Factor ID" => &["5"],
    )?;

    assert!(matches!(
        transform_procurement(&sheet, &reference_table(), &options(Vec::new())),
        Err(TransformError::MissingColumn {
            table: TableKind::Procurement,
            column: "Material"
        })
    ));
    Ok(())
}
