use emissions_core::reference::{parse_integer, ReferenceError, ReferenceTable};
use polars::prelude::*;

#[test]
fn builds_table_from_factor_sheet() -> PolarsResult<()> {
    let sheet = df!(
        "Emission Factor ID" => &[Some("259795.0"), None, Some("5")],
        "Emission Factor Name" => &[Some("Aluminum sheet"), None, Some("Steel beam")],
        "Emission Factor Value" => &[Some("8.5"), None, None],
        "Emission Factor Unit" => &[Some("kgCO2e/kg"), None, Some("kgCO2e/kg")],
    )?;

    let table = ReferenceTable::from_frame(&sheet).expect("valid reference");

    assert_eq!(table.len(), 2);
    let aluminum = table.get(259795).expect("aluminum factor");
    assert_eq!(aluminum.factor_name, "Aluminum sheet");
    assert_eq!(aluminum.factor_value, 8.5);
    assert!(table.get(5).expect("steel factor").factor_value.is_nan());
    assert!(table.get(6).is_none());
    Ok(())
}

#[test]
fn duplicate_factor_ids_are_rejected() -> PolarsResult<()> {
    let sheet = df!(
        "Emission Factor ID" => &["1", "2", "1"],
        "Emission Factor Name" => &["Natural gas", "Electricity", "Natural gas (old)"],
        "Emission Factor Value" => &["0.2", "0.5", "0.3"],
        "Emission Factor Unit" => &["kgCO2e/kWh", "kgCO2e/kWh", "kgCO2e/kWh"],
    )?;

    match ReferenceTable::from_frame(&sheet) {
        Err(ReferenceError::DuplicateFactorId {
            factor_id,
            first_row,
            duplicate_row,
        }) => {
            assert_eq!(factor_id, 1);
            assert_eq!(first_row, 0);
            assert_eq!(duplicate_row, 2);
        }
        other => panic!("expected duplicate id error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn duplicate_rows_are_reported_by_sheet_position() -> PolarsResult<()> {
    let sheet = df!(
        "Emission Factor ID" => &[None, None, Some("7"), Some("7")],
        "Emission Factor Name" => &[None, None, Some("Cardboard"), Some("Cardboard")],
        "Emission Factor Value" => &[None, None, Some("0.9"), Some("0.9")],
        "Emission Factor Unit" => &[None, None, Some("kgCO2e/kg"), Some("kgCO2e/kg")],
    )?;

    match ReferenceTable::from_frame(&sheet) {
        Err(ReferenceError::DuplicateFactorId {
            factor_id,
            first_row,
            duplicate_row,
        }) => {
            assert_eq!(factor_id, 7);
            assert_eq!(first_row, 2);
            assert_eq!(duplicate_row, 3);
        }
        other => panic!("expected duplicate id error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_column_and_bad_values_are_reported() -> PolarsResult<()> {
    let no_unit = df!(
        "Emission Factor ID" => &["1"],
        "Emission Factor Name" => &["Natural gas"],
        "Emission Factor Value" => &["0.2"],
    )?;
    assert!(matches!(
        ReferenceTable::from_frame(&no_unit),
        Err(ReferenceError::MissingColumn {
            column: "Emission Factor Unit"
        })
    ));

    let bad_value = df!(
        "Emission Factor ID" => &["1"],
        "Emission Factor Name" => &["Natural gas"],
        "Emission Factor Value" => &["lots"],
        "Emission Factor Unit" => &["kgCO2e/kWh"],
    )?;
    assert!(matches!(
        ReferenceTable::from_frame(&bad_value),
        Err(ReferenceError::InvalidFactorValue { row: 0, .. })
    ));
    Ok(())
}

#[test]
fn integer_parsing_accepts_spreadsheet_floats() {
    assert_eq!(parse_integer("259795"), Some(259795));
    assert_eq!(parse_integer(" 259795.0 "), Some(259795));
    assert_eq!(parse_integer("12.5"), None);
    assert_eq!(parse_integer("n/a"), None);
}
