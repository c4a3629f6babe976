#![allow(dead_code)]

use emissions_core::reference::{ReferenceRow, ReferenceTable};
use polars::prelude::*;

pub const NATURAL_GAS: i64 = 1;
pub const GRID_ELECTRICITY: i64 = 2;
pub const DIESEL_CAR: i64 = 3;
pub const ALUMINUM_SHEET: i64 = 259795;
pub const STEEL_BEAM: i64 = 5;

fn row(factor_id: i64, name: &str, value: f64, unit: &str) -> ReferenceRow {
    ReferenceRow {
        factor_id,
        factor_name: name.to_string(),
        factor_value: value,
        factor_unit: unit.to_string(),
    }
}

pub fn reference_table() -> ReferenceTable {
    ReferenceTable::new(vec![
        row(NATURAL_GAS, "Natural gas", 0.2, "kgCO2e/kWh"),
        row(GRID_ELECTRICITY, "Electricity grid mix", 0.5, "kgCO2e/kWh"),
        row(DIESEL_CAR, "Diesel car", 0.17, "kgCO2e/km"),
        row(ALUMINUM_SHEET, "Aluminum sheet", 8.5, "kgCO2e/kg"),
        row(STEEL_BEAM, "Steel beam", 1.9, "kgCO2e/kg"),
    ])
    .expect("reference ids are unique")
}

/// A sheet as exported: placeholder column names, real names in row 0.
pub fn header_in_first_row(header: &[&str], rows: &[Vec<Option<&str>>]) -> DataFrame {
    let columns: Vec<Column> = header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut values: Vec<Option<&str>> = vec![Some(*name)];
            values.extend(rows.iter().map(|row| row[idx]));
            Series::new(format!("Unnamed: {idx}").into(), values).into()
        })
        .collect();
    DataFrame::new(columns).expect("raw frame")
}

/// Inverse of header promotion: pushes the column names back into row 0 and
/// renders every value as text.
pub fn demote_header(df: &DataFrame) -> DataFrame {
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let text = column.cast(&DataType::String).expect("cast to text");
            let mut values: Vec<Option<String>> = vec![Some(column.name().to_string())];
            values.extend(
                text.str()
                    .expect("text column")
                    .into_iter()
                    .map(|value| value.map(str::to_string)),
            );
            Series::new(format!("Unnamed: {idx}").into(), values).into()
        })
        .collect();
    DataFrame::new(columns).expect("demoted frame")
}

pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .expect("column exists")
        .f64()
        .expect("f64 column")
        .into_iter()
        .collect()
}

pub fn str_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .expect("column exists")
        .str()
        .expect("str column")
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect()
}

pub fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value present");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, found {actual}"
    );
}
