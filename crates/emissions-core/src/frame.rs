//! Small DataFrame helpers shared by the transformers and the report sink.

use std::collections::HashSet;

use emissions_sheets::unique_column_names;
use polars::prelude::*;

/// Reads any column as text, one entry per row. Nulls stay `None`.
pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    column_text(df.column(name)?)
}

fn column_text(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let text = column.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Uses the first data row as column names and drops it from the body.
///
/// Blank header cells keep the column's current name; repeated names are
/// made unique the same way the sheet loader does it.
pub fn promote_header(df: &DataFrame) -> PolarsResult<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }

    let mut header: Vec<Option<String>> = Vec::with_capacity(df.width());
    for (column, current) in df.get_columns().iter().zip(df.get_column_names()) {
        let cell = column_text(&column.slice(0, 1))?.pop().flatten();
        let name = match cell {
            Some(text) if !text.trim().is_empty() => text,
            _ => current.to_string(),
        };
        header.push(Some(name));
    }

    let body = df.slice(1, df.height() - 1);
    let columns: Vec<Column> = body
        .get_columns()
        .iter()
        .zip(unique_column_names(&header))
        .map(|(column, name)| {
            let mut column = column.clone();
            column.rename(name.into());
            column
        })
        .collect();

    DataFrame::new(columns)
}

/// Every row rendered as text, used for exact-duplicate detection.
pub fn row_keys(df: &DataFrame) -> PolarsResult<Vec<Vec<Option<String>>>> {
    let columns = df
        .get_columns()
        .iter()
        .map(column_text)
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok((0..df.height())
        .map(|idx| columns.iter().map(|values| values[idx].clone()).collect())
        .collect())
}

/// Keeps the first occurrence of every distinct row, preserving order.
/// Returns the deduplicated frame and how many rows were removed.
pub fn drop_duplicate_rows(df: &DataFrame) -> PolarsResult<(DataFrame, usize)> {
    let mut seen = HashSet::with_capacity(df.height());
    let keep: Vec<bool> = row_keys(df)?
        .into_iter()
        .map(|key| seen.insert(key))
        .collect();

    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed == 0 {
        return Ok((df.clone(), 0));
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok((df.filter(&mask)?, removed))
}

pub fn drop_columns_if_present(df: &mut DataFrame, names: &[&str]) -> PolarsResult<()> {
    for name in names {
        if df.get_column_index(name).is_some() {
            df.drop_in_place(name)?;
        }
    }
    Ok(())
}
