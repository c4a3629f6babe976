use std::collections::HashSet;

use polars::prelude::*;
use serde::Serialize;

use crate::frame::row_keys;

/// Duplicate and null counts of a table, reported before it is cleaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableProfile {
    pub rows: usize,
    pub duplicate_rows: usize,
    pub null_counts: Vec<(String, usize)>,
}

impl TableProfile {
    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|(_, count)| count).sum()
    }
}

/// A row counts as a duplicate when an identical row appeared earlier.
pub fn profile(df: &DataFrame) -> PolarsResult<TableProfile> {
    let mut seen = HashSet::with_capacity(df.height());
    let duplicate_rows = row_keys(df)?
        .into_iter()
        .filter(|key| !seen.insert(key.clone()))
        .count();

    let null_counts = df
        .get_columns()
        .iter()
        .map(|column| (column.name().to_string(), column.null_count()))
        .collect();

    Ok(TableProfile {
        rows: df.height(),
        duplicate_rows,
        null_counts,
    })
}
