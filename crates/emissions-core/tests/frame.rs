use emissions_core::frame::{drop_duplicate_rows, promote_header};
use emissions_core::profiling::profile;
use polars::prelude::*;

#[test]
fn first_row_becomes_the_header() -> PolarsResult<()> {
    let raw = df!(
        "Unnamed: 0" => &[Some("Type"), Some("Gas"), Some("Gas")],
        "Unnamed: 1" => &[None, Some("x"), Some("y")],
        "Unnamed: 2" => &[Some("Type"), Some("1"), Some("2")],
    )?;

    let promoted = promote_header(&raw)?;

    let names: Vec<&str> = promoted
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(names, ["Type", "Unnamed: 1", "Type.1"]);
    assert_eq!(promoted.height(), 2);
    assert_eq!(promoted.column("Type.1")?.str()?.get(0), Some("1"));
    Ok(())
}

#[test]
fn duplicates_keep_first_occurrence() -> PolarsResult<()> {
    let df = df!(
        "Employee" => &["a", "b", "a", "a"],
        "Quantity" => &[Some("1"), Some("2"), Some("1"), None],
    )?;

    let (deduped, removed) = drop_duplicate_rows(&df)?;

    assert_eq!(removed, 1);
    let employees: Vec<Option<&str>> = deduped.column("Employee")?.str()?.into_iter().collect();
    assert_eq!(employees, vec![Some("a"), Some("b"), Some("a")]);
    Ok(())
}

#[test]
fn profile_counts_duplicates_and_nulls() -> PolarsResult<()> {
    let df = df!(
        "Material" => &[Some("Steel"), Some("Steel"), None],
        "Emission Factor ID" => &[None, None, Some("5")],
    )?;

    let report = profile(&df)?;

    assert_eq!(report.rows, 3);
    assert_eq!(report.duplicate_rows, 1);
    assert_eq!(
        report.null_counts,
        vec![
            ("Material".to_string(), 1),
            ("Emission Factor ID".to_string(), 2),
        ]
    );
    assert_eq!(report.total_nulls(), 3);
    Ok(())
}
