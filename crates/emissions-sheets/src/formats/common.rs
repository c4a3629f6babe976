use std::collections::HashSet;

/// Blank cells are null; everything else is kept verbatim.
pub fn normalize_cell(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Turns a header row into usable, unique column names.
///
/// Blank header cells become `Unnamed: <index>`. Repeated names get a `.1`,
/// `.2`, ... suffix in order of appearance, so `["a", "a", "b"]` becomes
/// `["a", "a.1", "b"]`.
pub fn unique_column_names(header: &[Option<String>]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(header.len());
    let mut names = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let base = match cell.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("Unnamed: {idx}"),
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }

        seen.insert(candidate.clone());
        names.push(candidate);
    }

    names
}
