use crate::reference::ReferenceTable;

/// Case-insensitive substring lookup of material descriptions against the
/// emission factor names.
///
/// Matching is plain containment: `"steel"` hits `"Stainless steel sheet"`
/// as readily as `"Steel beam"`, and the first row in reference order wins.
pub struct MaterialResolver<'a> {
    reference: &'a ReferenceTable,
    lowered_names: Vec<String>,
}

impl<'a> MaterialResolver<'a> {
    pub fn new(reference: &'a ReferenceTable) -> Self {
        let lowered_names = reference
            .rows()
            .iter()
            .map(|row| row.factor_name.to_lowercase())
            .collect();
        Self {
            reference,
            lowered_names,
        }
    }

    pub fn resolve(&self, description: &str) -> Option<i64> {
        if description.trim().is_empty() {
            return None;
        }
        let needle = description.to_lowercase();
        self.lowered_names
            .iter()
            .position(|name| name.contains(&needle))
            .map(|position| self.reference.rows()[position].factor_id)
    }
}

pub fn resolve_material(description: &str, reference: &ReferenceTable) -> Option<i64> {
    MaterialResolver::new(reference).resolve(description)
}
