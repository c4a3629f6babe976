use emissions_core::material_resolver::{resolve_material, MaterialResolver};
use emissions_core::reference::{ReferenceRow, ReferenceTable};

fn table(names: &[(i64, &str)]) -> ReferenceTable {
    ReferenceTable::new(
        names
            .iter()
            .map(|(factor_id, name)| ReferenceRow {
                factor_id: *factor_id,
                factor_name: name.to_string(),
                factor_value: 1.0,
                factor_unit: "kgCO2e/kg".to_string(),
            })
            .collect(),
    )
    .unwrap()
}

#[test]
fn resolves_case_insensitive_substring() {
    let reference = table(&[(10, "Aluminum sheet"), (20, "Steel beam")]);

    assert_eq!(resolve_material("aluminum", &reference), Some(10));
    assert_eq!(resolve_material("STEEL", &reference), Some(20));
    assert_eq!(resolve_material("plastic", &reference), None);
}

#[test]
fn first_match_in_table_order_wins() {
    let reference = table(&[(7, "Recycled steel coil"), (8, "Steel beam")]);
    let resolver = MaterialResolver::new(&reference);

    assert_eq!(resolver.resolve("steel"), Some(7));
    assert_eq!(resolver.resolve("steel beam"), Some(8));
}

#[test]
fn blank_descriptions_never_match() {
    let reference = table(&[(10, "Aluminum sheet")]);

    assert_eq!(resolve_material("", &reference), None);
    assert_eq!(resolve_material("   ", &reference), None);
}
