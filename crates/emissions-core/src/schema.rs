//! Column names for every table the pipeline touches.
//!
//! Each table module lists the columns it must carry in `REQUIRED`; the
//! transformers check those before touching any row.

// ── Emission factor reference ───────────────────────────────────────────────
pub mod reference {
    pub const FACTOR_ID: &str = "Emission Factor ID";
    pub const FACTOR_NAME: &str = "Emission Factor Name";
    pub const FACTOR_VALUE: &str = "Emission Factor Value";
    pub const FACTOR_UNIT: &str = "Emission Factor Unit";

    /// Reference metadata that must never leak into a transformed table.
    pub const METADATA: [&str; 3] = [FACTOR_NAME, FACTOR_VALUE, FACTOR_UNIT];

    pub const REQUIRED: [&str; 4] = [FACTOR_ID, FACTOR_NAME, FACTOR_VALUE, FACTOR_UNIT];
}

// ── Energy usage ────────────────────────────────────────────────────────────
pub mod energy {
    pub const QUANTITY: &str = "Quantity";
    pub const TYPE: &str = "Type";
    pub const PERCENT_MISSING: &str = "%missing";
    pub const PRO_RATED: &str = "Pro-rated/not pro-rated";
    pub const FACTOR_ID: &str = super::reference::FACTOR_ID;

    pub const REQUIRED: [&str; 5] = [QUANTITY, TYPE, PERCENT_MISSING, PRO_RATED, FACTOR_ID];
}

// ── Fleet / travel ──────────────────────────────────────────────────────────
pub mod fleet {
    pub const QUANTITY: &str = "Quantity";
    pub const FACTOR_ID: &str = super::reference::FACTOR_ID;

    pub const REQUIRED: [&str; 2] = [QUANTITY, FACTOR_ID];
}

// ── Procurement ─────────────────────────────────────────────────────────────
pub mod procurement {
    pub const MATERIAL: &str = "Material";
    pub const UNIT: &str = "Unit";
    pub const QUANTITY_KG: &str = "Quantity in kg";
    pub const FACTOR_ID: &str = super::reference::FACTOR_ID;

    pub const TONNE: &str = "t";
    pub const KILOGRAM: &str = "kg";
    pub const KG_PER_TONNE: f64 = 1000.0;

    pub const REQUIRED: [&str; 4] = [MATERIAL, UNIT, QUANTITY_KG, FACTOR_ID];
}

// ── Derived emissions ───────────────────────────────────────────────────────
pub mod emissions {
    pub const EMISSION_CO2E: &str = "emission_co2e";
}

// ── Facility measurements ───────────────────────────────────────────────────
pub mod facility {
    pub const FACILITY: &str = "Facility";
    pub const EMISSIONS: &str = "Emissions";
}
