use std::collections::BTreeMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::facility::{EMISSIONS, FACILITY};

/// One measurement as extracted from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub facility: String,
    pub emissions: f64,
}

/// Total emissions of one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityEmission {
    pub facility: String,
    pub emissions: f64,
}

/// Sums emissions per facility, one entry per distinct facility, ordered by
/// facility name.
pub fn aggregate(records: &[MeasurementRecord]) -> Vec<FacilityEmission> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.facility.as_str()).or_insert(0.0) += record.emissions;
    }

    totals
        .into_iter()
        .map(|(facility, emissions)| FacilityEmission {
            facility: facility.to_string(),
            emissions,
        })
        .collect()
}

pub fn facility_frame(totals: &[FacilityEmission]) -> PolarsResult<DataFrame> {
    let facilities: Vec<&str> = totals.iter().map(|row| row.facility.as_str()).collect();
    let emissions: Vec<f64> = totals.iter().map(|row| row.emissions).collect();

    DataFrame::new(vec![
        Series::new(FACILITY.into(), facilities).into(),
        Series::new(EMISSIONS.into(), emissions).into(),
    ])
}
