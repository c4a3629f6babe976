use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::measurements::MeasurementQuery;
use crate::transform::{EnergyOptions, ProcurementOptions};

pub const API_KEY_ENV: &str = "X_Api_Key";
pub const API_URL_ENV: &str = "api_url";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("environment variable {0} must be set")]
    MissingEnv(&'static str),
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// Everything a pipeline run needs besides credentials. Every field has a
/// default, so an empty TOML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub workbook: PathBuf,
    pub sheets: SheetNames,
    pub output: OutputConfig,
    pub energy: EnergyOptions,
    pub procurement: ProcurementOptions,
    pub api: ApiConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("data/raw/activity_data_sweep-input.xlsx"),
            sheets: SheetNames::default(),
            output: OutputConfig::default(),
            energy: EnergyOptions::default(),
            procurement: ProcurementOptions::default(),
            api: ApiConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub reference: String,
    pub energy: String,
    pub fleet: String,
    pub procurement: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            reference: "EF".to_string(),
            energy: "Energy data".to_string(),
            fleet: "CONCUR 2023 Cars Inc".to_string(),
            procurement: "Procurement Castel".to_string(),
        }
    }
}

/// Output locations. File names are given without extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub processed_dir: PathBuf,
    pub graph_dir: PathBuf,
    pub energy_file: String,
    pub fleet_file: String,
    pub procurement_file: String,
    pub facility_file: String,
    pub chart_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            processed_dir: PathBuf::from("data/processed"),
            graph_dir: PathBuf::from("output_graph"),
            energy_file: "Energy_data_cleaned".to_string(),
            fleet_file: "CONCUR_2023_Cars_Inc_cleaned".to_string(),
            procurement_file: "procurement_castel_cleaned".to_string(),
            facility_file: "emissions_by_facility".to_string(),
            chart_file: "emissions_facility_2022".to_string(),
        }
    }
}

/// Dates are `YYYY-MM-DD` strings in TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub chart_title: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://api.sweep.net/api/v1/measurements".to_string(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2022, 12, 31).unwrap_or_default(),
            chart_title: "CO2 Emissions per Facility in 2022".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the query from explicit credentials. `api_url` replaces the
    /// configured url when given.
    pub fn query(
        &self,
        api_key: String,
        api_url: Option<String>,
    ) -> Result<MeasurementQuery, ConfigError> {
        if self.start_date > self.end_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }

        Ok(MeasurementQuery {
            api_url: api_url.unwrap_or_else(|| self.url.clone()),
            api_key,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }

    /// Reads `X_Api_Key` (required) and `api_url` (optional) from the
    /// process environment.
    pub fn query_from_env(&self) -> Result<MeasurementQuery, ConfigError> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(API_KEY_ENV))?;
        let api_url = env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        self.query(api_key, api_url)
    }
}
