use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::aggregation::MeasurementRecord;

pub const API_KEY_HEADER: &str = "X-Api-Key";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("measurement API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("measurement API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("measurement API response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct MeasurementQuery {
    pub api_url: String,
    pub api_key: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl MeasurementQuery {
    pub fn params(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start_date.format(DATE_FORMAT).to_string()),
            ("end_date", self.end_date.format(DATE_FORMAT).to_string()),
        ]
    }
}

impl fmt::Debug for MeasurementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementQuery")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .finish()
    }
}

/// Anything that can produce facility measurements for a date range.
pub trait MeasurementSource {
    fn fetch(&self, query: &MeasurementQuery) -> Result<Vec<MeasurementRecord>, MeasurementError>;
}

/// One blocking GET against the measurements endpoint. No paging, no retry.
pub struct HttpMeasurementSource {
    client: Client,
}

impl HttpMeasurementSource {
    pub fn new(timeout: Duration) -> Result<Self, MeasurementError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl MeasurementSource for HttpMeasurementSource {
    fn fetch(&self, query: &MeasurementQuery) -> Result<Vec<MeasurementRecord>, MeasurementError> {
        let response = self
            .client
            .get(&query.api_url)
            .header(API_KEY_HEADER, &query.api_key)
            .query(&query.params())
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if status != StatusCode::OK {
            return Err(MeasurementError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let records = parse_measurements(&body)?;
        info!(
            url = %query.api_url,
            measurements = records.len(),
            "extracted measurements"
        );
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct MeasurementsPayload {
    measurements: Vec<Measurement>,
}

#[derive(Debug, Deserialize)]
struct Measurement {
    #[serde(rename = "customerData")]
    customer_data: CustomerData,
    #[serde(rename = "resultValue")]
    result_value: f64,
}

#[derive(Debug, Deserialize)]
struct CustomerData {
    #[serde(rename = "Facility")]
    facility: String,
}

/// Decodes a successful response body into one record per measurement.
pub fn parse_measurements(body: &str) -> Result<Vec<MeasurementRecord>, MeasurementError> {
    let payload: MeasurementsPayload = serde_json::from_str(body)?;
    Ok(payload
        .measurements
        .into_iter()
        .map(|measurement| MeasurementRecord {
            facility: measurement.customer_data.facility,
            emissions: measurement.result_value,
        })
        .collect())
}
