#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw CSV row types, registry entries, and load reports for the
//! econ-pulse dataset loader.
//!
//! The row structs mirror the source CSV headers exactly; numeric columns
//! arrive as strings and are coerced (or rejected) by the loader before
//! anything downstream sees them.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which CSV shape a registered dataset file has.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    /// Quarterly CPI observations (aggregate and per COICOP category).
    CpiQuarterly,
    /// Annual world population with per-country demographics.
    Population,
    /// National Health Accounts indicators, annual.
    NhaIndicators,
}

/// One entry of the `datasets.toml` registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Stable identifier (e.g. `"cpi_quarterly"`).
    pub id: String,
    /// CSV shape of the file.
    pub kind: DatasetKind,
    /// File path, relative to the data directory.
    pub path: String,
    /// Optional source URL the file can be downloaded from.
    #[serde(default)]
    pub url: Option<String>,
}

/// The parsed `datasets.toml` registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetRegistry {
    /// Registered dataset files.
    #[serde(default)]
    pub datasets: Vec<DatasetSpec>,
}

/// A row of the quarterly CPI CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct CpiCsvRow {
    /// ISO 3166-1 alpha-3 country code.
    #[serde(rename = "COUNTRY")]
    pub country: String,
    /// COICOP division code, or `_T`/`Aggregate` for the all-items index.
    #[serde(rename = "COICOP_1999")]
    pub coicop: String,
    /// Quarter label, `YYYY-Qn` or `YYYYQn`.
    #[serde(rename = "TIME_PERIOD")]
    pub time_period: String,
    /// Index value; coerced to f64 by the loader.
    #[serde(rename = "OBS_VALUE")]
    pub obs_value: String,
}

/// A row of the world population CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct PopulationCsvRow {
    /// ISO 3166-1 alpha-3 country code.
    #[serde(rename = "CCA3")]
    pub cca3: String,
    /// Country or territory display name.
    #[serde(rename = "Country/Territory")]
    pub country: String,
    /// Calendar year; coerced by the loader.
    #[serde(rename = "Year")]
    pub year: String,
    /// Population count; coerced by the loader.
    #[serde(rename = "Population")]
    pub population: String,
    /// Annual growth rate in percent.
    #[serde(rename = "Growth Rate", default)]
    pub growth_rate: Option<String>,
    /// Land area in square kilometres.
    #[serde(rename = "Area (km²)", default)]
    pub area_km2: Option<String>,
    /// Population density per square kilometre.
    #[serde(rename = "Density (per km²)", default)]
    pub density: Option<String>,
    /// Share of world population in percent.
    #[serde(rename = "World Population Percentage", default)]
    pub world_share_pct: Option<String>,
}

/// A row of the NHA indicators CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct NhaCsvRow {
    /// Country display name.
    #[serde(rename = "Countries")]
    pub country: String,
    /// Indicator name.
    #[serde(rename = "Indicators")]
    pub indicator: String,
    /// Calendar year; coerced by the loader.
    #[serde(rename = "Year")]
    pub year: String,
    /// Indicator value; coerced by the loader.
    #[serde(rename = "Value", default)]
    pub value: Option<String>,
    /// PPP-adjusted value, used when `Value` is absent.
    #[serde(rename = "Value_PPP", default)]
    pub value_ppp: Option<String>,
}

/// A fully typed population record (one country, one year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationRecord {
    /// Country display name.
    pub country: String,
    /// Calendar year.
    pub year: i32,
    /// Population count.
    pub population: f64,
    /// Annual growth rate in percent, if reported.
    pub growth_rate: Option<f64>,
    /// Land area in square kilometres, if reported.
    pub area_km2: Option<f64>,
    /// Population density per square kilometre, if reported.
    pub density: Option<f64>,
    /// Share of world population in percent, if reported.
    pub world_share_pct: Option<f64>,
}

/// Outcome of loading one dataset file.
///
/// Malformed rows are rejected before they reach the aggregator; this
/// report is how their count surfaces to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Dataset identifier from the registry.
    pub dataset_id: String,
    /// Rows read from the file.
    pub rows_read: u64,
    /// Rows that parsed into typed observations.
    pub rows_loaded: u64,
    /// Rows rejected for unparseable values or periods.
    pub rows_rejected: u64,
    /// Rows superseded by a later duplicate of the same (country, period).
    pub duplicate_rows: u64,
}

impl LoadReport {
    /// Creates an empty report for a dataset.
    #[must_use]
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            rows_read: 0,
            rows_loaded: 0,
            rows_rejected: 0,
            duplicate_rows: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_kind_parses_snake_case() {
        assert_eq!("cpi_quarterly".parse(), Ok(DatasetKind::CpiQuarterly));
        assert_eq!("population".parse(), Ok(DatasetKind::Population));
        assert_eq!("nha_indicators".parse(), Ok(DatasetKind::NhaIndicators));
    }

    #[test]
    fn registry_round_trips_through_serde() {
        let registry = DatasetRegistry {
            datasets: vec![DatasetSpec {
                id: "cpi_quarterly".to_string(),
                kind: DatasetKind::CpiQuarterly,
                path: "imf_cpi_quarterly.csv".to_string(),
                url: None,
            }],
        };

        let json = serde_json::to_string(&registry).unwrap();
        let back: DatasetRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, registry);
    }
}
