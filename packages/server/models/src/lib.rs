#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the econ-pulse server.
//!
//! Query parameter structs for each endpoint plus the small response
//! envelopes that aren't already covered by the dashboard view models.
//! Multi-valued parameters (country lists, year lists) arrive as
//! comma-separated strings and are split by [`split_csv`] /
//! [`split_years`].

use econ_pulse_aggregate_models::StdDevMode;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error envelope for non-2xx responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable error description.
    pub error: String,
}

/// A COICOP category entry for selection UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCoicopEntry {
    /// COICOP division code.
    pub code: String,
    /// Display label.
    pub label: String,
}

/// Query parameters for endpoints that take a country list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountriesParams {
    /// Comma-separated country display names.
    pub countries: Option<String>,
}

/// Query parameters for the stability ranking endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityParams {
    /// Standard deviation definition (`population` or `sample`).
    pub mode: Option<StdDevMode>,
    /// How many ranked countries to return.
    pub top_n: Option<usize>,
    /// Lower bound of the latest-population filter.
    pub population_min: Option<f64>,
    /// Upper bound of the latest-population filter.
    pub population_max: Option<f64>,
}

/// Query parameters for the categorical CPI endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryParams {
    /// Comma-separated country display names (at most two).
    pub countries: Option<String>,
    /// Comma-separated COICOP codes; all loaded categories when absent.
    pub categories: Option<String>,
}

/// Query parameters for the NHA endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NhaParams {
    /// Indicator name for trends and bars.
    pub indicator: String,
    /// Comma-separated country display names.
    pub countries: Option<String>,
    /// Second indicator; enables the two-indicator scatter.
    pub second_indicator: Option<String>,
    /// Snapshot year for the by-country bars; latest when absent.
    pub year: Option<i32>,
}

/// Query parameters for the population overview endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationParams {
    /// Comma-separated country display names for the trend lines.
    pub countries: Option<String>,
    /// Comma-separated countries to exclude from overview charts.
    pub exclude: Option<String>,
    /// Snapshot year; latest available when absent.
    pub year: Option<i32>,
    /// How many countries the top/growth bars show.
    pub top_n: Option<usize>,
    /// Fold shares below this percentage into `"Other"`.
    pub share_threshold_pct: Option<f64>,
    /// Drop density outliers beyond this many IQRs.
    pub iqr_multiplier: Option<f64>,
}

/// Query parameters for the population projection endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParams {
    /// Country to project.
    pub country: String,
    /// Comma-separated future years.
    pub future_years: Option<String>,
    /// Comma-separated backcast years.
    pub backcast_years: Option<String>,
}

/// Splits a comma-separated parameter into trimmed, non-empty values.
#[must_use]
pub fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map_or_else(Vec::new, |s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}

/// Splits a comma-separated year list, dropping unparseable entries.
#[must_use]
pub fn split_years(raw: Option<&str>) -> Vec<i32> {
    raw.map_or_else(Vec::new, |s| {
        s.split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(
            split_csv(Some("Portugal, Spain ,,")),
            vec!["Portugal".to_string(), "Spain".to_string()]
        );
        assert!(split_csv(None).is_empty());
    }

    #[test]
    fn split_years_drops_garbage() {
        assert_eq!(split_years(Some("2030, 2035, soon")), vec![2030, 2035]);
        assert!(split_years(None).is_empty());
    }
}
