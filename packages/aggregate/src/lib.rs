#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure metric aggregation for the econ-pulse dashboard.
//!
//! Every function here is deterministic and side-effect-free: it takes its
//! full input as an argument and returns a fresh result. Recoverable
//! conditions (indeterminate YoY periods, countries with too little data)
//! are returned as data alongside the result rather than as errors, so a
//! single bad country never aborts the computation for the others.

pub mod projection;
pub mod reshape;
pub mod stability;
pub mod stats;
pub mod yoy;

use std::collections::{BTreeMap, BTreeSet};

use econ_pulse_metric_models::Series;
use thiserror::Error;

/// Errors that can occur during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// One or more requested countries are absent from the source data.
    #[error("unknown countries requested: {}", .countries.join(", "))]
    UnknownCountry {
        /// Every requested country missing from the source, sorted.
        countries: Vec<String>,
    },
}

/// Filters a per-country series map down to the requested countries.
///
/// Series are returned unmodified — they are already time-ordered by
/// construction. Countries absent from the source data are reported, not
/// silently dropped.
///
/// # Errors
///
/// Returns [`AggregateError::UnknownCountry`] listing every requested
/// country that is absent from `series_by_country`.
pub fn align<'a>(
    series_by_country: &'a BTreeMap<String, Series>,
    countries: &BTreeSet<String>,
) -> Result<BTreeMap<&'a str, &'a Series>, AggregateError> {
    let missing: Vec<String> = countries
        .iter()
        .filter(|country| !series_by_country.contains_key(*country))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(AggregateError::UnknownCountry { countries: missing });
    }

    Ok(series_by_country
        .iter()
        .filter(|(country, _)| countries.contains(*country))
        .map(|(country, series)| (country.as_str(), series))
        .collect())
}
