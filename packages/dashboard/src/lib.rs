#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart view-model composition for the econ-pulse dashboard.
//!
//! Every chart on the dashboard maps to an explicit request/response
//! function: the UI layer calls [`render`] (or a page-level `render_*`
//! function) with the current selection whenever the selection changes,
//! and gets back a plain serializable view model. No implicit rerun
//! semantics, no hidden state: the datasets go in, the chart data comes
//! out.

pub mod categories;
pub mod cpi;
pub mod nha;
pub mod population;

use chrono::NaiveDate;
use econ_pulse_aggregate::AggregateError;
use econ_pulse_dataset::store::Datasets;
use econ_pulse_metric_models::Period;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while composing a view model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// A requested country is absent from the source data.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// The requested NHA indicator does not exist in the loaded data.
    #[error("unknown indicator: {name}")]
    UnknownIndicator {
        /// The indicator name that was requested.
        name: String,
    },

    /// More countries were requested than the comparison view supports.
    #[error("at most {max} countries can be compared; {requested} requested")]
    TooManyCountries {
        /// Maximum supported by the view.
        max: usize,
        /// How many were requested.
        requested: usize,
    },
}

/// One chartable point: the period, its calendar date for the x-axis,
/// and the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Calendar period of the point.
    pub period: Period,
    /// First day of the period, for date axes. `None` only for years
    /// outside chrono's range.
    pub date: Option<NaiveDate>,
    /// Observed value.
    pub value: f64,
}

impl ChartPoint {
    /// Builds a chart point from a period and value.
    #[must_use]
    pub fn new(period: Period, value: f64) -> Self {
        Self {
            period,
            date: period.first_day(),
            value,
        }
    }
}

/// One country's line on a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryLine {
    /// Country display name.
    pub country: String,
    /// Ordered points.
    pub points: Vec<ChartPoint>,
}

/// A dashboard page selection, one variant per page.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Aggregate CPI page.
    Cpi(cpi::CpiSelection),
    /// Categorical CPI page.
    Categories(categories::CategorySelection),
    /// NHA indicators page.
    Nha(nha::NhaSelection),
    /// Population page.
    Population(population::PopulationSelection),
}

/// A rendered page view model, one variant per page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "page")]
pub enum ViewModel {
    /// Aggregate CPI page.
    Cpi(cpi::CpiView),
    /// Categorical CPI page.
    Categories(categories::CategoryView),
    /// NHA indicators page.
    Nha(nha::NhaView),
    /// Population page.
    Population(population::PopulationView),
}

/// Renders the view model for a page selection.
///
/// # Errors
///
/// Returns [`DashboardError`] for unknown countries or indicators and for
/// selections the target view cannot represent.
pub fn render(datasets: &Datasets, selection: &Selection) -> Result<ViewModel, DashboardError> {
    match selection {
        Selection::Cpi(s) => cpi::render_cpi(datasets, s).map(ViewModel::Cpi),
        Selection::Categories(s) => {
            categories::render_categories(datasets, s).map(ViewModel::Categories)
        }
        Selection::Nha(s) => nha::render_nha(datasets, s).map(ViewModel::Nha),
        Selection::Population(s) => {
            population::render_population(datasets, s).map(ViewModel::Population)
        }
    }
}
