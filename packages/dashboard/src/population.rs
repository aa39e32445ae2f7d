//! Population page: trends, top-N snapshot, density scatter, world
//! share, growth rates, and compound-growth projections.

use std::collections::BTreeSet;

use econ_pulse_aggregate::projection::project_population;
use econ_pulse_aggregate::reshape::{share_with_other, top_n_by_value};
use econ_pulse_aggregate::stats::iqr_filter;
use econ_pulse_aggregate::align;
use econ_pulse_aggregate_models::{ProjectionOutcome, RankedValue, ShareSlice};
use econ_pulse_dataset::store::Datasets;
use econ_pulse_dataset_models::PopulationRecord;
use serde::{Deserialize, Serialize};

use crate::{ChartPoint, CountryLine, DashboardError};

/// Request to project one country's population.
#[derive(Debug, Clone, Default)]
pub struct ProjectionRequest {
    /// Country to project.
    pub country: String,
    /// Future years to project forward to.
    pub future_years: Vec<i32>,
    /// Past years to backcast to.
    pub backcast_years: Vec<i32>,
}

/// Selection state of the population page.
#[derive(Debug, Clone)]
pub struct PopulationSelection {
    /// Countries to draw trend lines for.
    pub countries: BTreeSet<String>,
    /// Countries excluded from every overview chart, e.g. to keep the
    /// largest populations from flattening the axes.
    pub exclude: BTreeSet<String>,
    /// Snapshot year for the overview charts; latest available when
    /// unset.
    pub year: Option<i32>,
    /// How many countries the top-population and growth bars show.
    pub top_n: usize,
    /// Shares below this percentage fold into the `"Other"` slice.
    pub share_threshold_pct: f64,
    /// When set, density values outside this many IQRs are dropped from
    /// the density scatter.
    pub iqr_multiplier: Option<f64>,
    /// Optional projection request.
    pub projection: Option<ProjectionRequest>,
}

impl Default for PopulationSelection {
    fn default() -> Self {
        Self {
            countries: BTreeSet::new(),
            exclude: BTreeSet::new(),
            year: None,
            top_n: 10,
            share_threshold_pct: 1.0,
            iqr_multiplier: None,
            projection: None,
        }
    }
}

/// One point of the density-vs-area scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityPoint {
    /// Country display name.
    pub country: String,
    /// Land area in square kilometres.
    pub area_km2: f64,
    /// Population density per square kilometre.
    pub density: f64,
    /// Population (marker size).
    pub population: f64,
}

/// A rendered population projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionView {
    /// Country the projection covers.
    pub country: String,
    /// Growth rate used, in percent per year.
    pub growth_rate_pct: f64,
    /// Historical and projected points.
    pub outcome: ProjectionOutcome,
}

/// Rendered population page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationView {
    /// Population trend lines for the selected countries.
    pub trends: Vec<CountryLine>,
    /// Year the overview charts snapshot.
    pub snapshot_year: Option<i32>,
    /// Top countries by population in the snapshot year.
    pub top: Vec<RankedValue>,
    /// Density-vs-area scatter for the snapshot year.
    pub density: Vec<DensityPoint>,
    /// Density points dropped by the IQR outlier filter.
    pub density_outliers_removed: usize,
    /// World population share with small countries folded into
    /// `"Other"`.
    pub shares: Vec<ShareSlice>,
    /// Growth rate per country in the snapshot year, descending.
    pub growth: Vec<RankedValue>,
    /// Projection, when requested and a growth rate is known.
    pub projection: Option<ProjectionView>,
}

/// Renders the population page.
///
/// The projection is `None` when none was requested or when the
/// requested country has no reported growth rate to project with.
///
/// # Errors
///
/// Returns [`DashboardError`] if a trend or projection country is absent
/// from the population data.
pub fn render_population(
    datasets: &Datasets,
    selection: &PopulationSelection,
) -> Result<PopulationView, DashboardError> {
    let aligned = align(&datasets.population, &selection.countries)?;
    let trends = aligned
        .iter()
        .map(|(country, series)| CountryLine {
            country: (*country).to_string(),
            points: series
                .points()
                .iter()
                .map(|p| ChartPoint::new(p.period, p.value))
                .collect(),
        })
        .collect();

    let records: Vec<&PopulationRecord> = datasets
        .population_records
        .iter()
        .filter(|r| !selection.exclude.contains(&r.country))
        .collect();

    let snapshot_year = selection
        .year
        .or_else(|| records.iter().map(|r| r.year).max());

    let year_records: Vec<&PopulationRecord> = snapshot_year
        .map(|year| {
            records
                .iter()
                .copied()
                .filter(|r| r.year == year)
                .collect()
        })
        .unwrap_or_default();

    let top = top_n_by_value(
        year_records
            .iter()
            .map(|r| RankedValue {
                country: r.country.clone(),
                value: r.population,
            })
            .collect(),
        selection.top_n,
    );

    let (density, density_outliers_removed) = density_scatter(&year_records, selection);

    let shares = share_with_other(
        &year_records
            .iter()
            .filter_map(|r| {
                r.world_share_pct.map(|share| ShareSlice {
                    country: r.country.clone(),
                    share_pct: share,
                    value: r.population,
                })
            })
            .collect::<Vec<_>>(),
        selection.share_threshold_pct,
    );

    let growth = top_n_by_value(
        year_records
            .iter()
            .filter_map(|r| {
                r.growth_rate.map(|rate| RankedValue {
                    country: r.country.clone(),
                    value: rate,
                })
            })
            .collect(),
        selection.top_n,
    );

    let projection = match &selection.projection {
        Some(request) => render_projection(datasets, request)?,
        None => None,
    };

    Ok(PopulationView {
        trends,
        snapshot_year,
        top,
        density,
        density_outliers_removed,
        shares,
        growth,
        projection,
    })
}

fn density_scatter(
    year_records: &[&PopulationRecord],
    selection: &PopulationSelection,
) -> (Vec<DensityPoint>, usize) {
    let points: Vec<DensityPoint> = year_records
        .iter()
        .filter_map(|r| {
            let area_km2 = r.area_km2?;
            let density = r.density?;
            Some(DensityPoint {
                country: r.country.clone(),
                area_km2,
                density,
                population: r.population,
            })
        })
        .collect();

    let Some(multiplier) = selection.iqr_multiplier else {
        return (points, 0);
    };

    let densities: Vec<f64> = points.iter().map(|p| p.density).collect();
    let (kept, removed) = iqr_filter(&densities, multiplier);
    let filtered = points
        .into_iter()
        .filter(|p| kept.contains(&p.density))
        .collect();

    (filtered, removed)
}

fn render_projection(
    datasets: &Datasets,
    request: &ProjectionRequest,
) -> Result<Option<ProjectionView>, DashboardError> {
    let requested = BTreeSet::from([request.country.clone()]);
    let aligned = align(&datasets.population, &requested)?;
    let Some(series) = aligned.get(request.country.as_str()) else {
        return Ok(None);
    };

    // The latest reported growth rate drives both directions.
    let growth_rate = datasets
        .population_records
        .iter()
        .filter(|r| r.country == request.country && r.growth_rate.is_some())
        .max_by_key(|r| r.year)
        .and_then(|r| r.growth_rate);

    let Some(growth_rate_pct) = growth_rate else {
        return Ok(None);
    };

    let outcome = project_population(
        series,
        growth_rate_pct,
        &request.future_years,
        &request.backcast_years,
    );

    Ok(Some(ProjectionView {
        country: request.country.clone(),
        growth_rate_pct,
        outcome,
    }))
}
