//! Aggregate CPI page: multi-country CPI lines, YoY change, and the
//! stability ranking.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use econ_pulse_aggregate::stability::{restrict_to_population_range, stability_rank};
use econ_pulse_aggregate::yoy::yoy_change;
use econ_pulse_aggregate::{align, reshape};
use econ_pulse_aggregate_models::{StabilityRanking, StdDevMode, YoySeries};
use econ_pulse_dataset::store::Datasets;
use econ_pulse_metric_models::Period;
use serde::{Deserialize, Serialize};

use crate::{ChartPoint, CountryLine, DashboardError};

/// Selection state of the aggregate CPI page.
#[derive(Debug, Clone)]
pub struct CpiSelection {
    /// Countries to draw CPI and YoY lines for.
    pub countries: BTreeSet<String>,
    /// Standard deviation definition for the stability ranking.
    pub mode: StdDevMode,
    /// How many countries the stability bar chart shows.
    pub top_n: usize,
    /// Restrict the stability universe to countries whose latest
    /// population falls in this range.
    pub population_range: Option<RangeInclusive<f64>>,
}

impl Default for CpiSelection {
    fn default() -> Self {
        Self {
            countries: BTreeSet::new(),
            mode: StdDevMode::Population,
            top_n: 10,
            population_range: None,
        }
    }
}

/// Rendered aggregate CPI page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpiView {
    /// CPI level lines for the selected countries.
    pub lines: Vec<CountryLine>,
    /// YoY change per selected country, with indeterminate periods.
    pub yoy: Vec<YoySeries>,
    /// Stability ranking over the (optionally population-restricted)
    /// country universe, truncated to the selected top-N.
    pub stability: StabilityRanking,
}

/// One row of the per-country CPI detail table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpiDetailRow {
    /// Calendar period.
    pub period: Period,
    /// CPI level.
    pub value: f64,
    /// YoY change, where defined.
    pub yoy_percent: Option<f64>,
    /// Population of the period's year, where known.
    pub population: Option<f64>,
}

/// Renders the aggregate CPI page.
///
/// The stability ranking always covers the full country universe (not
/// just the charted selection), mirroring how the dashboard juxtaposes a
/// few focus countries against a global ranking.
///
/// # Errors
///
/// Returns [`DashboardError`] if a selected country is absent from the
/// CPI data.
pub fn render_cpi(datasets: &Datasets, selection: &CpiSelection) -> Result<CpiView, DashboardError> {
    let aligned = align(&datasets.cpi_aggregate, &selection.countries)?;

    let lines = aligned
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

    let yoy = aligned.values().map(|series| yoy_change(series)).collect();

    let universe = selection.population_range.as_ref().map_or_else(
        || datasets.cpi_aggregate.clone(),
        |range| restrict_to_population_range(&datasets.cpi_aggregate, &datasets.population, range),
    );
    let mut stability = stability_rank(&universe, selection.mode);
    stability.ranked.truncate(selection.top_n);

    Ok(CpiView {
        lines,
        yoy,
        stability,
    })
}

/// Builds the detail table for one country: CPI level, YoY change, and
/// the year's population side by side.
///
/// # Errors
///
/// Returns [`DashboardError`] if the country is absent from the CPI data.
pub fn country_detail(
    datasets: &Datasets,
    country: &str,
) -> Result<Vec<CpiDetailRow>, DashboardError> {
    let requested = BTreeSet::from([country.to_string()]);
    let aligned = align(&datasets.cpi_aggregate, &requested)?;

    // align guarantees the country is present.
    let Some(series) = aligned.get(country) else {
        return Ok(Vec::new());
    };

    let yoy = yoy_change(series);
    let population = datasets.population.get(country);

    let rows = series
        .points()
        .iter()
        .map(|p| CpiDetailRow {
            period: p.period,
            value: p.value,
            yoy_percent: yoy
                .points
                .iter()
                .find(|y| y.period == p.period)
                .map(|y| y.percent),
            population: population.and_then(|pop| pop.value_at(Period::Year(p.period.year()))),
        })
        .collect();

    Ok(rows)
}

/// All countries present in the aggregate CPI data, for selection UIs.
#[must_use]
pub fn available_countries(datasets: &Datasets) -> Vec<String> {
    datasets.cpi_aggregate.keys().cloned().collect()
}

/// Latest quarter shared by every selected country's CPI series.
#[must_use]
pub fn latest_common_quarter(datasets: &Datasets, countries: &BTreeSet<String>) -> Option<Period> {
    let series: Vec<_> = countries
        .iter()
        .filter_map(|c| datasets.cpi_aggregate.get(c))
        .collect();
    reshape::latest_shared_period(series.into_iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use econ_pulse_aggregate::AggregateError;
    use econ_pulse_metric_models::{DataPoint, Series};
    use std::collections::BTreeMap;

    fn quarterly(country: &str, values: &[(i32, u8, f64)]) -> Series {
        let points = values
            .iter()
            .map(|&(year, q, value)| DataPoint {
                period: Period::quarter(year, q).unwrap(),
                value,
            })
            .collect();
        Series::new(country, points).unwrap()
    }

    fn datasets() -> Datasets {
        let mut cpi = BTreeMap::new();
        cpi.insert(
            "Portugal".to_string(),
            quarterly(
                "Portugal",
                &[(2020, 1, 100.0), (2021, 1, 105.0), (2022, 1, 110.0)],
            ),
        );
        cpi.insert(
            "Spain".to_string(),
            quarterly(
                "Spain",
                &[
                    (2020, 1, 100.0),
                    (2020, 2, 100.0),
                    (2021, 1, 103.0),
                    (2021, 2, 104.0),
                ],
            ),
        );

        Datasets {
            cpi_aggregate: cpi,
            ..Datasets::default()
        }
    }

    #[test]
    fn renders_lines_and_yoy_for_selection() {
        let data = datasets();
        let selection = CpiSelection {
            countries: BTreeSet::from(["Portugal".to_string()]),
            ..CpiSelection::default()
        };

        let view = render_cpi(&data, &selection).unwrap();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].country, "Portugal");
        assert_eq!(view.lines[0].points.len(), 3);

        assert_eq!(view.yoy.len(), 1);
        assert_eq!(view.yoy[0].points.len(), 2);
        assert!((view.yoy[0].points[0].percent - 5.0).abs() < 1e-10);
    }

    #[test]
    fn unknown_selection_country_is_an_error() {
        let data = datasets();
        let selection = CpiSelection {
            countries: BTreeSet::from(["Atlantis".to_string()]),
            ..CpiSelection::default()
        };

        let err = render_cpi(&data, &selection).unwrap_err();
        assert_eq!(
            err,
            DashboardError::Aggregate(AggregateError::UnknownCountry {
                countries: vec!["Atlantis".to_string()]
            })
        );
    }

    #[test]
    fn stability_covers_full_universe_not_just_selection() {
        let data = datasets();
        let selection = CpiSelection {
            countries: BTreeSet::from(["Portugal".to_string()]),
            ..CpiSelection::default()
        };

        let view = render_cpi(&data, &selection).unwrap();
        // Spain has two YoY points and is ranked even though unselected.
        assert!(view.stability.ranked.iter().any(|s| s.country == "Spain"));
        // Portugal has two YoY points as well (2021Q1, 2022Q1).
        assert!(view.stability.ranked.iter().any(|s| s.country == "Portugal"));
    }

    #[test]
    fn detail_rows_carry_yoy_where_defined() {
        let data = datasets();
        let rows = country_detail(&data, "Portugal").unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].yoy_percent, None);
        assert!(rows[1].yoy_percent.is_some());
    }
}
