//! NHA indicators page: expenditure trends, two-indicator scatter, and
//! the by-country snapshot for one year.

use std::collections::BTreeSet;

use econ_pulse_aggregate::reshape::{annual_means, join_years};
use econ_pulse_aggregate_models::{JoinedPoint, RankedValue};
use econ_pulse_dataset::store::Datasets;
use econ_pulse_metric_models::{Metric, Period};
use serde::{Deserialize, Serialize};

use crate::{ChartPoint, CountryLine, DashboardError};

/// Selection state of the NHA indicators page.
#[derive(Debug, Clone, Default)]
pub struct NhaSelection {
    /// Indicator for the trend lines and the by-country bars.
    pub indicator: String,
    /// Countries to draw trend lines for.
    pub countries: BTreeSet<String>,
    /// Second indicator; set to also render the two-indicator scatter
    /// (x = `indicator`, y = `second_indicator`).
    pub second_indicator: Option<String>,
    /// Year of the by-country snapshot; latest available when unset.
    pub year: Option<i32>,
}

/// One country's path across the two-indicator scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSeries {
    /// Country display name.
    pub country: String,
    /// (year, x, y) points for years both indicators observed.
    pub points: Vec<JoinedPoint>,
}

/// Rendered NHA indicators page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NhaView {
    /// Indicator the view was built for.
    pub indicator: String,
    /// Trend lines per selected country.
    pub trend: Vec<CountryLine>,
    /// Two-indicator scatter, when a second indicator was selected.
    pub scatter: Option<Vec<ScatterSeries>>,
    /// Year the by-country bars snapshot.
    pub snapshot_year: Option<i32>,
    /// Indicator value per country in the snapshot year, descending.
    pub by_country: Vec<RankedValue>,
}

/// Renders the NHA indicators page.
///
/// Selected countries without data for the indicator contribute no line;
/// the health-accounts data is sparse and partial results are expected.
///
/// # Errors
///
/// Returns [`DashboardError::UnknownIndicator`] if an indicator is not in
/// the loaded data.
pub fn render_nha(datasets: &Datasets, selection: &NhaSelection) -> Result<NhaView, DashboardError> {
    let by_country = datasets
        .series_for(&Metric::NhaIndicator(selection.indicator.clone()))
        .ok_or_else(|| DashboardError::UnknownIndicator {
            name: selection.indicator.clone(),
        })?;

    let trend = selection
        .countries
        .iter()
        .filter_map(|country| {
            by_country.get(country).map(|series| CountryLine {
                country: country.clone(),
                points: series
                    .points()
                    .iter()
                    .map(|p| ChartPoint::new(p.period, p.value))
                    .collect(),
            })
        })
        .collect();

    let scatter = match &selection.second_indicator {
        Some(second) => {
            let second_by_country = datasets
                .series_for(&Metric::NhaIndicator(second.clone()))
                .ok_or_else(|| DashboardError::UnknownIndicator {
                    name: second.clone(),
                })?;

            let series = selection
                .countries
                .iter()
                .filter_map(|country| {
                    let x = by_country.get(country)?;
                    let y = second_by_country.get(country)?;
                    let points = join_years(&annual_means(x), &annual_means(y));
                    (!points.is_empty()).then(|| ScatterSeries {
                        country: country.clone(),
                        points,
                    })
                })
                .collect();
            Some(series)
        }
        None => None,
    };

    let snapshot_year = selection.year.or_else(|| {
        by_country
            .values()
            .filter_map(|series| series.last().map(|p| p.period.year()))
            .max()
    });

    let by_country_bars = snapshot_year.map_or_else(Vec::new, |year| {
        let mut bars: Vec<RankedValue> = by_country
            .iter()
            .filter_map(|(country, series)| {
                series.value_at(Period::Year(year)).map(|value| RankedValue {
                    country: country.clone(),
                    value,
                })
            })
            .collect();
        bars.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.country.cmp(&b.country))
        });
        bars
    });

    Ok(NhaView {
        indicator: selection.indicator.clone(),
        trend,
        scatter,
        snapshot_year,
        by_country: by_country_bars,
    })
}

/// All indicators present in the loaded data, for selection UIs.
#[must_use]
pub fn available_indicators(datasets: &Datasets) -> Vec<String> {
    datasets.nha.keys().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use econ_pulse_metric_models::{DataPoint, Series};
    use std::collections::BTreeMap;

    const CHE_GDP: &str = "Current health expenditure (CHE) as percentage of GDP";
    const CHE_CAPITA: &str = "Current health expenditure (CHE) per capita";

    fn annual(country: &str, values: &[(i32, f64)]) -> Series {
        let points = values
            .iter()
            .map(|&(year, value)| DataPoint {
                period: Period::Year(year),
                value,
            })
            .collect();
        Series::new(country, points).unwrap()
    }

    fn datasets() -> Datasets {
        let mut nha: BTreeMap<String, BTreeMap<String, Series>> = BTreeMap::new();

        let mut gdp = BTreeMap::new();
        gdp.insert(
            "Portugal".to_string(),
            annual("Portugal", &[(2019, 9.5), (2020, 10.5), (2021, 10.9)]),
        );
        gdp.insert("Spain".to_string(), annual("Spain", &[(2020, 9.7)]));
        nha.insert(CHE_GDP.to_string(), gdp);

        let mut capita = BTreeMap::new();
        capita.insert(
            "Portugal".to_string(),
            annual("Portugal", &[(2020, 2300.0), (2021, 2450.0)]),
        );
        nha.insert(CHE_CAPITA.to_string(), capita);

        Datasets {
            nha,
            ..Datasets::default()
        }
    }

    #[test]
    fn trend_lines_for_selected_countries() {
        let data = datasets();
        let selection = NhaSelection {
            indicator: CHE_GDP.to_string(),
            countries: BTreeSet::from(["Portugal".to_string(), "Spain".to_string()]),
            ..NhaSelection::default()
        };

        let view = render_nha(&data, &selection).unwrap();
        assert_eq!(view.trend.len(), 2);
    }

    #[test]
    fn unknown_indicator_is_an_error() {
        let data = datasets();
        let selection = NhaSelection {
            indicator: "No such indicator".to_string(),
            ..NhaSelection::default()
        };

        let err = render_nha(&data, &selection).unwrap_err();
        assert_eq!(
            err,
            DashboardError::UnknownIndicator {
                name: "No such indicator".to_string()
            }
        );
    }

    #[test]
    fn scatter_joins_shared_years_per_country() {
        let data = datasets();
        let selection = NhaSelection {
            indicator: CHE_GDP.to_string(),
            countries: BTreeSet::from(["Portugal".to_string(), "Spain".to_string()]),
            second_indicator: Some(CHE_CAPITA.to_string()),
            year: None,
        };

        let view = render_nha(&data, &selection).unwrap();
        let scatter = view.scatter.unwrap();
        // Spain has no per-capita data, so only Portugal appears.
        assert_eq!(scatter.len(), 1);
        assert_eq!(scatter[0].country, "Portugal");
        // Shared years: 2020 and 2021 (2019 only has GDP share).
        assert_eq!(scatter[0].points.len(), 2);
        assert!((scatter[0].points[0].x - 10.5).abs() < 1e-12);
        assert!((scatter[0].points[0].y - 2300.0).abs() < 1e-12);
    }

    #[test]
    fn snapshot_defaults_to_latest_year_and_sorts_descending() {
        let data = datasets();
        let selection = NhaSelection {
            indicator: CHE_GDP.to_string(),
            ..NhaSelection::default()
        };

        let view = render_nha(&data, &selection).unwrap();
        assert_eq!(view.snapshot_year, Some(2021));
        // Only Portugal has a 2021 value.
        assert_eq!(view.by_country.len(), 1);

        let selection_2020 = NhaSelection {
            indicator: CHE_GDP.to_string(),
            year: Some(2020),
            ..NhaSelection::default()
        };
        let view_2020 = render_nha(&data, &selection_2020).unwrap();
        assert_eq!(view_2020.by_country.len(), 2);
        assert_eq!(view_2020.by_country[0].country, "Portugal");
    }
}
