//! Categorical CPI page: COICOP category breakdowns for up to two
//! countries, latest-quarter YoY bars, and the single-country heatmap.

use std::collections::BTreeSet;

use econ_pulse_aggregate::reshape::latest_shared_period;
use econ_pulse_aggregate::yoy::yoy_change;
use econ_pulse_dataset::store::Datasets;
use econ_pulse_metric_models::{Period, Series, coicop};
use serde::{Deserialize, Serialize};

use crate::{ChartPoint, DashboardError};

/// The comparison view supports at most this many countries.
pub const MAX_COMPARE_COUNTRIES: usize = 2;

/// Selection state of the categorical CPI page.
#[derive(Debug, Clone, Default)]
pub struct CategorySelection {
    /// Countries to compare (at most [`MAX_COMPARE_COUNTRIES`]).
    pub countries: BTreeSet<String>,
    /// COICOP codes to include; empty means every loaded category.
    pub categories: BTreeSet<String>,
}

/// One (country, category) line of the breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLine {
    /// Country display name.
    pub country: String,
    /// COICOP code.
    pub code: String,
    /// Display label for the category.
    pub label: String,
    /// Ordered points.
    pub points: Vec<ChartPoint>,
}

/// One bar of the latest-quarter YoY comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryYoyBar {
    /// Country display name.
    pub country: String,
    /// COICOP code.
    pub code: String,
    /// Display label for the category.
    pub label: String,
    /// YoY percentage change at the snapshot quarter.
    pub percent: f64,
}

/// Time × category value matrix for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapMatrix {
    /// Country display name.
    pub country: String,
    /// Row labels (categories).
    pub categories: Vec<String>,
    /// Column labels (periods).
    pub periods: Vec<Period>,
    /// `values[row][column]`; `None` where the category has no
    /// observation for the period.
    pub values: Vec<Vec<Option<f64>>>,
}

/// Rendered categorical CPI page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    /// Per (country, category) CPI lines.
    pub breakdown: Vec<CategoryLine>,
    /// Snapshot quarter used for the YoY bars, when one is shared.
    pub yoy_period: Option<Period>,
    /// YoY change per (country, category) at the snapshot quarter.
    pub yoy_bars: Vec<CategoryYoyBar>,
    /// Time × category heatmap; only produced for a single country.
    pub heatmap: Option<HeatmapMatrix>,
}

/// Renders the categorical CPI page.
///
/// Countries without data for a category simply contribute no line —
/// category coverage is sparse in the source data and partial results
/// beat hard failures here.
///
/// # Errors
///
/// Returns [`DashboardError::TooManyCountries`] beyond the two-country
/// comparison limit.
pub fn render_categories(
    datasets: &Datasets,
    selection: &CategorySelection,
) -> Result<CategoryView, DashboardError> {
    if selection.countries.len() > MAX_COMPARE_COUNTRIES {
        return Err(DashboardError::TooManyCountries {
            max: MAX_COMPARE_COUNTRIES,
            requested: selection.countries.len(),
        });
    }

    let codes: Vec<&String> = if selection.categories.is_empty() {
        datasets.cpi_categories.keys().collect()
    } else {
        datasets
            .cpi_categories
            .keys()
            .filter(|code| selection.categories.contains(*code))
            .collect()
    };

    let mut breakdown = Vec::new();
    for code in &codes {
        let Some(by_country) = datasets.cpi_categories.get(*code) else {
            continue;
        };
        for country in &selection.countries {
            if let Some(series) = by_country.get(country) {
                breakdown.push(CategoryLine {
                    country: country.clone(),
                    code: (*code).clone(),
                    label: coicop::display_label(code),
                    points: series
                        .points()
                        .iter()
                        .map(|p| ChartPoint::new(p.period, p.value))
                        .collect(),
                });
            }
        }
    }

    let selected_series: Vec<&Series> = breakdown
        .iter()
        .filter_map(|line| {
            datasets
                .cpi_categories
                .get(&line.code)
                .and_then(|m| m.get(&line.country))
        })
        .collect();
    let yoy_period = latest_shared_period(selected_series);

    let mut yoy_bars = Vec::new();
    if let Some(period) = yoy_period {
        for line in &breakdown {
            let Some(series) = datasets
                .cpi_categories
                .get(&line.code)
                .and_then(|m| m.get(&line.country))
            else {
                continue;
            };
            let yoy = yoy_change(series);
            if let Some(point) = yoy.points.iter().find(|p| p.period == period) {
                yoy_bars.push(CategoryYoyBar {
                    country: line.country.clone(),
                    code: line.code.clone(),
                    label: line.label.clone(),
                    percent: point.percent,
                });
            }
        }
    }

    let heatmap = if selection.countries.len() == 1 {
        selection
            .countries
            .iter()
            .next()
            .map(|country| build_heatmap(datasets, country, &codes))
    } else {
        None
    };

    Ok(CategoryView {
        breakdown,
        yoy_period,
        yoy_bars,
        heatmap,
    })
}

/// Pivots one country's category series into a time × category matrix.
fn build_heatmap(datasets: &Datasets, country: &str, codes: &[&String]) -> HeatmapMatrix {
    let mut periods: BTreeSet<Period> = BTreeSet::new();
    let mut rows: Vec<(&String, &Series)> = Vec::new();

    for code in codes.iter().copied() {
        if let Some(series) = datasets
            .cpi_categories
            .get(code)
            .and_then(|m| m.get(country))
        {
            periods.extend(series.points().iter().map(|p| p.period));
            rows.push((code, series));
        }
    }

    let periods: Vec<Period> = periods.into_iter().collect();
    let values = rows
        .iter()
        .map(|(_, series)| periods.iter().map(|p| series.value_at(*p)).collect())
        .collect();

    HeatmapMatrix {
        country: country.to_string(),
        categories: rows
            .iter()
            .map(|(code, _)| coicop::display_label(code))
            .collect(),
        periods,
        values,
    }
}

/// All COICOP codes present in the loaded data, with display labels.
#[must_use]
pub fn available_categories(datasets: &Datasets) -> Vec<(String, String)> {
    datasets
        .cpi_categories
        .keys()
        .map(|code| (code.clone(), coicop::display_label(code)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use econ_pulse_metric_models::DataPoint;
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
        let mut categories: BTreeMap<String, BTreeMap<String, Series>> = BTreeMap::new();

        let mut food = BTreeMap::new();
        food.insert(
            "Portugal".to_string(),
            quarterly("Portugal", &[(2020, 1, 98.0), (2021, 1, 101.0)]),
        );
        food.insert(
            "Spain".to_string(),
            quarterly("Spain", &[(2020, 1, 97.0), (2021, 1, 99.0)]),
        );
        categories.insert("CP01".to_string(), food);

        let mut transport = BTreeMap::new();
        transport.insert(
            "Portugal".to_string(),
            quarterly("Portugal", &[(2020, 1, 102.0), (2021, 1, 108.0)]),
        );
        categories.insert("CP07".to_string(), transport);

        Datasets {
            cpi_categories: categories,
            ..Datasets::default()
        }
    }

    #[test]
    fn breakdown_covers_selected_countries_and_categories() {
        let data = datasets();
        let selection = CategorySelection {
            countries: BTreeSet::from(["Portugal".to_string(), "Spain".to_string()]),
            categories: BTreeSet::new(),
        };

        let view = render_categories(&data, &selection).unwrap();
        // Portugal has CP01+CP07, Spain only CP01.
        assert_eq!(view.breakdown.len(), 3);
        assert!(view.heatmap.is_none());
    }

    #[test]
    fn more_than_two_countries_is_an_error() {
        let data = datasets();
        let selection = CategorySelection {
            countries: BTreeSet::from(["A".to_string(), "B".to_string(), "C".to_string()]),
            categories: BTreeSet::new(),
        };

        let err = render_categories(&data, &selection).unwrap_err();
        assert_eq!(
            err,
            DashboardError::TooManyCountries {
                max: 2,
                requested: 3
            }
        );
    }

    #[test]
    fn yoy_bars_use_latest_shared_quarter() {
        let data = datasets();
        let selection = CategorySelection {
            countries: BTreeSet::from(["Portugal".to_string()]),
            categories: BTreeSet::new(),
        };

        let view = render_categories(&data, &selection).unwrap();
        assert_eq!(view.yoy_period, Some(Period::quarter(2021, 1).unwrap()));
        assert_eq!(view.yoy_bars.len(), 2);
        let food = view.yoy_bars.iter().find(|b| b.code == "CP01").unwrap();
        assert!((food.percent - 100.0 * 3.0 / 98.0).abs() < 1e-10);
    }

    #[test]
    fn single_country_gets_a_heatmap() {
        let data = datasets();
        let selection = CategorySelection {
            countries: BTreeSet::from(["Portugal".to_string()]),
            categories: BTreeSet::new(),
        };

        let view = render_categories(&data, &selection).unwrap();
        let heatmap = view.heatmap.unwrap();
        assert_eq!(heatmap.categories.len(), 2);
        assert_eq!(heatmap.periods.len(), 2);
        assert_eq!(heatmap.values[0][0], Some(98.0));
    }

    #[test]
    fn category_filter_narrows_the_breakdown() {
        let data = datasets();
        let selection = CategorySelection {
            countries: BTreeSet::from(["Portugal".to_string()]),
            categories: BTreeSet::from(["CP01".to_string()]),
        };

        let view = render_categories(&data, &selection).unwrap();
        assert_eq!(view.breakdown.len(), 1);
        assert_eq!(view.breakdown[0].code, "CP01");
    }
}
