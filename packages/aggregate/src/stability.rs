//! CPI stability ranking.
//!
//! A country's stability score is the standard deviation of its defined
//! year-over-year percentage changes — lower means the price level moved
//! more predictably.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use econ_pulse_aggregate_models::{InsufficientData, StabilityRanking, StabilityScore, StdDevMode};
use econ_pulse_metric_models::Series;

use crate::stats::std_dev;
use crate::yoy::yoy_change;

/// Ranks countries by the standard deviation of their YoY change.
///
/// The output is sorted ascending by score (most stable first), with ties
/// broken by country name so the ranking is deterministic. Countries with
/// fewer than 2 valid YoY points are excluded from the ranked sequence
/// and reported in `insufficient` — they are never assigned a score of
/// zero and never silently dropped. A country with unusable data does not
/// abort the computation for the others.
#[must_use]
pub fn stability_rank(
    series_by_country: &BTreeMap<String, Series>,
    mode: StdDevMode,
) -> StabilityRanking {
    let mut ranked = Vec::new();
    let mut insufficient = Vec::new();

    for (country, series) in series_by_country {
        let yoy = yoy_change(series);
        let percents: Vec<f64> = yoy.points.iter().map(|p| p.percent).collect();

        match std_dev(&percents, mode) {
            Some(score) => ranked.push(StabilityScore {
                country: country.clone(),
                score,
                yoy_points: percents.len(),
            }),
            None => insufficient.push(InsufficientData {
                country: country.clone(),
                yoy_points: percents.len(),
            }),
        }
    }

    ranked.sort_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then_with(|| a.country.cmp(&b.country))
    });

    StabilityRanking {
        ranked,
        insufficient,
        mode,
    }
}

/// Restricts a series map to countries whose latest known population
/// falls within `range`.
///
/// Countries without any population figure are excluded — no figure, no
/// position in the requested range.
#[must_use]
pub fn restrict_to_population_range(
    series_by_country: &BTreeMap<String, Series>,
    population_by_country: &BTreeMap<String, Series>,
    range: &RangeInclusive<f64>,
) -> BTreeMap<String, Series> {
    series_by_country
        .iter()
        .filter(|(country, _)| {
            population_by_country
                .get(*country)
                .and_then(Series::last)
                .is_some_and(|latest| range.contains(&latest.value))
        })
        .map(|(country, series)| (country.clone(), series.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use econ_pulse_metric_models::{DataPoint, Period};

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

    #[test]
    fn ranking_is_sorted_ascending_by_score() {
        let mut map = BTreeMap::new();
        // Steady 5% YoY every quarter: std dev 0.
        map.insert(
            "Steadyland".to_string(),
            quarterly(
                "Steadyland",
                &[
                    (2020, 1, 100.0),
                    (2020, 2, 100.0),
                    (2021, 1, 105.0),
                    (2021, 2, 105.0),
                ],
            ),
        );
        // Swings between 0% and 50% YoY: large std dev.
        map.insert(
            "Volatilia".to_string(),
            quarterly(
                "Volatilia",
                &[
                    (2020, 1, 100.0),
                    (2020, 2, 100.0),
                    (2021, 1, 100.0),
                    (2021, 2, 150.0),
                ],
            ),
        );

        let ranking = stability_rank(&map, StdDevMode::Population);
        assert_eq!(ranking.ranked.len(), 2);
        assert_eq!(ranking.ranked[0].country, "Steadyland");
        assert!(ranking.ranked[0].score < ranking.ranked[1].score);
        assert!(ranking.insufficient.is_empty());
    }

    #[test]
    fn too_few_yoy_points_reported_not_ranked() {
        let mut map = BTreeMap::new();
        // Only one YoY point (2021Q1 vs 2020Q1).
        map.insert(
            "Sparse".to_string(),
            quarterly("Sparse", &[(2020, 1, 100.0), (2021, 1, 105.0)]),
        );

        let ranking = stability_rank(&map, StdDevMode::Population);
        assert!(ranking.ranked.is_empty());
        assert_eq!(
            ranking.insufficient,
            vec![InsufficientData {
                country: "Sparse".to_string(),
                yoy_points: 1,
            }]
        );
    }

    #[test]
    fn bad_country_does_not_abort_the_rest() {
        let mut map = BTreeMap::new();
        map.insert("Empty".to_string(), quarterly("Empty", &[]));
        map.insert(
            "Fine".to_string(),
            quarterly(
                "Fine",
                &[
                    (2020, 1, 100.0),
                    (2020, 2, 100.0),
                    (2021, 1, 102.0),
                    (2021, 2, 103.0),
                ],
            ),
        );

        let ranking = stability_rank(&map, StdDevMode::Population);
        assert_eq!(ranking.ranked.len(), 1);
        assert_eq!(ranking.ranked[0].country, "Fine");
        assert_eq!(ranking.insufficient.len(), 1);
        assert_eq!(ranking.insufficient[0].country, "Empty");
    }

    #[test]
    fn population_range_restricts_the_universe() {
        let mut cpi = BTreeMap::new();
        for country in ["Big", "Small", "Unknown"] {
            cpi.insert(
                country.to_string(),
                quarterly(country, &[(2020, 1, 100.0)]),
            );
        }

        let mut population = BTreeMap::new();
        population.insert(
            "Big".to_string(),
            annual("Big", &[(2020, 80_000_000.0), (2022, 85_000_000.0)]),
        );
        population.insert("Small".to_string(), annual("Small", &[(2022, 500_000.0)]));

        let restricted =
            restrict_to_population_range(&cpi, &population, &(1_000_000.0..=100_000_000.0));
        assert_eq!(restricted.len(), 1);
        assert!(restricted.contains_key("Big"));
    }
}
