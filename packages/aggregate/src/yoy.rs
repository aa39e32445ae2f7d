//! Year-over-year percentage change.

use econ_pulse_aggregate_models::{YoyPoint, YoySeries};
use econ_pulse_metric_models::Series;

/// Computes the year-over-year percentage change for a series.
///
/// For each observation at period *p*, the observation at the same
/// calendar position one year earlier is looked up exactly — same quarter
/// for quarterly data, previous year for annual data. Periods without a
/// prior-year observation are skipped (no interpolation, no forward-fill).
/// Periods whose prior-year value is zero are reported in the result's
/// `indeterminate` list instead of producing ±inf or NaN.
#[must_use]
pub fn yoy_change(series: &Series) -> YoySeries {
    let mut points = Vec::new();
    let mut indeterminate = Vec::new();

    for point in series.points() {
        let Some(prior) = series.value_at(point.period.prior_year()) else {
            continue;
        };

        if prior == 0.0 {
            indeterminate.push(point.period);
            continue;
        }

        points.push(YoyPoint {
            period: point.period,
            percent: (point.value - prior) / prior * 100.0,
        });
    }

    YoySeries {
        country: series.country().to_string(),
        points,
        indeterminate,
    }
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

    #[test]
    fn computes_change_against_same_quarter_prior_year() {
        let series = quarterly(
            "Portugal",
            &[(2020, 1, 100.0), (2021, 1, 105.0), (2022, 1, 110.0)],
        );

        let yoy = yoy_change(&series);
        assert_eq!(yoy.points.len(), 2);
        assert_eq!(yoy.points[0].period, Period::quarter(2021, 1).unwrap());
        assert!((yoy.points[0].percent - 5.0).abs() < 1e-10);
        assert_eq!(yoy.points[1].period, Period::quarter(2022, 1).unwrap());
        assert!((yoy.points[1].percent - 100.0 * 5.0 / 105.0).abs() < 1e-10);
        assert!(yoy.indeterminate.is_empty());
    }

    #[test]
    fn skips_periods_without_prior_year() {
        // Q2 2021 has no Q2 2020 counterpart and must not be interpolated.
        let series = quarterly("Portugal", &[(2020, 1, 100.0), (2021, 2, 104.0)]);

        let yoy = yoy_change(&series);
        assert!(yoy.points.is_empty());
        assert!(yoy.indeterminate.is_empty());
    }

    #[test]
    fn no_prior_year_anywhere_yields_empty_sequence() {
        let series = quarterly("Portugal", &[(2020, 1, 100.0), (2020, 2, 101.0)]);
        let yoy = yoy_change(&series);
        assert!(yoy.points.is_empty());
    }

    #[test]
    fn zero_prior_value_is_flagged_indeterminate() {
        let series = quarterly("Portugal", &[(2020, 1, 0.0), (2021, 1, 50.0)]);

        let yoy = yoy_change(&series);
        assert!(yoy.points.is_empty());
        assert_eq!(yoy.indeterminate, vec![Period::quarter(2021, 1).unwrap()]);
    }

    #[test]
    fn annual_series_uses_previous_year() {
        let points = vec![
            DataPoint {
                period: Period::Year(2020),
                value: 200.0,
            },
            DataPoint {
                period: Period::Year(2021),
                value: 210.0,
            },
        ];
        let series = Series::new("Portugal", points).unwrap();

        let yoy = yoy_change(&series);
        assert_eq!(yoy.points.len(), 1);
        assert_eq!(yoy.points[0].period, Period::Year(2021));
        assert!((yoy.points[0].percent - 5.0).abs() < 1e-10);
    }
}
