#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Canonical observation, series, and period types for econ-pulse.
//!
//! This crate defines the shared data model every other package works
//! against: a [`Period`] (year or quarter), a [`Metric`] identifying which
//! dataset a value belongs to, and an ordered [`Series`] of observations
//! for one (country, metric) pair. All higher-level aggregation operates
//! on these types and never sees raw CSV rows.

pub mod coicop;
pub mod period;

pub use coicop::CoicopCategory;
pub use period::Period;

use serde::{Deserialize, Serialize};

/// Identifies which dataset a value belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// Aggregate (all-items) consumer price index, quarterly.
    CpiAggregate,
    /// Per-category consumer price index, keyed by raw COICOP code.
    CpiCategory(String),
    /// National Health Accounts indicator, keyed by indicator name.
    NhaIndicator(String),
    /// Annual population.
    Population,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CpiAggregate => write!(f, "CPI"),
            Self::CpiCategory(code) => write!(f, "CPI/{code}"),
            Self::NhaIndicator(name) => write!(f, "NHA/{name}"),
            Self::Population => write!(f, "Population"),
        }
    }
}

/// A single loaded observation: one value for one country at one period.
///
/// Immutable once loaded; uniquely identified by (country, period) within
/// the metric it was loaded under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Country display name.
    pub country: String,
    /// Calendar period of the observation.
    pub period: Period,
    /// Observed value.
    pub value: f64,
}

/// One (period, value) point within a [`Series`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Calendar period of the point.
    pub period: Period,
    /// Observed value.
    pub value: f64,
}

/// Ordered observations for one (country, metric) pair.
///
/// Invariant: periods strictly increasing, no duplicates. Enforced at
/// construction — [`Series::new`] sorts its input and rejects duplicate
/// periods, so consumers can rely on ordering without re-checking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    country: String,
    points: Vec<DataPoint>,
}

impl Series {
    /// Builds a series from unordered points, sorting by period.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicatePeriodError`] if two points share a period. The
    /// loader is responsible for resolving duplicate source rows before a
    /// series is constructed.
    pub fn new(
        country: impl Into<String>,
        mut points: Vec<DataPoint>,
    ) -> Result<Self, DuplicatePeriodError> {
        let country = country.into();
        points.sort_by(|a, b| a.period.cmp(&b.period));

        if let Some(dup) = points.windows(2).find(|w| w[0].period == w[1].period) {
            return Err(DuplicatePeriodError {
                country,
                period: dup[0].period,
            });
        }

        Ok(Self { country, points })
    }

    /// Country display name this series belongs to.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// The ordered points of this series.
    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Looks up the value at an exact period, if observed.
    #[must_use]
    pub fn value_at(&self, period: Period) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.period.cmp(&period))
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// The earliest point, if any.
    #[must_use]
    pub fn first(&self) -> Option<DataPoint> {
        self.points.first().copied()
    }

    /// The latest point, if any.
    #[must_use]
    pub fn last(&self) -> Option<DataPoint> {
        self.points.last().copied()
    }
}

/// Error returned when constructing a [`Series`] from points that share a
/// period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePeriodError {
    /// Country of the offending series.
    pub country: String,
    /// The duplicated period.
    pub period: Period,
}

impl std::fmt::Display for DuplicatePeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "duplicate period {} in series for {}",
            self.period, self.country
        )
    }
}

impl std::error::Error for DuplicatePeriodError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter(year: i32, q: u8) -> Period {
        Period::quarter(year, q).unwrap()
    }

    #[test]
    fn series_sorts_points_by_period() {
        let series = Series::new(
            "Portugal",
            vec![
                DataPoint {
                    period: quarter(2021, 1),
                    value: 105.0,
                },
                DataPoint {
                    period: quarter(2020, 1),
                    value: 100.0,
                },
            ],
        )
        .unwrap();

        assert_eq!(series.points()[0].period, quarter(2020, 1));
        assert_eq!(series.points()[1].period, quarter(2021, 1));
    }

    #[test]
    fn series_rejects_duplicate_periods() {
        let err = Series::new(
            "Portugal",
            vec![
                DataPoint {
                    period: quarter(2020, 1),
                    value: 100.0,
                },
                DataPoint {
                    period: quarter(2020, 1),
                    value: 101.0,
                },
            ],
        )
        .unwrap_err();

        assert_eq!(err.period, quarter(2020, 1));
        assert_eq!(err.country, "Portugal");
    }

    #[test]
    fn value_at_finds_exact_period_only() {
        let series = Series::new(
            "Portugal",
            vec![
                DataPoint {
                    period: quarter(2020, 1),
                    value: 100.0,
                },
                DataPoint {
                    period: quarter(2021, 1),
                    value: 105.0,
                },
            ],
        )
        .unwrap();

        assert_eq!(series.value_at(quarter(2020, 1)), Some(100.0));
        assert_eq!(series.value_at(quarter(2020, 2)), None);
    }

    #[test]
    fn empty_series_is_valid() {
        let series = Series::new("Portugal", Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.first(), None);
        assert_eq!(series.last(), None);
    }

    #[test]
    fn metric_display_forms() {
        assert_eq!(Metric::CpiAggregate.to_string(), "CPI");
        assert_eq!(Metric::CpiCategory("CP01".into()).to_string(), "CPI/CP01");
        assert_eq!(Metric::Population.to_string(), "Population");
    }
}
