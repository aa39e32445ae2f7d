#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived-result types for the econ-pulse metric aggregator.
//!
//! Everything the aggregator produces is plain serializable data: YoY
//! series with their indeterminate-period annotations, stability rankings
//! with per-country exclusion reports, annual aggregation points, and
//! population projections. Presentation stays in the frontend; these
//! types carry no rendering concerns.

use econ_pulse_metric_models::Period;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One year-over-year percentage-change point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoyPoint {
    /// Period the change is reported for.
    pub period: Period,
    /// Percentage change against the same calendar position one year
    /// earlier.
    pub percent: f64,
}

/// Year-over-year change series for one country.
///
/// Periods without a prior-year observation are simply absent. Periods
/// whose prior-year value was zero are listed in `indeterminate` — the
/// change exists but cannot be expressed as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoySeries {
    /// Country display name.
    pub country: String,
    /// Defined YoY points, ordered by period.
    pub points: Vec<YoyPoint>,
    /// Periods where the prior-year value was zero (division undefined).
    pub indeterminate: Vec<Period>,
}

/// Which standard deviation definition a stability ranking uses.
///
/// The statistical definition is deliberately configurable: the source
/// material never pinned it down, and the two conventions disagree for
/// small samples.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StdDevMode {
    /// Divide by N (population standard deviation). The default.
    Population,
    /// Divide by N-1 (sample standard deviation, pandas-style).
    Sample,
}

/// Stability score for one country: standard deviation of its YoY
/// percentage changes. Lower = more stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityScore {
    /// Country display name.
    pub country: String,
    /// Standard deviation of the defined YoY percentages.
    pub score: f64,
    /// Number of YoY points the score was computed from.
    pub yoy_points: usize,
}

/// A country excluded from a stability ranking for lack of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsufficientData {
    /// Country display name.
    pub country: String,
    /// How many valid YoY points the country had (always < 2).
    pub yoy_points: usize,
}

/// Result of ranking countries by CPI stability.
///
/// `ranked` is sorted ascending by score; countries with fewer than two
/// valid YoY points are reported in `insufficient`, never silently
/// dropped and never assigned a fake score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityRanking {
    /// Scored countries, most stable first.
    pub ranked: Vec<StabilityScore>,
    /// Countries excluded for having fewer than two YoY points.
    pub insufficient: Vec<InsufficientData>,
    /// Which standard deviation definition produced the scores.
    pub mode: StdDevMode,
}

/// Annual mean of a (typically quarterly) series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualPoint {
    /// Calendar year.
    pub year: i32,
    /// Mean of the observed values within the year.
    pub mean: f64,
}

/// One point of an inner join of two annual sequences on year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedPoint {
    /// Calendar year both sides observed.
    pub year: i32,
    /// Value from the left sequence.
    pub x: f64,
    /// Value from the right sequence.
    pub y: f64,
}

/// Provenance of a point in a population projection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ProjectionKind {
    /// An observed historical value.
    #[strum(serialize = "Historical")]
    Historical,
    /// Compound-growth projection forward from the latest observation.
    #[strum(serialize = "Projected (Future)")]
    ProjectedFuture,
    /// Compound-growth backcast from the earliest observation.
    #[strum(serialize = "Projected (Past)")]
    ProjectedPast,
}

/// One historical or projected population value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPoint {
    /// Calendar year.
    pub year: i32,
    /// Observed or projected population.
    pub population: f64,
    /// Whether the point is observed or projected, and in which direction.
    pub kind: ProjectionKind,
}

/// Result of projecting a population series forward and backward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionOutcome {
    /// Historical and projected points, ordered by year.
    pub points: Vec<ProjectedPoint>,
    /// Backcast years that were requested but are indeterminate because
    /// the growth rate is exactly -100 %.
    pub indeterminate_years: Vec<i32>,
}

/// A country's share of a total, for pie-style breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSlice {
    /// Country display name, or `"Other Countries"` for the folded rest.
    pub country: String,
    /// Share of the total, in percent.
    pub share_pct: f64,
    /// Absolute value behind the share.
    pub value: f64,
}

/// A (country, value) pair used for top-N orderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedValue {
    /// Country display name.
    pub country: String,
    /// Value the ranking ordered by.
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_dev_mode_parses_snake_case() {
        assert_eq!("population".parse(), Ok(StdDevMode::Population));
        assert_eq!("sample".parse(), Ok(StdDevMode::Sample));
        assert!("stddev".parse::<StdDevMode>().is_err());
    }

    #[test]
    fn projection_kind_display_labels() {
        assert_eq!(ProjectionKind::Historical.to_string(), "Historical");
        assert_eq!(
            ProjectionKind::ProjectedFuture.to_string(),
            "Projected (Future)"
        );
        assert_eq!(ProjectionKind::ProjectedPast.to_string(), "Projected (Past)");
    }
}
