//! Spreadsheet-style reshaping operations.
//!
//! Annual aggregation, year joins, top-N orderings, and share breakdowns
//! that back the comparison charts. Like the rest of the crate these are
//! pure functions over immutable inputs.

use std::collections::BTreeMap;

use econ_pulse_aggregate_models::{AnnualPoint, JoinedPoint, RankedValue, ShareSlice};
use econ_pulse_metric_models::{Period, Series};

/// Label used for the folded remainder in [`share_with_other`].
pub const OTHER_LABEL: &str = "Other Countries";

/// Collapses a series to annual means, ordered by year.
///
/// Quarterly series average their quarters; annual series pass through.
#[must_use]
pub fn annual_means(series: &Series) -> Vec<AnnualPoint> {
    let mut by_year: BTreeMap<i32, (f64, u32)> = BTreeMap::new();

    for point in series.points() {
        let entry = by_year.entry(point.period.year()).or_insert((0.0, 0));
        entry.0 += point.value;
        entry.1 += 1;
    }

    by_year
        .into_iter()
        .map(|(year, (sum, count))| AnnualPoint {
            year,
            mean: sum / f64::from(count),
        })
        .collect()
}

/// Inner join of two annual sequences on year.
///
/// Only years observed on both sides are kept — missing years are
/// dropped, never interpolated.
#[must_use]
pub fn join_years(left: &[AnnualPoint], right: &[AnnualPoint]) -> Vec<JoinedPoint> {
    let right_by_year: BTreeMap<i32, f64> = right.iter().map(|p| (p.year, p.mean)).collect();

    left.iter()
        .filter_map(|p| {
            right_by_year.get(&p.year).map(|&y| JoinedPoint {
                year: p.year,
                x: p.mean,
                y,
            })
        })
        .collect()
}

/// Latest period present in every non-empty input series.
///
/// Used to pick the snapshot quarter for cross-country category
/// comparisons. Returns `None` when no period is shared (or every series
/// is empty).
#[must_use]
pub fn latest_shared_period<'a, I>(series: I) -> Option<Period>
where
    I: IntoIterator<Item = &'a Series>,
{
    let non_empty: Vec<&Series> = series.into_iter().filter(|s| !s.is_empty()).collect();
    let (first, rest) = non_empty.split_first()?;

    first
        .points()
        .iter()
        .rev()
        .map(|p| p.period)
        .find(|period| rest.iter().all(|s| s.value_at(*period).is_some()))
}

/// Sorts descending by value and keeps the first `n` entries.
#[must_use]
pub fn top_n_by_value(mut rows: Vec<RankedValue>, n: usize) -> Vec<RankedValue> {
    rows.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.country.cmp(&b.country))
    });
    rows.truncate(n);
    rows
}

/// Folds slices below `threshold_pct` into a single synthetic
/// [`OTHER_LABEL`] slice.
///
/// Output is ordered descending by share with the folded remainder last.
/// No `"Other"` slice is emitted when nothing falls below the threshold.
#[must_use]
pub fn share_with_other(slices: &[ShareSlice], threshold_pct: f64) -> Vec<ShareSlice> {
    let mut large: Vec<ShareSlice> = slices
        .iter()
        .filter(|s| s.share_pct >= threshold_pct)
        .cloned()
        .collect();
    large.sort_by(|a, b| {
        b.share_pct
            .total_cmp(&a.share_pct)
            .then_with(|| a.country.cmp(&b.country))
    });

    let (other_share, other_value) = slices
        .iter()
        .filter(|s| s.share_pct < threshold_pct)
        .fold((0.0, 0.0), |(share, value), s| {
            (share + s.share_pct, value + s.value)
        });

    if other_share > 0.0 {
        large.push(ShareSlice {
            country: OTHER_LABEL.to_string(),
            share_pct: other_share,
            value: other_value,
        });
    }

    large
}
