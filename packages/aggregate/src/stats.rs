//! Small statistical helpers shared by the aggregation operations.

use econ_pulse_aggregate_models::StdDevMode;

/// Standard deviation of `values` under the given mode.
///
/// Returns `None` for fewer than 2 values — a deviation of a single point
/// is meaningless and must not be reported as zero.
#[must_use]
pub fn std_dev(values: &[f64], mode: StdDevMode) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = n as f64;
    let mean = values.iter().sum::<f64>() / count;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();

    let divisor = match mode {
        StdDevMode::Population => count,
        StdDevMode::Sample => count - 1.0,
    };

    Some((sum_sq / divisor).sqrt())
}

/// Linearly interpolated quantile of pre-sorted values, `q` in `[0, 1]`.
///
/// Uses the linear interpolation convention shared by the common
/// dataframe libraries.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    #[allow(clippy::cast_precision_loss)]
    let rank = q * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - rank.floor();

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Filters values outside `[Q1 - multiplier*IQR, Q3 + multiplier*IQR]`.
///
/// Returns the kept values in their original order plus the number of
/// values removed. Inputs with fewer than 4 points pass through
/// unfiltered — quartiles are not meaningful below that.
#[must_use]
pub fn iqr_filter(values: &[f64], multiplier: f64) -> (Vec<f64>, usize) {
    if values.len() < 4 {
        return (values.to_vec(), 0);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let Some(q1) = quantile_sorted(&sorted, 0.25) else {
        return (values.to_vec(), 0);
    };
    let Some(q3) = quantile_sorted(&sorted, 0.75) else {
        return (values.to_vec(), 0);
    };

    let iqr = q3 - q1;
    let lower = multiplier.mul_add(-iqr, q1);
    let upper = multiplier.mul_add(iqr, q3);

    let kept: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| (lower..=upper).contains(v))
        .collect();
    let removed = values.len() - kept.len();

    (kept, removed)
}
