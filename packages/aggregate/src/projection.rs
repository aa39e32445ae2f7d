//! Compound-growth population projection.

use econ_pulse_aggregate_models::{ProjectedPoint, ProjectionKind, ProjectionOutcome};
use econ_pulse_metric_models::{Period, Series};

/// Projects an annual population series forward and backward under a
/// constant compound growth rate.
///
/// Historical observations are passed through unchanged. Future years
/// beyond the latest observation are projected as `P0 * (1 + r)^t`;
/// backcast years before the earliest observation as `Pt / (1 + r)^t`.
/// Requested years that overlap the historical range are ignored. A
/// growth rate of exactly -100 % makes backcasting indeterminate — those
/// years are reported in the outcome instead of being divided by zero.
///
/// `growth_rate_pct` is expressed in percent per year (e.g. `1.2`).
#[must_use]
pub fn project_population(
    historical: &Series,
    growth_rate_pct: f64,
    future_years: &[i32],
    backcast_years: &[i32],
) -> ProjectionOutcome {
    let mut points: Vec<ProjectedPoint> = historical
        .points()
        .iter()
        .map(|p| ProjectedPoint {
            year: p.period.year(),
            population: p.value,
            kind: ProjectionKind::Historical,
        })
        .collect();
    let mut indeterminate_years = Vec::new();

    let growth = growth_rate_pct / 100.0;

    if let Some(latest) = historical.last() {
        let base_year = latest.period.year();
        for &target in future_years {
            if target > base_year {
                let t = target - base_year;
                points.push(ProjectedPoint {
                    year: target,
                    population: latest.value * (1.0 + growth).powi(t),
                    kind: ProjectionKind::ProjectedFuture,
                });
            }
        }
    }

    if let Some(earliest) = historical.first() {
        let base_year = earliest.period.year();
        for &target in backcast_years {
            if target < base_year {
                if 1.0 + growth == 0.0 {
                    indeterminate_years.push(target);
                    continue;
                }
                let t = base_year - target;
                points.push(ProjectedPoint {
                    year: target,
                    population: earliest.value / (1.0 + growth).powi(t),
                    kind: ProjectionKind::ProjectedPast,
                });
            }
        }
    }

    points.sort_by_key(|p| p.year);
    indeterminate_years.sort_unstable();

    ProjectionOutcome {
        points,
        indeterminate_years,
    }
}
