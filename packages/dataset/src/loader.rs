//! CSV parsing into typed per-country series.
//!
//! One function per dataset shape. Each consumes any `io::Read`, coerces
//! cell values through [`crate::parsing`], resolves duplicate
//! (country, period) rows last-wins, and reports rejection counts in a
//! [`LoadReport`].

use std::collections::BTreeMap;
use std::io::Read;

use econ_pulse_dataset_models::{
    CpiCsvRow, LoadReport, NhaCsvRow, PopulationCsvRow, PopulationRecord,
};
use econ_pulse_metric_models::{DataPoint, Observation, Period, Series};

use crate::DatasetError;
use crate::country;
use crate::parsing::{parse_value, parse_year};

/// Loaded quarterly CPI data: the all-items index plus per-category maps.
#[derive(Debug, Clone)]
pub struct CpiData {
    /// Aggregate (all-items) CPI per country.
    pub aggregate: BTreeMap<String, Series>,
    /// Per COICOP code, per country CPI series.
    pub categories: BTreeMap<String, BTreeMap<String, Series>>,
    /// Load outcome.
    pub report: LoadReport,
}

/// Loaded population data: annual series plus the full typed records.
#[derive(Debug, Clone)]
pub struct PopulationData {
    /// Annual population series per country.
    pub series: BTreeMap<String, Series>,
    /// Fully typed records (growth rate, area, density, world share).
    pub records: Vec<PopulationRecord>,
    /// Load outcome.
    pub report: LoadReport,
}

/// Loaded NHA indicator data, keyed by indicator then country.
#[derive(Debug, Clone)]
pub struct NhaData {
    /// Per indicator, per country annual series.
    pub by_indicator: BTreeMap<String, BTreeMap<String, Series>>,
    /// Load outcome.
    pub report: LoadReport,
}

/// COICOP markers the source uses for the all-items aggregate index.
const AGGREGATE_MARKERS: &[&str] = &["_T", "Aggregate"];

/// Parses the quarterly CPI CSV.
///
/// Rows route to the aggregate map when their COICOP column carries an
/// aggregate marker, otherwise to the map of their (verbatim) COICOP
/// code. Country codes are normalized to display names.
///
/// # Errors
///
/// Returns [`DatasetError`] if the reader itself fails; individual bad
/// rows are counted in the report, not raised.
pub fn load_cpi<R: Read>(reader: R, dataset_id: &str) -> Result<CpiData, DatasetError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut report = LoadReport::new(dataset_id);

    // (coicop, country) -> period -> value, last row wins.
    let mut cells: BTreeMap<(String, String), BTreeMap<Period, f64>> = BTreeMap::new();

    for result in csv_reader.deserialize::<CpiCsvRow>() {
        report.rows_read += 1;
        let Ok(row) = result else {
            report.rows_rejected += 1;
            continue;
        };

        let Some((coicop, observation)) = parse_cpi_row(&row) else {
            log::warn!(
                "[{dataset_id}] rejecting CPI row: country={} period={:?}",
                row.country,
                row.time_period
            );
            report.rows_rejected += 1;
            continue;
        };

        if cells
            .entry((coicop, observation.country))
            .or_default()
            .insert(observation.period, observation.value)
            .is_some()
        {
            report.duplicate_rows += 1;
        } else {
            report.rows_loaded += 1;
        }
    }

    let mut aggregate = BTreeMap::new();
    let mut categories: BTreeMap<String, BTreeMap<String, Series>> = BTreeMap::new();
    for ((coicop, country), points) in cells {
        let series = into_series(&country, points)?;
        if AGGREGATE_MARKERS.contains(&coicop.as_str()) {
            aggregate.insert(country, series);
        } else {
            categories.entry(coicop).or_default().insert(country, series);
        }
    }

    log::info!(
        "[{dataset_id}] loaded {} rows ({} rejected, {} duplicates) across {} countries",
        report.rows_loaded,
        report.rows_rejected,
        report.duplicate_rows,
        aggregate.len()
    );

    Ok(CpiData {
        aggregate,
        categories,
        report,
    })
}

/// Parses one CPI row into its COICOP code and a typed observation.
fn parse_cpi_row(row: &CpiCsvRow) -> Option<(String, Observation)> {
    let period = row.time_period.parse::<Period>().ok()?;
    let value = parse_value(&row.obs_value)?;
    Some((
        row.coicop.trim().to_string(),
        Observation {
            country: country::display_name(row.country.trim()),
            period,
            value,
        },
    ))
}

/// Parses the world population CSV.
///
/// # Errors
///
/// Returns [`DatasetError`] if the reader itself fails; individual bad
/// rows are counted in the report, not raised.
pub fn load_population<R: Read>(reader: R, dataset_id: &str) -> Result<PopulationData, DatasetError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut report = LoadReport::new(dataset_id);

    let mut cells: BTreeMap<String, BTreeMap<Period, f64>> = BTreeMap::new();
    let mut records: BTreeMap<(String, i32), PopulationRecord> = BTreeMap::new();

    for result in csv_reader.deserialize::<PopulationCsvRow>() {
        report.rows_read += 1;
        let Ok(row) = result else {
            report.rows_rejected += 1;
            continue;
        };

        let (Some(year), Some(population)) = (parse_year(&row.year), parse_value(&row.population))
        else {
            log::warn!(
                "[{dataset_id}] rejecting population row: country={} year={:?}",
                row.country,
                row.year
            );
            report.rows_rejected += 1;
            continue;
        };

        let country = row.country.trim().to_string();
        let record = PopulationRecord {
            country: country.clone(),
            year,
            population,
            growth_rate: row.growth_rate.as_deref().and_then(parse_value),
            area_km2: row.area_km2.as_deref().and_then(parse_value),
            density: row.density.as_deref().and_then(parse_value),
            world_share_pct: row.world_share_pct.as_deref().and_then(parse_value),
        };

        let duplicate = records.insert((country.clone(), year), record).is_some();
        cells
            .entry(country)
            .or_default()
            .insert(Period::Year(year), population);

        if duplicate {
            report.duplicate_rows += 1;
        } else {
            report.rows_loaded += 1;
        }
    }

    let mut series_map = BTreeMap::new();
    for (country, points) in cells {
        let series = into_series(&country, points)?;
        series_map.insert(country, series);
    }

    log::info!(
        "[{dataset_id}] loaded {} rows ({} rejected, {} duplicates) across {} countries",
        report.rows_loaded,
        report.rows_rejected,
        report.duplicate_rows,
        series_map.len()
    );

    Ok(PopulationData {
        series: series_map,
        records: records.into_values().collect(),
        report,
    })
}

/// Parses the NHA indicators CSV.
///
/// `Value` is preferred; `Value_PPP` backs it up when absent. Rows with
/// neither are rejected.
///
/// # Errors
///
/// Returns [`DatasetError`] if the reader itself fails; individual bad
/// rows are counted in the report, not raised.
pub fn load_nha<R: Read>(reader: R, dataset_id: &str) -> Result<NhaData, DatasetError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut report = LoadReport::new(dataset_id);

    let mut cells: BTreeMap<(String, String), BTreeMap<Period, f64>> = BTreeMap::new();

    for result in csv_reader.deserialize::<NhaCsvRow>() {
        report.rows_read += 1;
        let Ok(row) = result else {
            report.rows_rejected += 1;
            continue;
        };

        let Some((indicator, observation)) = parse_nha_row(&row) else {
            report.rows_rejected += 1;
            continue;
        };

        if cells
            .entry((indicator, observation.country))
            .or_default()
            .insert(observation.period, observation.value)
            .is_some()
        {
            report.duplicate_rows += 1;
        } else {
            report.rows_loaded += 1;
        }
    }

    let mut by_indicator: BTreeMap<String, BTreeMap<String, Series>> = BTreeMap::new();
    for ((indicator, country), points) in cells {
        let series = into_series(&country, points)?;
        by_indicator
            .entry(indicator)
            .or_default()
            .insert(country, series);
    }

    log::info!(
        "[{dataset_id}] loaded {} rows ({} rejected, {} duplicates) across {} indicators",
        report.rows_loaded,
        report.rows_rejected,
        report.duplicate_rows,
        by_indicator.len()
    );

    Ok(NhaData {
        by_indicator,
        report,
    })
}

/// Parses one NHA row into its indicator and a typed observation.
///
/// `Value` is preferred; `Value_PPP` backs it up when absent.
fn parse_nha_row(row: &NhaCsvRow) -> Option<(String, Observation)> {
    let value = row
        .value
        .as_deref()
        .and_then(parse_value)
        .or_else(|| row.value_ppp.as_deref().and_then(parse_value))?;
    let year = parse_year(&row.year)?;

    let indicator = row.indicator.trim().to_string();
    let country = row.country.trim().to_string();
    if indicator.is_empty() || country.is_empty() {
        return None;
    }

    Some((
        indicator,
        Observation {
            country,
            period: Period::Year(year),
            value,
        },
    ))
}

/// Builds a [`Series`] from deduplicated (period, value) cells.
fn into_series(country: &str, points: BTreeMap<Period, f64>) -> Result<Series, DatasetError> {
    let points = points
        .into_iter()
        .map(|(period, value)| DataPoint { period, value })
        .collect();
    Ok(Series::new(country, points)?)
}
