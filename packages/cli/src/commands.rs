//! Batch command implementations for the econ-pulse CLI.

use std::collections::BTreeSet;
use std::path::Path;

use econ_pulse_aggregate::stability::stability_rank;
use econ_pulse_aggregate_models::StdDevMode;
use econ_pulse_dashboard::{Selection, categories, cpi, nha, population};
use econ_pulse_dataset::registry::load_or_default;
use econ_pulse_dataset::store::open_store;
use econ_pulse_dataset::fetch::fetch_missing;
use econ_pulse_server::data_dir_from_env;

/// Downloads registered datasets that are missing from the data
/// directory.
pub async fn fetch() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = data_dir_from_env();
    let registry = load_or_default(Path::new(&data_dir))?;

    let written = fetch_missing(&registry, Path::new(&data_dir)).await?;
    if written.is_empty() {
        println!("All registered datasets are already present.");
    } else {
        for path in written {
            println!("Fetched {}", path.display());
        }
    }

    Ok(())
}

/// Prints the CPI stability ranking to stdout.
pub fn stability(mode: &str, top_n: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mode: StdDevMode = mode.parse()?;

    let data_dir = data_dir_from_env();
    let mut store = open_store(Path::new(&data_dir))?;
    let datasets = store.datasets()?;

    let ranking = stability_rank(&datasets.cpi_aggregate, mode);

    println!("CPI stability ranking ({mode} std dev, lower = more stable)");
    println!();
    for (rank, score) in ranking.ranked.iter().take(top_n).enumerate() {
        println!(
            "{:>3}. {:<30} {:>8.3}  ({} YoY points)",
            rank + 1,
            score.country,
            score.score,
            score.yoy_points
        );
    }

    if !ranking.insufficient.is_empty() {
        println!();
        println!(
            "Excluded for insufficient data ({} countries):",
            ranking.insufficient.len()
        );
        for entry in &ranking.insufficient {
            println!("  {} ({} YoY points)", entry.country, entry.yoy_points);
        }
    }

    Ok(())
}

/// Prints the per-dataset load reports to stdout.
pub fn reports() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = data_dir_from_env();
    let mut store = open_store(Path::new(&data_dir))?;
    let datasets = store.datasets()?;

    for report in &datasets.reports {
        println!(
            "{:<16} read={:<7} loaded={:<7} rejected={:<5} duplicates={}",
            report.dataset_id,
            report.rows_read,
            report.rows_loaded,
            report.rows_rejected,
            report.duplicate_rows
        );
    }

    Ok(())
}

/// Renders a dashboard page view model and prints it as JSON.
pub fn render(
    page: &str,
    countries: Option<&str>,
    indicator: Option<&str>,
    second_indicator: Option<&str>,
    year: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let countries: BTreeSet<String> = countries
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    let selection = match page {
        "cpi" => Selection::Cpi(cpi::CpiSelection {
            countries,
            ..cpi::CpiSelection::default()
        }),
        "categories" => Selection::Categories(categories::CategorySelection {
            countries,
            categories: BTreeSet::new(),
        }),
        "nha" => Selection::Nha(nha::NhaSelection {
            indicator: indicator
                .ok_or("--indicator is required for the nha page")?
                .to_string(),
            countries,
            second_indicator: second_indicator.map(ToString::to_string),
            year,
        }),
        "population" => Selection::Population(population::PopulationSelection {
            countries,
            year,
            ..population::PopulationSelection::default()
        }),
        other => return Err(format!("unknown page: {other}").into()),
    };

    let data_dir = data_dir_from_env();
    let mut store = open_store(Path::new(&data_dir))?;
    let datasets = store.datasets()?;

    let view = render_view(&datasets, &selection)?;
    println!("{view}");

    Ok(())
}

fn render_view(
    datasets: &econ_pulse_dataset::store::Datasets,
    selection: &Selection,
) -> Result<String, Box<dyn std::error::Error>> {
    let view = econ_pulse_dashboard::render(datasets, selection)?;
    Ok(serde_json::to_string_pretty(&view)?)
}
