//! Dataset registry loading.
//!
//! `datasets.toml` declares which files the dashboard loads, what shape
//! each one has, and where a missing file can be downloaded from.

use std::path::Path;

use econ_pulse_dataset_models::{DatasetKind, DatasetRegistry, DatasetSpec};

use crate::DatasetError;

/// Default registry file name, looked up in the data directory.
pub const REGISTRY_FILE: &str = "datasets.toml";

/// Loads a registry from a TOML file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed.
pub fn load_registry(path: &Path) -> Result<DatasetRegistry, DatasetError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Loads the registry from `data_dir/datasets.toml`, falling back to the
/// built-in default registry when the file does not exist.
///
/// # Errors
///
/// Returns [`DatasetError`] if an existing registry file fails to read or
/// parse — a malformed registry is a configuration error, not a case for
/// silent defaults.
pub fn load_or_default(data_dir: &Path) -> Result<DatasetRegistry, DatasetError> {
    let path = data_dir.join(REGISTRY_FILE);
    if path.exists() {
        load_registry(&path)
    } else {
        log::info!(
            "no {REGISTRY_FILE} in {}; using built-in registry",
            data_dir.display()
        );
        Ok(default_registry())
    }
}

/// The registry used when no `datasets.toml` is present: the three
/// standard dashboard datasets under their conventional file names.
#[must_use]
pub fn default_registry() -> DatasetRegistry {
    DatasetRegistry {
        datasets: vec![
            DatasetSpec {
                id: "cpi_quarterly".to_string(),
                kind: DatasetKind::CpiQuarterly,
                path: "imf_cpi_quarterly.csv".to_string(),
                url: None,
            },
            DatasetSpec {
                id: "population".to_string(),
                kind: DatasetKind::Population,
                path: "world_population_data.csv".to_string(),
                url: None,
            },
            DatasetSpec {
                id: "nha_indicators".to_string(),
                kind: DatasetKind::NhaIndicators,
                path: "NHA_indicators_PPP.csv".to_string(),
                url: None,
            },
        ],
    }
}
