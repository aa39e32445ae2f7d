#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset loading for the econ-pulse dashboard.
//!
//! This crate is the input collaborator of the aggregation core: it turns
//! the registered CSV files (quarterly CPI, world population, NHA
//! indicators) into typed per-country [`econ_pulse_metric_models::Series`]
//! maps. Malformed rows are rejected or coerced here — nothing downstream
//! ever sees a raw CSV row. Loaded files are memoized by modification
//! time in [`store::DatasetStore`].

pub mod country;
pub mod fetch;
pub mod loader;
pub mod parsing;
pub mod registry;
pub mod store;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or fetching datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader failure (unreadable file, broken header row).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The `datasets.toml` registry failed to parse.
    #[error("registry parse error: {0}")]
    Registry(#[from] toml::de::Error),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A registered dataset file does not exist on disk.
    #[error("dataset file not found: {}", .path.display())]
    MissingFile {
        /// The missing path.
        path: PathBuf,
    },

    /// A series ended up with two values for the same period. The loader
    /// dedups source rows, so this indicates a loader bug.
    #[error(transparent)]
    DuplicatePeriod(#[from] econ_pulse_metric_models::DuplicatePeriodError),

    /// A download kept failing after all retry attempts.
    #[error("download failed for {url} after {attempts} attempts")]
    DownloadFailed {
        /// The URL that could not be fetched.
        url: String,
        /// How many attempts were made.
        attempts: u32,
    },
}
