//! Memoized dataset store.
//!
//! Loaded datasets are cached keyed by each registered file's
//! (path, modification time). Touching any registered file invalidates
//! the cache on the next access; nothing else ever mutates loaded data.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use econ_pulse_dataset_models::{DatasetKind, DatasetRegistry, LoadReport, PopulationRecord};
use econ_pulse_metric_models::{Metric, Series};

use crate::loader::{load_cpi, load_nha, load_population};
use crate::DatasetError;

/// Everything the dashboard can draw from, loaded and typed.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    /// Aggregate CPI per country.
    pub cpi_aggregate: BTreeMap<String, Series>,
    /// Per COICOP code, per country CPI series.
    pub cpi_categories: BTreeMap<String, BTreeMap<String, Series>>,
    /// Annual population series per country.
    pub population: BTreeMap<String, Series>,
    /// Fully typed population records.
    pub population_records: Vec<PopulationRecord>,
    /// Per NHA indicator, per country annual series.
    pub nha: BTreeMap<String, BTreeMap<String, Series>>,
    /// Load outcome per registered dataset.
    pub reports: Vec<LoadReport>,
}

impl Datasets {
    /// Looks up the per-country series map behind a metric.
    ///
    /// Returns `None` for COICOP codes or indicators absent from the
    /// loaded data.
    #[must_use]
    pub fn series_for(&self, metric: &Metric) -> Option<&BTreeMap<String, Series>> {
        match metric {
            Metric::CpiAggregate => Some(&self.cpi_aggregate),
            Metric::CpiCategory(code) => self.cpi_categories.get(code),
            Metric::NhaIndicator(name) => self.nha.get(name),
            Metric::Population => Some(&self.population),
        }
    }
}

/// Cache key: every registered file with its last-modified time.
type Fingerprint = Vec<(PathBuf, SystemTime)>;

struct CachedState {
    fingerprint: Fingerprint,
    datasets: Arc<Datasets>,
}

/// Loads registered datasets and memoizes them by modification time.
pub struct DatasetStore {
    registry: DatasetRegistry,
    data_dir: PathBuf,
    cached: Option<CachedState>,
}

impl DatasetStore {
    /// Creates a store over a registry rooted at `data_dir`.
    #[must_use]
    pub fn new(registry: DatasetRegistry, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            data_dir: data_dir.into(),
            cached: None,
        }
    }

    /// The registry this store loads from.
    #[must_use]
    pub const fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    /// Returns the loaded datasets, re-reading any file whose
    /// modification time changed since the last call.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if a registered file is missing or fails
    /// to parse at the reader level.
    pub fn datasets(&mut self) -> Result<Arc<Datasets>, DatasetError> {
        let fingerprint = self.fingerprint()?;

        if let Some(cached) = &self.cached
            && cached.fingerprint == fingerprint
        {
            return Ok(Arc::clone(&cached.datasets));
        }

        log::info!(
            "loading {} registered datasets from {}",
            self.registry.datasets.len(),
            self.data_dir.display()
        );
        let datasets = Arc::new(self.load_all()?);
        self.cached = Some(CachedState {
            fingerprint,
            datasets: Arc::clone(&datasets),
        });

        Ok(datasets)
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.data_dir.join(relative)
    }

    fn fingerprint(&self) -> Result<Fingerprint, DatasetError> {
        self.registry
            .datasets
            .iter()
            .map(|spec| {
                let path = self.resolve(&spec.path);
                let metadata =
                    std::fs::metadata(&path).map_err(|_| DatasetError::MissingFile {
                        path: path.clone(),
                    })?;
                let modified = metadata.modified()?;
                Ok((path, modified))
            })
            .collect()
    }

    fn load_all(&self) -> Result<Datasets, DatasetError> {
        let mut datasets = Datasets::default();

        for spec in &self.registry.datasets {
            let path = self.resolve(&spec.path);
            let reader = BufReader::new(File::open(&path)?);

            match spec.kind {
                DatasetKind::CpiQuarterly => {
                    let cpi = load_cpi(reader, &spec.id)?;
                    datasets.cpi_aggregate.extend(cpi.aggregate);
                    for (code, by_country) in cpi.categories {
                        datasets
                            .cpi_categories
                            .entry(code)
                            .or_default()
                            .extend(by_country);
                    }
                    datasets.reports.push(cpi.report);
                }
                DatasetKind::Population => {
                    let population = load_population(reader, &spec.id)?;
                    datasets.population.extend(population.series);
                    datasets.population_records.extend(population.records);
                    datasets.reports.push(population.report);
                }
                DatasetKind::NhaIndicators => {
                    let nha = load_nha(reader, &spec.id)?;
                    for (indicator, by_country) in nha.by_indicator {
                        datasets
                            .nha
                            .entry(indicator)
                            .or_default()
                            .extend(by_country);
                    }
                    datasets.reports.push(nha.report);
                }
            }
        }

        Ok(datasets)
    }
}

/// Convenience used by binaries: registry from `data_dir` (or the
/// built-in default) wrapped in a fresh store.
///
/// # Errors
///
/// Returns [`DatasetError`] if an existing registry file fails to parse.
pub fn open_store(data_dir: &Path) -> Result<DatasetStore, DatasetError> {
    let registry = crate::registry::load_or_default(data_dir)?;
    Ok(DatasetStore::new(registry, data_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use econ_pulse_dataset_models::DatasetSpec;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("econ-pulse-store-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cpi_registry() -> DatasetRegistry {
        DatasetRegistry {
            datasets: vec![DatasetSpec {
                id: "cpi_quarterly".to_string(),
                kind: DatasetKind::CpiQuarterly,
                path: "cpi.csv".to_string(),
                url: None,
            }],
        }
    }

    const CPI_CSV: &str = "\
COUNTRY,COICOP_1999,TIME_PERIOD,OBS_VALUE
PRT,_T,2020-Q1,100.0
PRT,_T,2021-Q1,105.0
";

    #[test]
    fn loads_registered_files() {
        let dir = temp_dir("load");
        write_file(&dir, "cpi.csv", CPI_CSV);

        let mut store = DatasetStore::new(cpi_registry(), &dir);
        let datasets = store.datasets().unwrap();
        assert!(datasets.cpi_aggregate.contains_key("Portugal"));
        assert_eq!(datasets.reports.len(), 1);
    }

    #[test]
    fn unchanged_files_hit_the_cache() {
        let dir = temp_dir("cache");
        write_file(&dir, "cpi.csv", CPI_CSV);

        let mut store = DatasetStore::new(cpi_registry(), &dir);
        let first = store.datasets().unwrap();
        let second = store.datasets().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn touched_files_invalidate_the_cache() {
        let dir = temp_dir("invalidate");
        let path = write_file(&dir, "cpi.csv", CPI_CSV);

        let mut store = DatasetStore::new(cpi_registry(), &dir);
        let first = store.datasets().unwrap();

        // Rewrite with an extra row; the new mtime invalidates the cache.
        std::thread::sleep(std::time::Duration::from_millis(50));
        let extended = format!("{CPI_CSV}ESP,_T,2020-Q1,101.0\n");
        std::fs::write(&path, extended).unwrap();

        let second = store.datasets().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(second.cpi_aggregate.contains_key("Spain"));
    }

    #[test]
    fn series_for_routes_each_metric() {
        let dir = temp_dir("metric");
        write_file(&dir, "cpi.csv", CPI_CSV);

        let mut store = DatasetStore::new(cpi_registry(), &dir);
        let datasets = store.datasets().unwrap();

        assert!(
            datasets
                .series_for(&Metric::CpiAggregate)
                .is_some_and(|m| m.contains_key("Portugal"))
        );
        assert!(
            datasets
                .series_for(&Metric::CpiCategory("CP99".to_string()))
                .is_none()
        );
        assert!(datasets.series_for(&Metric::Population).is_some());
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let dir = temp_dir("missing");
        let mut store = DatasetStore::new(cpi_registry(), &dir);

        let err = store.datasets().unwrap_err();
        match err {
            DatasetError::MissingFile { path } => assert!(path.ends_with("cpi.csv")),
            other => panic!("expected MissingFile, got {other}"),
        }
    }
}
