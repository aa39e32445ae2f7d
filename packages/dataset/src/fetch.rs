//! Dataset download with retry.
//!
//! Registry entries may carry a source URL; [`fetch_missing`] downloads
//! any registered file that is absent from the data directory. Transient
//! HTTP failures (timeouts, connection resets, server errors) are retried
//! with exponential backoff.

use std::path::{Path, PathBuf};
use std::time::Duration;

use econ_pulse_dataset_models::DatasetRegistry;

use crate::DatasetError;

/// Maximum attempts per URL before giving up.
///
/// With exponential backoff (2s, 4s) the total wait before failing is
/// 6 seconds per file.
const MAX_ATTEMPTS: u32 = 3;

/// Downloads every registered dataset whose file is missing and whose
/// entry carries a URL. Returns the paths that were written.
///
/// Registered files without a URL are skipped with a warning — the
/// operator has to place those by hand.
///
/// # Errors
///
/// Returns [`DatasetError::DownloadFailed`] if a URL keeps failing after
/// all attempts, or an I/O error if the file cannot be written.
pub async fn fetch_missing(
    registry: &DatasetRegistry,
    data_dir: &Path,
) -> Result<Vec<PathBuf>, DatasetError> {
    let mut written = Vec::new();

    for spec in &registry.datasets {
        let dest = data_dir.join(&spec.path);
        if dest.exists() {
            log::debug!("[{}] already present at {}", spec.id, dest.display());
            continue;
        }

        let Some(url) = spec.url.as_deref() else {
            log::warn!(
                "[{}] missing at {} and no source URL registered",
                spec.id,
                dest.display()
            );
            continue;
        };

        log::info!("[{}] downloading {url}", spec.id);
        let body = download_with_retry(url).await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, &body).await?;
        log::info!(
            "[{}] wrote {} bytes to {}",
            spec.id,
            body.len(),
            dest.display()
        );
        written.push(dest);
    }

    Ok(written)
}

/// Fetches a URL, retrying transient failures with exponential backoff.
async fn download_with_retry(url: &str) -> Result<Vec<u8>, DatasetError> {
    let mut backoff = Duration::from_secs(2);

    for attempt in 1..=MAX_ATTEMPTS {
        match download_once(url).await {
            Ok(body) => return Ok(body),
            Err(e) if attempt < MAX_ATTEMPTS && is_transient(&e) => {
                log::warn!(
                    "download attempt {attempt}/{MAX_ATTEMPTS} for {url} failed: {e}; \
                     retrying in {}s",
                    backoff.as_secs()
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => {
                log::error!("download failed for {url}: {e}");
                return Err(e);
            }
        }
    }

    Err(DatasetError::DownloadFailed {
        url: url.to_string(),
        attempts: MAX_ATTEMPTS,
    })
}

async fn download_once(url: &str) -> Result<Vec<u8>, DatasetError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Whether an error is worth retrying: timeouts, connection failures,
/// rate limiting, and server-side errors.
fn is_transient(error: &DatasetError) -> bool {
    let DatasetError::Http(e) = error else {
        return false;
    };

    if e.is_timeout() || e.is_connect() {
        return true;
    }

    e.status()
        .is_some_and(|status| status.is_server_error() || status.as_u16() == 429)
}

#[cfg(test)]
mod tests {
    use super::*;
    use econ_pulse_dataset_models::{DatasetKind, DatasetSpec};

    fn registry_without_urls() -> DatasetRegistry {
        DatasetRegistry {
            datasets: vec![DatasetSpec {
                id: "population".to_string(),
                kind: DatasetKind::Population,
                path: "world_population_data.csv".to_string(),
                url: None,
            }],
        }
    }

    #[tokio::test]
    async fn skips_entries_without_urls() {
        let dir = std::env::temp_dir().join(format!("econ-pulse-fetch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let written = fetch_missing(&registry_without_urls(), &dir).await.unwrap();
        assert!(written.is_empty());
    }

    #[tokio::test]
    async fn skips_files_already_present() {
        let dir = std::env::temp_dir().join(format!("econ-pulse-fetch2-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("world_population_data.csv"), "header\n").unwrap();

        let mut registry = registry_without_urls();
        registry.datasets[0].url = Some("http://127.0.0.1:9/unreachable.csv".to_string());

        // Present on disk, so the unreachable URL is never contacted.
        let written = fetch_missing(&registry, &dir).await.unwrap();
        assert!(written.is_empty());
    }
}
