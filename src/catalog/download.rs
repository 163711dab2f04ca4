//! Refreshing the per-set data files from the upstream card API.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cards::SetOrder;
use crate::error::SetLoadError;
use crate::fetch::JsonFetcher;

/// Upstream URL of one set: `<card_api>/<set>?pretty=true`, set lower-cased.
#[must_use]
pub fn set_url(card_api: &str, set: &str) -> String {
    format!("{}/{}?pretty=true", card_api.trim_end_matches('/'), set.to_lowercase())
}

/// Download every set in `sets` into `dest/<set>.json`.
///
/// Sets are fetched one after another with `pause` in between. A failing set
/// is reported and skipped; the rest are still downloaded.
pub async fn download_sets(
    fetcher: &dyn JsonFetcher,
    card_api: &str,
    sets: &SetOrder,
    dest: &Path,
    pause: Duration,
) -> Vec<SetLoadError> {
    if let Err(err) = tokio::fs::create_dir_all(dest).await {
        return sets
            .sets()
            .iter()
            .map(|set| SetLoadError::new(set, format!("cannot create {}: {err}", dest.display())))
            .collect();
    }

    let mut failures = Vec::new();
    for (index, set) in sets.sets().iter().enumerate() {
        if index > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        let url = set_url(card_api, set);
        let path = dest.join(format!("{}.json", set.to_lowercase()));
        let outcome = match fetcher.fetch_json(&url).await {
            Ok(document) => match serde_json::to_vec_pretty(&document) {
                Ok(bytes) => tokio::fs::write(&path, bytes)
                    .await
                    .map_err(|err| SetLoadError::new(set, err.to_string())),
                Err(err) => Err(SetLoadError::new(set, err.to_string())),
            },
            Err(err) => Err(SetLoadError::new(set, err.to_string())),
        };
        match outcome {
            Ok(()) => info!(set = %set, path = %path.display(), "saved set"),
            Err(err) => {
                warn!(error = %err, "skipping set");
                failures.push(err);
            }
        }
    }
    failures
}

/// Delete the downloaded `dest/<set>.json` files of `sets`.
///
/// Missing files are skipped. Returns how many files were deleted.
pub async fn clear_set_files(sets: &SetOrder, dest: &Path) -> std::io::Result<usize> {
    let mut removed = 0;
    for set in sets.sets() {
        let path = dest.join(format!("{}.json", set.to_lowercase()));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "removed set file");
                removed += 1;
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
    }
    info!(removed, dest = %dest.display(), "cleared set files");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct OnlySor;

    #[async_trait]
    impl JsonFetcher for OnlySor {
        async fn fetch_json(&self, location: &str) -> Result<Value, FetchError> {
            if location.contains("/sor?") {
                Ok(json!({"data": [{"Number": "001"}]}))
            } else {
                Err(FetchError::Status { status: 404, url: location.to_string() })
            }
        }
    }

    #[test]
    fn test_set_url() {
        assert_eq!(
            set_url("https://api.swu-db.com/cards/", "SHD"),
            "https://api.swu-db.com/cards/shd?pretty=true"
        );
    }

    #[tokio::test]
    async fn test_download_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("data");
        let sets = SetOrder::new(["SOR", "SHD"]);

        let failures =
            download_sets(&OnlySor, "https://api.example/cards", &sets, &dest, Duration::ZERO).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].set, "SHD");
        let bytes = std::fs::read(dest.join("sor.json")).unwrap();
        let saved: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(saved["data"][0]["Number"], "001");
        assert!(!dest.join("shd.json").exists());
    }

    #[tokio::test]
    async fn test_clear_set_files_keeps_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sor.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        let sets = SetOrder::new(["SOR", "SHD"]);

        assert_eq!(clear_set_files(&sets, dir.path()).await.unwrap(), 1);
        assert!(!dir.path().join("sor.json").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert_eq!(clear_set_files(&sets, dir.path()).await.unwrap(), 0);
    }
}
