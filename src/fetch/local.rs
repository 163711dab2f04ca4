//! Filesystem fetcher for set data files shipped next to the viewer.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use super::JsonFetcher;
use crate::error::FetchError;

/// Reads JSON documents from disk.
///
/// Relative locations resolve against `root` when one is set, otherwise
/// against the working directory.
#[derive(Clone, Debug, Default)]
pub struct LocalFetcher {
    root: Option<PathBuf>,
}

impl LocalFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(location),
            None => PathBuf::from(location),
        }
    }
}

#[async_trait]
impl JsonFetcher for LocalFetcher {
    #[instrument(name = "local_fetch_json", skip(self))]
    async fn fetch_json(&self, location: &str) -> Result<Value, FetchError> {
        let path = self.resolve(location);
        let bytes = tokio::fs::read(&path).await.map_err(|source| FetchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Json {
            url: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_reads_relative_to_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("sor.json"), r#"{"data": []}"#).expect("write");

        let fetcher = LocalFetcher::with_root(dir.path());
        let value = fetcher.fetch_json("sor.json").await.unwrap();
        assert_eq!(value, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fetcher = LocalFetcher::with_root(dir.path());
        let err = fetcher.fetch_json("nope.json").await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_json_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("bad.json"), "<html>").expect("write");
        let fetcher = LocalFetcher::with_root(dir.path());
        let err = fetcher.fetch_json("bad.json").await.unwrap_err();
        assert!(matches!(err, FetchError::Json { .. }));
    }
}
