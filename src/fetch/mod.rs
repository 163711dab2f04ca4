//! JSON document fetching.
//!
//! The catalog and the deck client only need one capability: turn a location
//! into a JSON document or fail. Retry and proxy policy live entirely behind
//! this seam.
//!
//! - `HttpFetcher`: reqwest client with retries and an optional CORS-proxy chain
//! - `LocalFetcher`: reads documents from the local filesystem

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

pub mod http;
pub mod local;

pub use http::{HttpFetcher, RetryPolicy};
pub use local::LocalFetcher;

/// Fetch a JSON document by location.
#[async_trait]
pub trait JsonFetcher: Send + Sync + 'static {
    async fn fetch_json(&self, location: &str) -> Result<Value, FetchError>;
}

/// Check whether a location should be fetched over HTTP.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Pick a fetcher for a data root: HTTP for URLs, the filesystem otherwise.
#[must_use]
pub fn fetcher_for(root: &str, policy: RetryPolicy) -> Arc<dyn JsonFetcher> {
    if is_remote(root) {
        Arc::new(HttpFetcher::direct(policy))
    } else {
        Arc::new(LocalFetcher::new())
    }
}
