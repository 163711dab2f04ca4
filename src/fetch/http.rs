//! HTTP fetcher with retries and a CORS-proxy fallback chain.
//!
//! The deck API does not send CORS headers, so deployments that cannot reach
//! it directly go through one of several public proxies. Each route is tried
//! `max_attempts` times with linear backoff before moving to the next one.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::JsonFetcher;
use crate::error::FetchError;

/// Retry and timeout policy for one fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts per route. Zero is treated as one.
    pub max_attempts: usize,
    /// Backoff before attempt `n + 1` is `base_backoff_ms * n`.
    pub base_backoff_ms: u64,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 500,
            timeout_secs: 10,
        }
    }
}

impl RetryPolicy {
    /// Attempts made on each route, at least one.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.max_attempts.max(1)
    }

    /// Backoff to wait after a failed `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: usize) -> Duration {
        Duration::from_millis(self.base_backoff_ms.saturating_mul(attempt as u64))
    }
}

/// Fetches JSON over HTTP, directly or through proxies.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
    /// `None` is a direct request.
    routes: Vec<Option<String>>,
    bust_cache: bool,
}

impl HttpFetcher {
    /// Fetch directly, without proxies.
    #[must_use]
    pub fn direct(policy: RetryPolicy) -> Self {
        Self::with_routes(policy, vec![None])
    }

    /// Fetch through each proxy prefix in turn.
    ///
    /// An empty list falls back to direct requests.
    #[must_use]
    pub fn proxied(policy: RetryPolicy, proxies: &[String]) -> Self {
        let routes: Vec<_> = proxies.iter().cloned().map(Some).collect();
        if routes.is_empty() {
            Self::direct(policy)
        } else {
            Self::with_routes(policy, routes)
        }
    }

    fn with_routes(policy: RetryPolicy, routes: Vec<Option<String>>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(policy.timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                warn!(
                    error = %err,
                    timeout_secs = policy.timeout_secs,
                    "failed to build HTTP client; using defaults without the request timeout"
                );
                reqwest::Client::new()
            });
        Self {
            client,
            policy,
            routes,
            bust_cache: false,
        }
    }

    /// Append a `_t=<millis>` query parameter so intermediaries cannot serve
    /// a stale copy.
    #[must_use]
    pub fn bust_cache(mut self, bust: bool) -> Self {
        self.bust_cache = bust;
        self
    }

    async fn fetch_once(&self, target: &str, proxy: Option<&str>) -> Result<Value, FetchError> {
        let request_url = match proxy {
            Some(proxy) => proxy_url(proxy, target)?,
            None => target.to_string(),
        };
        let response = self
            .client
            .get(&request_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: request_url.clone(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: request_url,
            });
        }
        let body = response.text().await.map_err(|e| FetchError::Body {
            url: request_url.clone(),
            reason: e.to_string(),
        })?;
        let value: Value = serde_json::from_str(&body).map_err(|source| FetchError::Json {
            url: request_url.clone(),
            source,
        })?;

        if proxy.is_some_and(is_wrapping_proxy) {
            return unwrap_contents(value, &request_url);
        }
        Ok(value)
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    #[instrument(name = "http_fetch_json", skip(self))]
    async fn fetch_json(&self, location: &str) -> Result<Value, FetchError> {
        Url::parse(location).map_err(|_| FetchError::InvalidUrl(location.to_string()))?;
        let target = if self.bust_cache {
            with_cache_buster(location)
        } else {
            location.to_string()
        };

        let attempts = self.policy.attempts();
        let mut last = String::from("no routes configured");
        for route in &self.routes {
            let proxy = route.as_deref();
            for attempt in 1..=attempts {
                debug!(
                    attempt,
                    max_attempts = attempts,
                    route = proxy.unwrap_or("direct"),
                    "fetching"
                );
                match self.fetch_once(&target, proxy).await {
                    Ok(value) => return Ok(value),
                    Err(err) => {
                        warn!(route = proxy.unwrap_or("direct"), error = %err, "fetch attempt failed");
                        last = err.to_string();
                    }
                }
                if attempt < attempts {
                    tokio::time::sleep(self.policy.backoff(attempt)).await;
                }
            }
        }

        Err(FetchError::Exhausted {
            url: location.to_string(),
            last,
        })
    }
}

/// AllOrigins `/get` answers with `{ "contents": "<body as string>" }`.
fn is_wrapping_proxy(proxy: &str) -> bool {
    proxy.contains("allorigins") && proxy.contains("/get?")
}

fn unwrap_contents(wrapper: Value, url: &str) -> Result<Value, FetchError> {
    match wrapper.get("contents") {
        Some(Value::String(contents)) => {
            serde_json::from_str(contents).map_err(|source| FetchError::Json {
                url: url.to_string(),
                source,
            })
        }
        _ => Err(FetchError::Body {
            url: url.to_string(),
            reason: "proxy returned an unexpected wrapper".to_string(),
        }),
    }
}

/// Build the request URL for `target` behind `proxy`.
///
/// Query-style proxies (`...?url=`) get the target as an encoded query
/// parameter; path-style proxies (`.../fetch/`) get it appended verbatim.
fn proxy_url(proxy: &str, target: &str) -> Result<String, FetchError> {
    if let Some(base) = proxy.strip_suffix("url=") {
        let base = base.trim_end_matches(['?', '&']);
        let mut url = Url::parse(base).map_err(|_| FetchError::InvalidUrl(proxy.to_string()))?;
        url.query_pairs_mut().append_pair("url", target);
        return Ok(url.into());
    }
    Ok(format!("{proxy}{target}"))
}

fn with_cache_buster(location: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let separator = if location.contains('?') { '&' } else { '?' };
    format!("{location}{separator}_t={millis}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_proxy_url_query_style() {
        let url = proxy_url(
            "https://api.allorigins.win/raw?url=",
            "https://swudb.com/api/getDeckJson/abc",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fswudb.com%2Fapi%2FgetDeckJson%2Fabc"
        );
    }

    #[test]
    fn test_proxy_url_path_style() {
        let url = proxy_url("https://thingproxy.freeboard.io/fetch/", "https://a.b/c").unwrap();
        assert_eq!(url, "https://thingproxy.freeboard.io/fetch/https://a.b/c");
    }

    #[test]
    fn test_unwrap_contents() {
        let wrapper = json!({"status": {"http_code": 200}, "contents": "{\"deck\": []}"});
        assert_eq!(unwrap_contents(wrapper, "u").unwrap(), json!({"deck": []}));
        assert!(unwrap_contents(json!({"status": 500}), "u").is_err());
    }

    #[test]
    fn test_cache_buster_separator() {
        assert!(with_cache_buster("https://a/b").starts_with("https://a/b?_t="));
        assert!(with_cache_buster("https://a/b?x=1").starts_with("https://a/b?x=1&_t="));
    }

    #[test]
    fn test_backoff_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(3), Duration::from_millis(1500));
    }

    #[test]
    fn test_wrapping_proxy_detection() {
        assert!(is_wrapping_proxy("https://api.allorigins.win/get?url="));
        assert!(!is_wrapping_proxy("https://api.allorigins.win/raw?url="));
    }

    #[tokio::test]
    async fn test_rejects_invalid_url() {
        let fetcher = HttpFetcher::direct(RetryPolicy::default());
        let err = fetcher.fetch_json("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.attempts(), 1);
        assert_eq!(RetryPolicy::default().attempts(), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_reports_the_real_failure() {
        let policy = RetryPolicy {
            max_attempts: 0,
            base_backoff_ms: 0,
            timeout_secs: 1,
        };
        let fetcher = HttpFetcher::direct(policy);
        let err = fetcher.fetch_json("http://127.0.0.1:9/deck").await.unwrap_err();
        match err {
            FetchError::Exhausted { last, .. } => assert_ne!(last, "no routes configured"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
