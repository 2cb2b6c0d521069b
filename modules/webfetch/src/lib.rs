//! Rate-limited HTTP fetching for scrapers and API clients.
//!
//! A [`Fetcher`] wraps a shared `reqwest::Client` with the behavior every
//! upstream source expects from polite automation: a minimum delay between
//! consecutive requests, a rotating browser user agent, a bounded retry loop
//! with linearly growing backoff, and a per-attempt timeout. Failures are
//! classified into [`ErrorKind`] so callers can tell a block (403) from a
//! throttle (429) from a dead network.
//!
//! One `Fetcher` instance serializes its own request spacing; construct one
//! per traffic profile (slow page scraping vs. faster API calls) and share it.

pub mod error;

pub use error::{ErrorKind, FetchError, Result};

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Mutex;
use tracing::warn;
use url::Url;

/// Desktop browser user agents rotated across requests.
pub const DEFAULT_USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

/// Tuning knobs for a [`Fetcher`].
///
/// The default profile is the slow one used for scraping public HTML pages.
/// API traffic typically runs with a shorter `retry_delay` and
/// `delay_between_requests`.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-attempt timeout applied to the underlying HTTP client.
    pub timeout: Duration,
    /// Retries after the first attempt, so `max_retries + 1` attempts total.
    pub max_retries: u32,
    /// Base backoff. Attempt n (1-based retry) sleeps `retry_delay * n`.
    pub retry_delay: Duration,
    /// Minimum spacing between consecutive requests from this fetcher.
    pub delay_between_requests: Duration,
    /// Pool the per-request user agent is drawn from. Empty disables the header.
    pub user_agents: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            delay_between_requests: Duration::from_millis(2000),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

/// A successfully fetched document.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

/// Rate-limited, retrying HTTP fetcher.
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
    last_request: Mutex<Option<Instant>>,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(fixed_headers())
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            config,
            last_request: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch a URL, retrying transient failures with linear backoff.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        self.fetch_with_bearer(url, None).await
    }

    /// Fetch with an optional `Authorization: Bearer` token.
    ///
    /// Every attempt waits out the configured request spacing first, then
    /// sends with a freshly drawn user agent. A 2xx returns immediately;
    /// anything else records its classification and retries until the
    /// attempt budget runs out, at which point the last observed failure
    /// is reported.
    pub async fn fetch_with_bearer(&self, url: &str, bearer: Option<&str>) -> Result<FetchedPage> {
        if let Err(e) = Url::parse(url) {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            });
        }

        let mut last_kind = ErrorKind::Transport;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay * attempt).await;
            }
            self.honor_spacing().await;

            let mut request = self.client.get(url);
            if let Some(ua) = self.pick_user_agent() {
                request = request.header(header::USER_AGENT, ua);
            }
            if let Some(token) = bearer {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if response.status().is_success() {
                        match response.text().await {
                            Ok(body) => {
                                return Ok(FetchedPage {
                                    url: url.to_string(),
                                    status,
                                    body,
                                    fetched_at: Utc::now(),
                                });
                            }
                            Err(e) => {
                                last_kind = ErrorKind::Transport;
                                warn!(url, attempt = attempt + 1, error = %e, "Failed to read response body");
                            }
                        }
                    } else {
                        last_kind = classify_status(status);
                        warn!(url, status, attempt = attempt + 1, "Request returned non-success status");
                    }
                }
                Err(e) => {
                    last_kind = ErrorKind::Transport;
                    warn!(url, attempt = attempt + 1, error = %e, "Request failed to complete");
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: self.config.max_retries + 1,
            kind: last_kind,
        })
    }

    /// Sleep until `delay_between_requests` has passed since the previous
    /// request. The lock is held across the sleep so concurrent callers
    /// queue instead of stampeding the source.
    async fn honor_spacing(&self) {
        if self.config.delay_between_requests.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.config.delay_between_requests {
                tokio::time::sleep(self.config.delay_between_requests - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn pick_user_agent(&self) -> Option<&str> {
        if self.config.user_agents.is_empty() {
            return None;
        }
        let idx = rand::rng().random_range(0..self.config.user_agents.len());
        Some(&self.config.user_agents[idx])
    }
}

fn classify_status(status: u16) -> ErrorKind {
    match status {
        403 => ErrorKind::AccessDenied,
        429 => ErrorKind::Throttled,
        other => ErrorKind::Http(other),
    }
}

/// Headers sent on every request regardless of the rotated user agent.
///
/// Accept-Encoding is supplied by reqwest's compression features; setting it
/// by hand would disable transparent decompression of the response body.
fn fixed_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.8,*/*;q=0.7",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );
    headers
}
