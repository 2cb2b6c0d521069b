//! Seam between the discovery engine and the HTTP layer.
//!
//! The engine talks to sources through [`PageFetcher`] so integration tests
//! can substitute canned documents for live traffic.

use async_trait::async_trait;
use webfetch::{FetchedPage, Fetcher};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> webfetch::Result<FetchedPage>;

    /// Authenticated variant. Fetchers that have no notion of auth ignore
    /// the token.
    async fn fetch_with_bearer(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> webfetch::Result<FetchedPage> {
        let _ = bearer;
        self.fetch(url).await
    }
}

#[async_trait]
impl PageFetcher for Fetcher {
    async fn fetch(&self, url: &str) -> webfetch::Result<FetchedPage> {
        Fetcher::fetch(self, url).await
    }

    async fn fetch_with_bearer(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> webfetch::Result<FetchedPage> {
        Fetcher::fetch_with_bearer(self, url, bearer).await
    }
}
