//! Discovery orchestration: fan out across sources, collect what survives,
//! merge, score, rank.
//!
//! Sources fail independently. A run only fails as a whole when every
//! source failed; anything less returns the surviving profiles along with
//! one error message per failed source.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{info, warn};

use fieldscout_common::{
    CandidateRecord, Config, DiscoveryCriteria, MergedProfile, SourceId, SourceKind, Sport,
    API_SOURCES, DEFAULT_SOURCES,
};
use webfetch::{FetchConfig, Fetcher};

use crate::adapters::{self, ExtractContext, SourceAdapter};
use crate::cache::{self, ReportCache};
use crate::fetch::PageFetcher;
use crate::merge;
use crate::quota::QuotaManager;
use crate::score;
use crate::stats::RunStats;

/// Sources queried concurrently; the rest wait their turn.
const MAX_CONCURRENT_SOURCES: usize = 5;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("all {} sources failed: {}", errors.len(), errors.join("; "))]
    AllSourcesFailed { errors: Vec<String> },
}

/// One discovery run's input.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    /// Explicit sources; empty means the scraping defaults.
    pub sources: Vec<SourceId>,
    pub criteria: DiscoveryCriteria,
    pub region: String,
    /// Append the structured APIs to the source list.
    pub use_apis: bool,
    /// Per-request API keys by source wire name, overriding configured keys.
    pub api_keys: HashMap<String, String>,
}

impl Default for DiscoveryRequest {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            criteria: DiscoveryCriteria::default(),
            region: "US".to_string(),
            use_apis: true,
            api_keys: HashMap::new(),
        }
    }
}

/// One discovery run's output.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    /// Scored profiles, best first.
    pub profiles: Vec<MergedProfile>,
    /// Soft failures, one message per failed source.
    pub errors: Vec<String>,
    pub stats: RunStats,
}

pub struct DiscoveryEngine {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    page_fetcher: Arc<dyn PageFetcher>,
    api_fetcher: Arc<dyn PageFetcher>,
    quota: Arc<QuotaManager>,
    cache: ReportCache,
    default_sport: Sport,
    cfbd_api_key: Option<String>,
}

impl DiscoveryEngine {
    /// Production engine: two live fetchers with the slow page profile and
    /// the faster API profile.
    pub fn new(config: &Config) -> Self {
        let page_fetcher = Arc::new(Fetcher::new(FetchConfig {
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            max_retries: config.fetch_max_retries,
            retry_delay: Duration::from_secs(config.page_retry_base_secs),
            delay_between_requests: Duration::from_millis(config.page_delay_ms),
            ..FetchConfig::default()
        }));
        let api_fetcher = Arc::new(Fetcher::new(FetchConfig {
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            max_retries: config.fetch_max_retries,
            retry_delay: Duration::from_secs(config.api_retry_base_secs),
            delay_between_requests: Duration::from_millis(config.api_delay_ms),
            ..FetchConfig::default()
        }));
        Self::with_fetchers(page_fetcher, api_fetcher, config)
    }

    /// Engine with injected fetchers, for tests and alternative transports.
    pub fn with_fetchers(
        page_fetcher: Arc<dyn PageFetcher>,
        api_fetcher: Arc<dyn PageFetcher>,
        config: &Config,
    ) -> Self {
        Self {
            adapters: adapters::registry(),
            page_fetcher,
            api_fetcher,
            quota: Arc::new(QuotaManager::new()),
            cache: ReportCache::new(Duration::from_secs(config.cache_ttl_secs)),
            default_sport: config.default_sport,
            cfbd_api_key: config.cfbd_api_key.clone(),
        }
    }

    pub fn quota(&self) -> &QuotaManager {
        &self.quota
    }

    /// The concrete source list a request resolves to, in stable order
    /// with duplicates collapsed.
    pub fn resolve_sources(&self, request: &DiscoveryRequest) -> Vec<SourceId> {
        let base: Vec<SourceId> = if request.sources.is_empty() {
            DEFAULT_SOURCES.to_vec()
        } else {
            request.sources.clone()
        };
        let extra: Vec<SourceId> = if request.use_apis {
            API_SOURCES.to_vec()
        } else {
            Vec::new()
        };
        let mut resolved = Vec::new();
        for id in base.into_iter().chain(extra) {
            if !resolved.contains(&id) {
                resolved.push(id);
            }
        }
        resolved
    }

    /// Run discovery for one request.
    pub async fn discover(&self, request: &DiscoveryRequest) -> Result<DiscoveryReport, EngineError> {
        let sources = self.resolve_sources(request);
        let key = cache::request_key(request, &sources);
        if let Some(report) = self.cache.get(&key) {
            info!(sources = sources.len(), "Serving discovery report from cache");
            return Ok(report);
        }

        info!(sources = sources.len(), region = %request.region, "Discovery run starting");
        let results: Vec<(SourceId, Result<Vec<CandidateRecord>, String>)> = stream::iter(
            sources
                .iter()
                .copied()
                .map(|id| async move { (id, self.run_source(id, request).await) }),
        )
        .buffer_unordered(MAX_CONCURRENT_SOURCES)
        .collect()
        .await;

        let mut errors = Vec::new();
        let mut candidates: Vec<CandidateRecord> = Vec::new();
        let mut records_by_source: BTreeMap<String, u32> = BTreeMap::new();
        for (id, outcome) in results {
            match outcome {
                Ok(records) => {
                    records_by_source.insert(id.to_string(), records.len() as u32);
                    candidates.extend(records);
                }
                Err(message) => {
                    warn!(source = %id, error = %message, "Source failed");
                    errors.push(message);
                }
            }
        }
        if errors.len() == sources.len() {
            return Err(EngineError::AllSourcesFailed { errors });
        }

        let candidates_extracted = candidates.len() as u32;
        let mut profiles = merge::merge_candidates(candidates);
        let profiles_merged = profiles.len() as u32;
        for profile in &mut profiles {
            profile.quality_score = score::quality_score(profile);
        }
        profiles.retain(|p| request.criteria.matches(p));
        profiles.sort_by(|a, b| b.quality_score.cmp(&a.quality_score));
        profiles.truncate(request.criteria.max_results);

        let stats = build_stats(
            candidates_extracted,
            profiles_merged,
            records_by_source,
            &profiles,
            errors.len() as u32,
        );
        info!(
            profiles = profiles.len(),
            errors = errors.len(),
            "Discovery run complete"
        );
        let report = DiscoveryReport {
            profiles,
            errors,
            stats,
        };
        self.cache.store(key, &report);
        Ok(report)
    }

    /// Fetch and extract one source. Every failure mode maps onto a
    /// human-readable message prefixed with the source wire name.
    async fn run_source(
        &self,
        id: SourceId,
        request: &DiscoveryRequest,
    ) -> Result<Vec<CandidateRecord>, String> {
        let adapter = self
            .adapter_for(id)
            .ok_or_else(|| format!("{id}: no adapter registered"))?;

        if !self.quota.can_proceed(id) {
            return Err(format!("{id}: quota exceeded, skipping"));
        }
        let bearer = self.api_key_for(id, request);
        if adapter.requires_auth() && bearer.is_none() {
            return Err(format!("{id}: API key required but not configured"));
        }

        let url = adapter.request_url(&request.criteria, &request.region);
        self.quota.record_request(id);

        let fetcher = match adapter.kind() {
            SourceKind::HtmlPage => &self.page_fetcher,
            SourceKind::JsonApi => &self.api_fetcher,
        };
        let page = fetcher
            .fetch_with_bearer(&url, bearer.as_deref())
            .await
            .map_err(|e| format!("{id}: {e}"))?;

        if page.body.trim().is_empty() {
            return Err(format!("{id}: empty response body"));
        }

        let ctx = ExtractContext {
            url: page.url.clone(),
            fallback_sport: request.criteria.sport.unwrap_or(self.default_sport),
        };
        let records = adapter.extract(&page.body, &ctx);
        info!(source = %id, records = records.len(), "Source extraction complete");
        Ok(records)
    }

    fn adapter_for(&self, id: SourceId) -> Option<&Arc<dyn SourceAdapter>> {
        self.adapters.iter().find(|a| a.id() == id)
    }

    fn api_key_for(&self, id: SourceId, request: &DiscoveryRequest) -> Option<String> {
        if let Some(key) = request.api_keys.get(&id.to_string()) {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        match id {
            SourceId::CollegeFootballData => self.cfbd_api_key.clone(),
            _ => None,
        }
    }
}

fn build_stats(
    candidates_extracted: u32,
    profiles_merged: u32,
    records_by_source: BTreeMap<String, u32>,
    profiles: &[MergedProfile],
    errors: u32,
) -> RunStats {
    let mut profiles_by_sport: BTreeMap<String, u32> = BTreeMap::new();
    for profile in profiles {
        *profiles_by_sport.entry(profile.sport.to_string()).or_insert(0) += 1;
    }
    let average_confidence = if profiles.is_empty() {
        0.0
    } else {
        let sum: f64 = profiles.iter().map(|p| p.confidence as f64).sum();
        (sum / profiles.len() as f64 * 10.0).round() / 10.0
    };
    let high_quality = profiles
        .iter()
        .filter(|p| p.quality_score >= score::HIGH_QUALITY_THRESHOLD)
        .count() as u32;
    RunStats {
        candidates_extracted,
        profiles_merged,
        profiles_returned: profiles.len() as u32,
        records_by_source,
        profiles_by_sport,
        average_confidence,
        high_quality,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn engine() -> DiscoveryEngine {
        DiscoveryEngine::new(&fixtures::test_config())
    }

    #[test]
    fn empty_request_resolves_to_defaults_plus_apis() {
        let resolved = engine().resolve_sources(&DiscoveryRequest::default());
        assert_eq!(
            resolved,
            vec![
                SourceId::Maxpreps,
                SourceId::Rivals,
                SourceId::Sports247,
                SourceId::Espn,
                SourceId::CollegeFootballData,
            ]
        );
    }

    #[test]
    fn explicit_sources_without_apis_resolve_verbatim() {
        let request = DiscoveryRequest {
            sources: vec![SourceId::Rivals, SourceId::Maxpreps],
            use_apis: false,
            ..DiscoveryRequest::default()
        };
        assert_eq!(
            engine().resolve_sources(&request),
            vec![SourceId::Rivals, SourceId::Maxpreps]
        );
    }

    #[test]
    fn duplicate_sources_collapse_preserving_first_position() {
        let request = DiscoveryRequest {
            sources: vec![SourceId::Espn, SourceId::Maxpreps, SourceId::Espn],
            use_apis: true,
            ..DiscoveryRequest::default()
        };
        assert_eq!(
            engine().resolve_sources(&request),
            vec![
                SourceId::Espn,
                SourceId::Maxpreps,
                SourceId::CollegeFootballData
            ]
        );
    }

    #[test]
    fn stats_average_rounds_to_one_decimal() {
        let stats = build_stats(0, 0, BTreeMap::new(), &[], 2);
        assert_eq!(stats.average_confidence, 0.0);
        assert_eq!(stats.errors, 2);
    }
}
