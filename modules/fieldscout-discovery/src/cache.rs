//! Short-TTL cache of finished discovery reports.
//!
//! Discovery runs are expensive (minutes of polite scraping), so identical
//! requests inside the TTL window are served the stored report. Only
//! successful runs are stored; failures always retry. Expired entries are
//! dropped lazily on lookup.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::engine::{DiscoveryReport, DiscoveryRequest};
use fieldscout_common::SourceId;

pub struct ReportCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    stored_at: Instant,
    report: DiscoveryReport,
}

impl ReportCache {
    /// A zero TTL disables the cache entirely.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<DiscoveryReport> {
        self.get_at(key, Instant::now())
    }

    pub fn store(&self, key: String, report: &DiscoveryReport) {
        self.store_at(key, report, Instant::now());
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<DiscoveryReport> {
        if self.ttl.is_zero() {
            return None;
        }
        {
            let entries = self.entries.read().expect("cache lock poisoned");
            match entries.get(key) {
                Some(entry) if now.duration_since(entry.stored_at) < self.ttl => {
                    return Some(entry.report.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        let mut entries = self.entries.write().expect("cache lock poisoned");
        if let Some(entry) = entries.get(key) {
            if now.duration_since(entry.stored_at) >= self.ttl {
                entries.remove(key);
                debug!(key, "Dropped expired discovery report");
            }
        }
        None
    }

    fn store_at(&self, key: String, report: &DiscoveryReport, now: Instant) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                stored_at: now,
                report: report.clone(),
            },
        );
    }
}

/// Canonical cache key for a request resolved to a concrete source list.
///
/// Free-text fields are lowercased so equivalent requests collide, and only
/// the presence of per-request API keys matters, not their values.
pub fn request_key(request: &DiscoveryRequest, sources: &[SourceId]) -> String {
    let source_names: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
    let mut key_names: Vec<&str> = request.api_keys.keys().map(String::as_str).collect();
    key_names.sort_unstable();
    let c = &request.criteria;
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}",
        source_names.join(","),
        request.region.to_lowercase(),
        c.sport.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
        c.state.as_deref().map(str::to_lowercase).unwrap_or_else(|| "-".to_string()),
        c.graduation_year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
        c.position.as_deref().map(str::to_lowercase).unwrap_or_else(|| "-".to_string()),
        c.min_quality_score.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string()),
        c.max_results,
        key_names.join(","),
    )
}
