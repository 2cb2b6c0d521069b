//! Fieldscout discovery pipeline.
//!
//! Fans a discovery request out across source adapters through rate-limited
//! fetchers, then dedups, merges, scores, and ranks what comes back. The
//! HTTP surface in `fieldscout-api` and the CLI binary both drive the
//! [`DiscoveryEngine`] defined here.

pub mod adapters;
pub mod cache;
pub mod engine;
pub mod fetch;
pub mod merge;
pub mod quota;
pub mod score;
pub mod stats;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

pub use engine::{DiscoveryEngine, DiscoveryReport, DiscoveryRequest, EngineError};
pub use fetch::PageFetcher;
pub use quota::{ApiAvailability, QuotaLimits, QuotaManager};
pub use score::HIGH_QUALITY_THRESHOLD;
pub use stats::RunStats;
