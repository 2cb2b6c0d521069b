//! Source adapters, one per upstream site or API.
//!
//! An adapter knows two things: the URL to request for a discovery pass and
//! how to pull [`CandidateRecord`]s out of the response body. It never does
//! I/O itself; the engine fetches and hands the body over.

pub mod cfbd;
pub mod espn;
pub mod maxpreps;
pub mod rivals;
pub mod sports247;
pub mod util;

use std::sync::Arc;

use fieldscout_common::{CandidateRecord, DiscoveryCriteria, SourceId, SourceKind, Sport};

/// Ambient facts available during extraction.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// URL the body was fetched from.
    pub url: String,
    /// Sport assumed when the document does not reveal one.
    pub fallback_sport: Sport,
}

/// One upstream source.
///
/// Extraction is tolerant by contract: a malformed element is skipped with a
/// debug log, never turned into an error, and names shorter than three
/// characters are discarded as parsing debris.
pub trait SourceAdapter: Send + Sync {
    fn id(&self) -> SourceId;

    fn kind(&self) -> SourceKind {
        self.id().kind()
    }

    fn requires_auth(&self) -> bool {
        self.id().requires_auth()
    }

    /// URL to fetch for one discovery pass under the given criteria.
    fn request_url(&self, criteria: &DiscoveryCriteria, region: &str) -> String;

    /// Pull whatever records the body yields. An unusable body yields an
    /// empty vec.
    fn extract(&self, body: &str, ctx: &ExtractContext) -> Vec<CandidateRecord>;
}

/// All known adapters, one instance each.
pub fn registry() -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(maxpreps::MaxprepsAdapter),
        Arc::new(rivals::RivalsAdapter),
        Arc::new(sports247::Sports247Adapter),
        Arc::new(espn::EspnAdapter),
        Arc::new(cfbd::CfbdAdapter),
    ]
}
