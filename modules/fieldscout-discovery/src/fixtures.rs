//! Canned fetchers and sample source documents for tests.
//!
//! Compiled only for tests and the `test-support` feature so downstream
//! crates can drive a full engine without network access.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use fieldscout_common::{Config, Sport};
use webfetch::{ErrorKind, FetchError, FetchedPage};

use crate::fetch::PageFetcher;

/// Config with instant retries and no request spacing.
pub fn test_config() -> Config {
    Config {
        web_host: "127.0.0.1".to_string(),
        web_port: 0,
        fetch_timeout_secs: 5,
        fetch_max_retries: 1,
        page_retry_base_secs: 0,
        api_retry_base_secs: 0,
        page_delay_ms: 0,
        api_delay_ms: 0,
        cache_ttl_secs: 300,
        default_sport: Sport::Basketball,
        cfbd_api_key: None,
    }
}

enum Outcome {
    Page(String),
    Fail(ErrorKind),
}

/// Routes URLs to canned outcomes by substring match, first match wins.
/// Unmatched URLs report an exhausted retry on HTTP 404.
pub struct FixtureFetcher {
    routes: Vec<(String, Outcome)>,
    calls: AtomicU32,
}

impl Default for FixtureFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_page(mut self, url_substring: &str, body: &str) -> Self {
        self.routes
            .push((url_substring.to_string(), Outcome::Page(body.to_string())));
        self
    }

    pub fn with_failure(mut self, url_substring: &str, kind: ErrorKind) -> Self {
        self.routes
            .push((url_substring.to_string(), Outcome::Fail(kind)));
        self
    }

    /// Total fetches attempted, matched or not.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> webfetch::Result<FetchedPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for (needle, outcome) in &self.routes {
            if url.contains(needle.as_str()) {
                return match outcome {
                    Outcome::Page(body) => Ok(FetchedPage {
                        url: url.to_string(),
                        status: 200,
                        body: body.clone(),
                        fetched_at: Utc::now(),
                    }),
                    Outcome::Fail(kind) => Err(FetchError::RetriesExhausted {
                        attempts: 4,
                        kind: *kind,
                    }),
                };
            }
        }
        Err(FetchError::RetriesExhausted {
            attempts: 1,
            kind: ErrorKind::Http(404),
        })
    }
}

/// Two basketball athletes; Marcus also appears in [`SPORTS247_PAGE`].
pub const MAXPREPS_PAGE: &str = r#"
    <html><body>
    <ul class="athlete-grid">
      <li class="athlete-card">
        <span class="athlete-name">Marcus Thompson</span>
        <span class="athlete-position">PG</span>
        <span class="athlete-school">Lincoln High School</span>
        <span class="athlete-class">Class of 2026</span>
        <span class="athlete-hometown">Dallas, TX</span>
        <span class="athlete-measurables">6'2" | 180 lbs</span>
        <div class="stat-line">
          <span class="stat">18.4 PPG</span>
          <span class="stat">5.2 APG</span>
          <span class="stat">4.1 RPG</span>
          <span class="stat">47.5 FG%</span>
        </div>
      </li>
      <li class="athlete-card">
        <span class="athlete-name">Deja Mills</span>
        <span class="athlete-position">SG</span>
        <span class="athlete-school">Westside Prep</span>
        <span class="athlete-class">Class of 2027</span>
        <span class="athlete-hometown">Austin, TX</span>
        <div class="stat-line">
          <span class="stat">21.0 PPG</span>
        </div>
      </li>
    </ul>
    </body></html>
"#;

/// One ranked basketball prospect.
pub const RIVALS_PAGE: &str = r#"
    <table class="prospect-table"><tbody>
      <tr class="prospect-row" data-state-rank="3" data-class="2026">
        <td class="rank">14</td>
        <td class="name"><a href="/prospects/jamal-carter">Jamal Carter</a></td>
        <td class="position">SF</td>
        <td class="school">Westfield High</td>
        <td class="hometown">Houston, TX</td>
        <td class="rating">6.0</td>
      </tr>
    </tbody></table>
"#;

/// Marcus again (merge overlap with [`MAXPREPS_PAGE`]) plus one more recruit.
pub const SPORTS247_PAGE: &str = r#"
    <ul class="recruit-list">
      <li class="recruit" data-national-rank="12" data-class="2026">
        <a class="recruit-name" href="/player/marcus-thompson">Marcus Thompson</a>
        <span class="recruit-meta">PG | Dallas, TX</span>
        <span class="recruit-school">Lincoln High School</span>
        <span class="offer-list">Kansas, Baylor</span>
        <a class="highlight-link" href="https://film.example/marcus-junior-year">Junior highlights</a>
      </li>
      <li class="recruit" data-national-rank="88" data-class="2026">
        <a class="recruit-name" href="/player/devon-ellis">Devon Ellis</a>
        <span class="recruit-meta">C | Atlanta, GA</span>
        <span class="recruit-school">Mercer Academy</span>
      </li>
    </ul>
"#;

/// One ESPN athlete.
pub const ESPN_BODY: &str = r#"{
    "athletes": [
        {
            "fullName": "Tre Johnson",
            "position": {"abbreviation": "SG"},
            "school": {"name": "Central High"},
            "displayHeight": "6'4\"",
            "displayWeight": "195 lbs",
            "hometown": {"city": "Memphis", "state": "TN"},
            "graduationYear": 2026
        }
    ]
}"#;

/// One CFBD football recruit.
pub const CFBD_BODY: &str = r#"[
    {
        "name": "Caleb Ford",
        "school": "North Gwinnett",
        "committedTo": "Georgia",
        "position": "RB",
        "height": 75.0,
        "weight": 205.0,
        "stars": 4,
        "rating": 0.92,
        "ranking": 45,
        "stateProvince": "GA",
        "year": 2026
    }
]"#;
