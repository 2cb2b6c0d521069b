//! Advisory request accounting per source.
//!
//! Each source gets a minute window and a day window. Windows reset lazily:
//! nothing ticks in the background, a counter is zeroed the first time it is
//! touched after its window expires.
//!
//! Accounting is advisory. `can_proceed` and `record_request` are separate
//! calls, so two tasks racing the last slot may both be admitted; the
//! recorded counts still never exceed the configured limits. No lock is
//! held across a fetch.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use fieldscout_common::{SourceId, API_SOURCES};

const MINUTE_WINDOW: Duration = Duration::from_secs(60);
const DAY_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Request ceilings for one source.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaLimits {
    pub requests_per_minute: u32,
    pub daily: u32,
}

/// Configured ceilings. The scraped sites get conservative numbers; the
/// structured APIs publish real limits and get correspondingly more room.
pub fn limits_for(source: SourceId) -> QuotaLimits {
    match source {
        SourceId::Maxpreps | SourceId::Rivals | SourceId::Sports247 => QuotaLimits {
            requests_per_minute: 10,
            daily: 300,
        },
        SourceId::Espn => QuotaLimits {
            requests_per_minute: 30,
            daily: 2000,
        },
        SourceId::CollegeFootballData => QuotaLimits {
            requests_per_minute: 12,
            daily: 1000,
        },
    }
}

/// Point-in-time view of one source's quota, as exposed by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAvailability {
    pub available: bool,
    pub requests_this_minute: u32,
    pub requests_today: u32,
    pub limits: QuotaLimits,
    pub requires_auth: bool,
}

#[derive(Debug, Clone)]
struct QuotaState {
    requests_this_minute: u32,
    requests_today: u32,
    minute_started_at: Instant,
    day_started_at: Instant,
}

impl QuotaState {
    fn new(now: Instant) -> Self {
        Self {
            requests_this_minute: 0,
            requests_today: 0,
            minute_started_at: now,
            day_started_at: now,
        }
    }

    fn reset_expired(&mut self, now: Instant) {
        if now.duration_since(self.minute_started_at) >= MINUTE_WINDOW {
            self.requests_this_minute = 0;
            self.minute_started_at = now;
        }
        if now.duration_since(self.day_started_at) >= DAY_WINDOW {
            self.requests_today = 0;
            self.day_started_at = now;
        }
    }
}

/// Tracks request counts for every source behind one lock.
pub struct QuotaManager {
    states: Mutex<HashMap<SourceId, QuotaState>>,
}

impl Default for QuotaManager {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotaManager {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a request to `source` would stay inside both windows.
    pub fn can_proceed(&self, source: SourceId) -> bool {
        self.can_proceed_at(source, Instant::now())
    }

    /// Count one request against `source`. Call after `can_proceed`, once
    /// per logical fetch, at dispatch time.
    pub fn record_request(&self, source: SourceId) {
        self.record_request_at(source, Instant::now());
    }

    /// Zero any expired window for `source` right now instead of waiting
    /// for the next touch.
    pub fn reset_if_expired(&self, source: SourceId) {
        self.reset_if_expired_at(source, Instant::now());
    }

    /// Availability snapshot for the structured APIs, keyed by wire name.
    pub fn availability(&self) -> BTreeMap<String, ApiAvailability> {
        API_SOURCES
            .iter()
            .map(|source| (source.to_string(), self.snapshot(*source)))
            .collect()
    }

    pub fn snapshot(&self, source: SourceId) -> ApiAvailability {
        self.snapshot_at(source, Instant::now())
    }

    fn reset_if_expired_at(&self, source: SourceId, now: Instant) {
        let mut states = self.states.lock().expect("quota lock poisoned");
        if let Some(state) = states.get_mut(&source) {
            state.reset_expired(now);
        }
    }

    fn can_proceed_at(&self, source: SourceId, now: Instant) -> bool {
        let limits = limits_for(source);
        let mut states = self.states.lock().expect("quota lock poisoned");
        let state = states.entry(source).or_insert_with(|| QuotaState::new(now));
        state.reset_expired(now);
        let ok = state.requests_this_minute < limits.requests_per_minute
            && state.requests_today < limits.daily;
        if !ok {
            debug!(
                source = %source,
                minute = state.requests_this_minute,
                today = state.requests_today,
                "Quota window full"
            );
        }
        ok
    }

    fn record_request_at(&self, source: SourceId, now: Instant) {
        let limits = limits_for(source);
        let mut states = self.states.lock().expect("quota lock poisoned");
        let state = states.entry(source).or_insert_with(|| QuotaState::new(now));
        state.reset_expired(now);
        // Clamp rather than exceed: a racing task that slipped past
        // can_proceed must not push the count over the limit.
        if state.requests_this_minute < limits.requests_per_minute {
            state.requests_this_minute += 1;
        } else {
            warn!(source = %source, "record_request called with minute window already full");
        }
        if state.requests_today < limits.daily {
            state.requests_today += 1;
        }
    }

    fn snapshot_at(&self, source: SourceId, now: Instant) -> ApiAvailability {
        let limits = limits_for(source);
        let states = self.states.lock().expect("quota lock poisoned");
        let (minute, today) = match states.get(&source) {
            Some(state) => {
                // Read-only view: expired windows report zero without
                // being written back.
                let mut probe = state.clone();
                probe.reset_expired(now);
                (probe.requests_this_minute, probe.requests_today)
            }
            None => (0, 0),
        };
        ApiAvailability {
            available: minute < limits.requests_per_minute && today < limits.daily,
            requests_this_minute: minute,
            requests_today: today,
            limits,
            requires_auth: source.requires_auth(),
        }
    }
}
