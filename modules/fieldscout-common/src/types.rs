//! Core domain types shared across the discovery pipeline and the API.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known [`StatLine`] keys.
///
/// Adapters may record any key they can parse; these are the ones the
/// quality scorer knows how to weigh.
pub mod stat {
    pub const POINTS: &str = "points";
    pub const ASSISTS: &str = "assists";
    pub const REBOUNDS: &str = "rebounds";
    pub const FG_PCT: &str = "fg_pct";
    pub const PASSING_YARDS: &str = "passing_yards";
    pub const RUSHING_YARDS: &str = "rushing_yards";
    pub const TOUCHDOWNS: &str = "touchdowns";
    pub const COMPLETION_PCT: &str = "completion_pct";
}

// --- Sports ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Basketball,
    Football,
    Baseball,
    Soccer,
    Volleyball,
    Track,
    #[default]
    Other,
}

impl Sport {
    /// Parse user input, defaulting to `Other` rather than failing.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "basketball" => Sport::Basketball,
            "football" => Sport::Football,
            "baseball" => Sport::Baseball,
            "soccer" => Sport::Soccer,
            "volleyball" => Sport::Volleyball,
            "track" | "track and field" | "track_and_field" => Sport::Track,
            _ => Sport::Other,
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sport::Basketball => "basketball",
            Sport::Football => "football",
            Sport::Baseball => "baseball",
            Sport::Soccer => "soccer",
            Sport::Volleyball => "volleyball",
            Sport::Track => "track",
            Sport::Other => "other",
        };
        write!(f, "{s}")
    }
}

// --- Sources ---

/// How a source is reached, which decides the traffic profile used for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    HtmlPage,
    JsonApi,
}

/// The upstream sources the discovery pipeline knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Maxpreps,
    Rivals,
    Sports247,
    Espn,
    CollegeFootballData,
}

/// Sources searched when a request names none.
pub const DEFAULT_SOURCES: [SourceId; 3] = [SourceId::Maxpreps, SourceId::Rivals, SourceId::Sports247];

/// Structured APIs appended when a request opts into API usage.
pub const API_SOURCES: [SourceId; 2] = [SourceId::Espn, SourceId::CollegeFootballData];

impl SourceId {
    pub fn all() -> [SourceId; 5] {
        [
            SourceId::Maxpreps,
            SourceId::Rivals,
            SourceId::Sports247,
            SourceId::Espn,
            SourceId::CollegeFootballData,
        ]
    }

    /// Parse a wire name like `"maxpreps"`. Unknown names return `None` so
    /// the caller can reject the whole request instead of silently dropping
    /// a source.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "maxpreps" => Some(SourceId::Maxpreps),
            "rivals" => Some(SourceId::Rivals),
            "sports247" => Some(SourceId::Sports247),
            "espn" => Some(SourceId::Espn),
            "collegefootballdata" => Some(SourceId::CollegeFootballData),
            _ => None,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceId::Maxpreps | SourceId::Rivals | SourceId::Sports247 => SourceKind::HtmlPage,
            SourceId::Espn | SourceId::CollegeFootballData => SourceKind::JsonApi,
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, SourceId::CollegeFootballData)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceId::Maxpreps => "maxpreps",
            SourceId::Rivals => "rivals",
            SourceId::Sports247 => "sports247",
            SourceId::Espn => "espn",
            SourceId::CollegeFootballData => "collegefootballdata",
        };
        write!(f, "{s}")
    }
}

// --- Stat lines ---

/// Per-athlete numeric stats keyed by stat name.
///
/// BTreeMap keeps serialization order stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatLine(BTreeMap<String, f64>);

impl StatLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }

    /// Key-wise overlay: every key in `other` replaces the same key here.
    pub fn merge_from(&mut self, other: &StatLine) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), *value);
        }
    }
}

// --- Rankings ---

/// Recruiting rankings as reported by a source. All optional; most
/// sources publish at most one of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rankings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl Rankings {
    pub fn is_empty(&self) -> bool {
        self.national.is_none() && self.state.is_none() && self.position.is_none()
    }

    /// Field-wise overlay: a present field in `other` replaces this one.
    pub fn merge_from(&mut self, other: &Rankings) {
        if other.national.is_some() {
            self.national = other.national;
        }
        if other.state.is_some() {
            self.state = other.state;
        }
        if other.position.is_some() {
            self.position = other.position;
        }
    }
}

// --- Candidate records ---

/// One athlete as extracted from one source, before dedup and merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub name: String,
    pub school: String,
    pub sport: Sport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "StatLine::is_empty")]
    pub stats: StatLine,
    #[serde(default, skip_serializing_if = "Rankings::is_empty")]
    pub rankings: Rankings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_followers: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub social_media: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight_videos: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offers: Vec<String>,
    pub source: SourceId,
    pub discovered_at: DateTime<Utc>,
    /// Source-asserted extraction confidence, 0-100.
    pub confidence: u8,
}

impl CandidateRecord {
    pub fn new(
        name: impl Into<String>,
        school: impl Into<String>,
        sport: Sport,
        source: SourceId,
    ) -> Self {
        Self {
            name: name.into(),
            school: school.into(),
            sport,
            position: None,
            state: None,
            graduation_year: None,
            height: None,
            weight: None,
            stats: StatLine::new(),
            rankings: Rankings::default(),
            social_followers: None,
            social_media: BTreeMap::new(),
            achievements: Vec::new(),
            highlight_videos: Vec::new(),
            offers: Vec::new(),
            source,
            discovered_at: Utc::now(),
            confidence: 50,
        }
    }
}

// --- Merged profiles ---

/// One athlete after records from all sources have been merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedProfile {
    pub id: Uuid,
    pub name: String,
    pub school: String,
    pub sport: Sport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "StatLine::is_empty")]
    pub stats: StatLine,
    #[serde(default, skip_serializing_if = "Rankings::is_empty")]
    pub rankings: Rankings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_followers: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub social_media: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight_videos: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offers: Vec<String>,
    /// Every source that contributed a record, in arrival order.
    pub sources: Vec<SourceId>,
    pub confidence: u8,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Composite 0-100 score stamped by the quality scorer.
    pub quality_score: u8,
}
