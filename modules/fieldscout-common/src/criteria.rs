//! Search criteria applied to merged profiles.

use typed_builder::TypedBuilder;

use crate::types::{MergedProfile, Sport};

/// What the caller is looking for.
///
/// Every field is optional except `max_results`; an unset field means
/// "don't filter on this". String comparisons ignore ASCII case because
/// state codes and positions arrive in mixed casing from both callers
/// and sources.
#[derive(Debug, Clone, TypedBuilder)]
pub struct DiscoveryCriteria {
    #[builder(default)]
    pub sport: Option<Sport>,
    #[builder(default)]
    pub state: Option<String>,
    #[builder(default)]
    pub graduation_year: Option<u16>,
    #[builder(default)]
    pub position: Option<String>,
    #[builder(default)]
    pub min_quality_score: Option<u8>,
    /// Cap applied after scoring and sorting.
    #[builder(default = 100)]
    pub max_results: usize,
}

impl Default for DiscoveryCriteria {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DiscoveryCriteria {
    /// Whether a scored profile satisfies every set filter.
    pub fn matches(&self, profile: &MergedProfile) -> bool {
        if let Some(sport) = self.sport {
            if profile.sport != sport {
                return false;
            }
        }
        if let Some(ref state) = self.state {
            match profile.state {
                Some(ref s) if s.eq_ignore_ascii_case(state) => {}
                _ => return false,
            }
        }
        if let Some(year) = self.graduation_year {
            if profile.graduation_year != Some(year) {
                return false;
            }
        }
        if let Some(ref position) = self.position {
            match profile.position {
                Some(ref p) if p.eq_ignore_ascii_case(position) => {}
                _ => return false,
            }
        }
        if let Some(min) = self.min_quality_score {
            if profile.quality_score < min {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rankings, SourceId, StatLine};
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(sport: Sport, state: Option<&str>, year: Option<u16>, score: u8) -> MergedProfile {
        let now = Utc::now();
        MergedProfile {
            id: Uuid::new_v4(),
            name: "Jordan Reyes".to_string(),
            school: "Lincoln High".to_string(),
            sport,
            position: Some("PG".to_string()),
            state: state.map(str::to_string),
            graduation_year: year,
            height: None,
            weight: None,
            stats: StatLine::new(),
            rankings: Rankings::default(),
            social_followers: None,
            social_media: Default::default(),
            achievements: Vec::new(),
            highlight_videos: Vec::new(),
            offers: Vec::new(),
            sources: vec![SourceId::Maxpreps],
            confidence: 70,
            first_seen: now,
            last_seen: now,
            quality_score: score,
        }
    }

    #[test]
    fn unset_criteria_match_everything() {
        let criteria = DiscoveryCriteria::default();
        assert!(criteria.matches(&profile(Sport::Basketball, None, None, 0)));
        assert_eq!(criteria.max_results, 100);
    }

    #[test]
    fn state_comparison_ignores_case() {
        let criteria = DiscoveryCriteria::builder().state(Some("tx".to_string())).build();
        assert!(criteria.matches(&profile(Sport::Basketball, Some("TX"), None, 0)));
        assert!(!criteria.matches(&profile(Sport::Basketball, Some("CA"), None, 0)));
        assert!(!criteria.matches(&profile(Sport::Basketball, None, None, 0)));
    }

    #[test]
    fn each_set_filter_must_hold() {
        let criteria = DiscoveryCriteria::builder()
            .sport(Some(Sport::Basketball))
            .graduation_year(Some(2026))
            .min_quality_score(Some(60))
            .build();
        assert!(criteria.matches(&profile(Sport::Basketball, Some("TX"), Some(2026), 60)));
        assert!(!criteria.matches(&profile(Sport::Football, Some("TX"), Some(2026), 90)));
        assert!(!criteria.matches(&profile(Sport::Basketball, Some("TX"), Some(2025), 90)));
        assert!(!criteria.matches(&profile(Sport::Basketball, Some("TX"), Some(2026), 59)));
    }
}
