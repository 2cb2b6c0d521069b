//! Composite quality scoring for merged profiles.
//!
//! Six additive categories, each individually capped, summed and clamped
//! to 0-100: rankings (30), sport stats (25), social reach (15),
//! achievements (10), highlight film (10), offers (10).

use fieldscout_common::{stat, MergedProfile, Rankings, Sport, StatLine};

/// Profiles at or above this score count as high quality in run analytics.
pub const HIGH_QUALITY_THRESHOLD: u8 = 70;

const RANKING_CAP: f64 = 30.0;
const STATS_CAP: f64 = 25.0;
const SOCIAL_CAP: f64 = 15.0;
const ACHIEVEMENTS_CAP: f64 = 10.0;
const VIDEOS_CAP: f64 = 10.0;
const OFFERS_CAP: f64 = 10.0;

/// Score a merged profile. Deterministic in the profile's fields.
pub fn quality_score(profile: &MergedProfile) -> u8 {
    let total = ranking_points(&profile.rankings)
        + stat_points(profile.sport, &profile.stats)
        + social_points(profile.social_followers)
        + (profile.achievements.len() as f64 * 2.0).min(ACHIEVEMENTS_CAP)
        + (profile.highlight_videos.len() as f64 * 3.0).min(VIDEOS_CAP)
        + (profile.offers.len() as f64 * 2.0).min(OFFERS_CAP);
    total.clamp(0.0, 100.0) as u8
}

/// National rank scores when inside the top 100 and shadows any state rank;
/// otherwise a top-50 state rank scores. Rank 1 is worth the full band.
fn ranking_points(rankings: &Rankings) -> f64 {
    if let Some(national) = rankings.national {
        if national <= 100 {
            return (RANKING_CAP - national as f64 * 0.3).max(0.0);
        }
    }
    if let Some(state) = rankings.state {
        if state <= 50 {
            return (20.0 - state as f64 * 0.4).max(0.0);
        }
    }
    0.0
}

fn stat_points(sport: Sport, stats: &StatLine) -> f64 {
    let raw = match sport {
        Sport::Basketball => {
            (stats.get(stat::POINTS).unwrap_or(0.0) / 3.0).clamp(0.0, 10.0)
                + (stats.get(stat::ASSISTS).unwrap_or(0.0) / 2.0).clamp(0.0, 5.0)
                + (stats.get(stat::REBOUNDS).unwrap_or(0.0) / 2.0).clamp(0.0, 5.0)
                + ((stats.get(stat::FG_PCT).unwrap_or(40.0) - 40.0) / 2.0).clamp(0.0, 5.0)
        }
        Sport::Football => {
            (stats.get(stat::PASSING_YARDS).unwrap_or(0.0) / 300.0).clamp(0.0, 10.0)
                + (stats.get(stat::RUSHING_YARDS).unwrap_or(0.0) / 150.0).clamp(0.0, 5.0)
                + (stats.get(stat::TOUCHDOWNS).unwrap_or(0.0) / 2.0).clamp(0.0, 5.0)
                + ((stats.get(stat::COMPLETION_PCT).unwrap_or(50.0) - 50.0) / 2.0).clamp(0.0, 5.0)
        }
        // No per-stat weights for other sports; reward having data at all.
        _ => stats.len() as f64 * 2.0,
    };
    raw.min(STATS_CAP)
}

fn social_points(followers: Option<u64>) -> f64 {
    match followers {
        Some(count) => (count as f64 / 10_000.0).min(SOCIAL_CAP),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fieldscout_common::SourceId;
    use uuid::Uuid;

    fn empty_profile(sport: Sport) -> MergedProfile {
        let now = Utc::now();
        MergedProfile {
            id: Uuid::new_v4(),
            name: "Test Athlete".to_string(),
            school: "Test High".to_string(),
            sport,
            position: None,
            state: None,
            graduation_year: None,
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
            confidence: 50,
            first_seen: now,
            last_seen: now,
            quality_score: 0,
        }
    }

    #[test]
    fn empty_profile_scores_zero() {
        assert_eq!(quality_score(&empty_profile(Sport::Basketball)), 0);
    }

    #[test]
    fn national_rank_shadows_state_rank() {
        let mut p = empty_profile(Sport::Basketball);
        p.rankings.national = Some(10);
        p.rankings.state = Some(1);
        // 30 - 10 * 0.3 = 27; the state rank must not add on top.
        assert_eq!(quality_score(&p), 27);
    }

    #[test]
    fn deep_national_rank_falls_back_to_state_rank() {
        let mut p = empty_profile(Sport::Basketball);
        p.rankings.national = Some(250);
        p.rankings.state = Some(5);
        // 20 - 5 * 0.4 = 18.
        assert_eq!(quality_score(&p), 18);
    }

    #[test]
    fn ranks_outside_both_bands_score_nothing() {
        let mut p = empty_profile(Sport::Basketball);
        p.rankings.national = Some(101);
        p.rankings.state = Some(51);
        assert_eq!(quality_score(&p), 0);
    }

    #[test]
    fn basketball_stats_cap_per_category() {
        let mut p = empty_profile(Sport::Basketball);
        p.stats.set(stat::POINTS, 90.0); // capped at 10
        p.stats.set(stat::ASSISTS, 40.0); // capped at 5
        p.stats.set(stat::REBOUNDS, 40.0); // capped at 5
        p.stats.set(stat::FG_PCT, 99.0); // capped at 5
        assert_eq!(quality_score(&p), 25);
    }

    #[test]
    fn fg_pct_below_baseline_contributes_nothing() {
        let mut p = empty_profile(Sport::Basketball);
        p.stats.set(stat::FG_PCT, 35.0);
        assert_eq!(quality_score(&p), 0);
    }

    #[test]
    fn football_uses_its_own_stat_weights() {
        let mut p = empty_profile(Sport::Football);
        p.stats.set(stat::PASSING_YARDS, 1500.0); // 5
        p.stats.set(stat::RUSHING_YARDS, 300.0); // 2
        p.stats.set(stat::TOUCHDOWNS, 6.0); // 3
        p.stats.set(stat::COMPLETION_PCT, 60.0); // 5
        assert_eq!(quality_score(&p), 15);
    }

    #[test]
    fn other_sports_reward_populated_stats_keys() {
        let mut p = empty_profile(Sport::Track);
        p.stats.set("hundred_meter", 10.8);
        p.stats.set("two_hundred_meter", 21.9);
        p.stats.set("long_jump", 7.1);
        assert_eq!(quality_score(&p), 6);
    }

    #[test]
    fn social_followers_scale_and_cap() {
        let mut p = empty_profile(Sport::Basketball);
        p.social_followers = Some(45_000);
        assert_eq!(quality_score(&p), 4); // 4.5 truncated

        p.social_followers = Some(10_000_000);
        assert_eq!(quality_score(&p), 15);
    }

    #[test]
    fn list_categories_step_and_cap() {
        let mut p = empty_profile(Sport::Basketball);
        p.achievements = vec!["All-State".to_string(); 9]; // capped at 10
        p.highlight_videos = vec!["v".to_string(); 2]; // 6
        p.offers = vec!["o".to_string(); 3]; // 6
        assert_eq!(quality_score(&p), 22);
    }

    #[test]
    fn fractions_accumulate_before_truncation() {
        // 45k followers (4.5) + one achievement (2.0) = 6.5 -> 6.
        let mut p = empty_profile(Sport::Basketball);
        p.social_followers = Some(45_000);
        p.achievements = vec!["All-Conference".to_string()];
        assert_eq!(quality_score(&p), 6);
    }

    #[test]
    fn full_marks_everywhere_hits_the_ceiling_exactly() {
        let mut p = empty_profile(Sport::Basketball);
        p.rankings.national = Some(1);
        p.stats.set(stat::POINTS, 30.0);
        p.stats.set(stat::ASSISTS, 10.0);
        p.stats.set(stat::REBOUNDS, 10.0);
        p.stats.set(stat::FG_PCT, 50.0);
        p.social_followers = Some(200_000);
        p.achievements = vec!["a".to_string(); 5];
        p.highlight_videos = vec!["v".to_string(); 4];
        p.offers = vec!["o".to_string(); 5];
        // 29.7 + 25 + 15 + 10 + 10 + 10 = 99.7 -> 99.
        assert_eq!(quality_score(&p), 99);

        p.rankings.national = None;
        p.rankings.state = None;
        assert!(quality_score(&p) <= 100);
    }

    #[test]
    fn adding_an_achievement_never_lowers_a_score() {
        let mut p = empty_profile(Sport::Basketball);
        p.stats.set(stat::POINTS, 21.0);
        let before = quality_score(&p);
        p.achievements.push("District MVP".to_string());
        assert!(quality_score(&p) >= before);
    }
}
