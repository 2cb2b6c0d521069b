//! Dedup and merge of candidate records into profiles.
//!
//! Identity is deliberately coarse: lowercase name plus lowercase school.
//! Two sources spelling the same athlete's school differently produce two
//! profiles, which downstream consumers tolerate better than two athletes
//! silently fused into one.

use std::collections::HashMap;

use uuid::Uuid;

use fieldscout_common::{CandidateRecord, MergedProfile};

/// Dedup key for a record: `lowercase(name)_lowercase(school)`.
pub fn identity_key(name: &str, school: &str) -> String {
    format!(
        "{}_{}",
        name.trim().to_lowercase(),
        school.trim().to_lowercase()
    )
}

/// Collapse records into one profile per identity key, in first-seen order.
///
/// Merge rules, applied record by record in input order:
/// scalars take the later non-empty value, maps overlay key-wise,
/// arrays union preserving first occurrence, sources accumulate.
pub fn merge_candidates(records: Vec<CandidateRecord>) -> Vec<MergedProfile> {
    let mut profiles: Vec<MergedProfile> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        if record.name.trim().is_empty() {
            continue;
        }
        let key = identity_key(&record.name, &record.school);
        match index.get(&key) {
            Some(&i) => merge_into(&mut profiles[i], record),
            None => {
                index.insert(key, profiles.len());
                profiles.push(profile_from(record));
            }
        }
    }
    profiles
}

fn profile_from(record: CandidateRecord) -> MergedProfile {
    MergedProfile {
        id: Uuid::new_v4(),
        name: record.name,
        school: record.school,
        sport: record.sport,
        position: record.position,
        state: record.state,
        graduation_year: record.graduation_year,
        height: record.height,
        weight: record.weight,
        stats: record.stats,
        rankings: record.rankings,
        social_followers: record.social_followers,
        social_media: record.social_media,
        achievements: record.achievements,
        highlight_videos: record.highlight_videos,
        offers: record.offers,
        sources: vec![record.source],
        confidence: record.confidence,
        first_seen: record.discovered_at,
        last_seen: record.discovered_at,
        quality_score: 0,
    }
}

fn merge_into(profile: &mut MergedProfile, record: CandidateRecord) {
    // Same identity key, so name and school only differ in case; the later
    // spelling wins like any other scalar.
    profile.name = record.name;
    profile.school = record.school;
    profile.sport = record.sport;
    if record.position.is_some() {
        profile.position = record.position;
    }
    if record.state.is_some() {
        profile.state = record.state;
    }
    if record.graduation_year.is_some() {
        profile.graduation_year = record.graduation_year;
    }
    if record.height.is_some() {
        profile.height = record.height;
    }
    if record.weight.is_some() {
        profile.weight = record.weight;
    }
    if record.social_followers.is_some() {
        profile.social_followers = record.social_followers;
    }

    profile.stats.merge_from(&record.stats);
    profile.rankings.merge_from(&record.rankings);
    for (platform, handle) in record.social_media {
        profile.social_media.insert(platform, handle);
    }

    union_into(&mut profile.achievements, record.achievements);
    union_into(&mut profile.highlight_videos, record.highlight_videos);
    union_into(&mut profile.offers, record.offers);

    if !profile.sources.contains(&record.source) {
        profile.sources.push(record.source);
    }
    profile.confidence = record.confidence;
    profile.first_seen = profile.first_seen.min(record.discovered_at);
    profile.last_seen = profile.last_seen.max(record.discovered_at);
}

fn union_into(dst: &mut Vec<String>, src: Vec<String>) {
    for value in src {
        if !dst.contains(&value) {
            dst.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fieldscout_common::{stat, Rankings, SourceId, Sport};

    fn record(name: &str, school: &str, source: SourceId) -> CandidateRecord {
        CandidateRecord::new(name, school, Sport::Basketball, source)
    }

    #[test]
    fn identity_key_is_case_insensitive() {
        assert_eq!(
            identity_key("Marcus Thompson", "Lincoln High"),
            identity_key("MARCUS THOMPSON", "lincoln high")
        );
        assert_ne!(
            identity_key("Marcus Thompson", "Lincoln High"),
            identity_key("Marcus Thompson", "Lincoln High School")
        );
    }

    #[test]
    fn same_athlete_from_two_sources_becomes_one_profile() {
        let mut a = record("Marcus Thompson", "Lincoln High", SourceId::Maxpreps);
        a.position = Some("PG".to_string());
        a.stats.set(stat::POINTS, 18.4);

        let mut b = record("MARCUS THOMPSON", "Lincoln High", SourceId::Rivals);
        b.rankings = Rankings {
            national: Some(40),
            state: Some(3),
            position: None,
        };
        b.offers = vec!["Kansas".to_string()];

        let profiles = merge_candidates(vec![a, b]);
        assert_eq!(profiles.len(), 1);

        let merged = &profiles[0];
        assert_eq!(merged.sources, vec![SourceId::Maxpreps, SourceId::Rivals]);
        assert_eq!(merged.position.as_deref(), Some("PG"));
        assert_eq!(merged.stats.get(stat::POINTS), Some(18.4));
        assert_eq!(merged.rankings.national, Some(40));
        assert_eq!(merged.offers, vec!["Kansas"]);
    }

    #[test]
    fn later_scalars_override_only_when_present() {
        let mut a = record("Ava Brooks", "Mercy Academy", SourceId::Maxpreps);
        a.position = Some("C".to_string());
        a.height = Some(r#"6'1""#.to_string());

        let mut b = record("Ava Brooks", "Mercy Academy", SourceId::Sports247);
        b.position = Some("PF".to_string());

        let profiles = merge_candidates(vec![a, b]);
        let merged = &profiles[0];
        assert_eq!(merged.position.as_deref(), Some("PF"));
        assert_eq!(merged.height.as_deref(), Some(r#"6'1""#));
    }

    #[test]
    fn arrays_union_without_duplicates_and_maps_overlay() {
        let mut a = record("Noah Price", "East High", SourceId::Sports247);
        a.offers = vec!["Duke".to_string(), "Kansas".to_string()];
        a.achievements = vec!["All-State".to_string()];
        a.stats.set(stat::POINTS, 12.0);
        a.social_media.insert("instagram".to_string(), "@noah_old".to_string());

        let mut b = record("Noah Price", "East High", SourceId::Maxpreps);
        b.offers = vec!["Kansas".to_string(), "UCLA".to_string()];
        b.achievements = vec!["All-State".to_string(), "District MVP".to_string()];
        b.stats.set(stat::POINTS, 14.5);
        b.social_media.insert("instagram".to_string(), "@noahprice".to_string());

        let profiles = merge_candidates(vec![a, b]);
        let merged = &profiles[0];
        assert_eq!(merged.offers, vec!["Duke", "Kansas", "UCLA"]);
        assert_eq!(merged.achievements, vec!["All-State", "District MVP"]);
        assert_eq!(merged.stats.get(stat::POINTS), Some(14.5));
        assert_eq!(merged.social_media["instagram"], "@noahprice");
    }

    #[test]
    fn first_and_last_seen_span_the_record_timestamps() {
        let earlier = Utc::now() - Duration::hours(2);
        let later = Utc::now();

        let mut a = record("Eli Ward", "South High", SourceId::Maxpreps);
        a.discovered_at = later;
        let mut b = record("Eli Ward", "South High", SourceId::Rivals);
        b.discovered_at = earlier;

        let profiles = merge_candidates(vec![a, b]);
        assert_eq!(profiles[0].first_seen, earlier);
        assert_eq!(profiles[0].last_seen, later);
    }

    #[test]
    fn distinct_schools_stay_separate_profiles() {
        let a = record("Jay Cole", "North High", SourceId::Maxpreps);
        let b = record("Jay Cole", "North High School", SourceId::Rivals);
        let profiles = merge_candidates(vec![a, b]);
        assert_eq!(profiles.len(), 2);
    }

    #[test]
    fn merging_the_same_batch_twice_changes_nothing_but_ids() {
        let mut a = record("Ivy Chen", "West High", SourceId::Maxpreps);
        a.stats.set(stat::ASSISTS, 6.0);
        let b = record("Ivy Chen", "West High", SourceId::Rivals);

        let once = merge_candidates(vec![a.clone(), b.clone()]);
        let twice = merge_candidates(vec![a.clone(), b.clone(), a, b]);

        assert_eq!(once.len(), twice.len());
        assert_eq!(once[0].sources, twice[0].sources);
        assert_eq!(once[0].stats, twice[0].stats);
        assert_eq!(once[0].confidence, twice[0].confidence);
    }

    #[test]
    fn blank_names_never_form_profiles() {
        let blank = record("   ", "Some School", SourceId::Maxpreps);
        assert!(merge_candidates(vec![blank]).is_empty());
    }

    #[test]
    fn insertion_order_is_first_seen_order() {
        let profiles = merge_candidates(vec![
            record("B Player", "School", SourceId::Maxpreps),
            record("A Player", "School", SourceId::Maxpreps),
            record("B Player", "School", SourceId::Rivals),
        ]);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "B Player");
        assert_eq!(profiles[1].name, "A Player");
    }
}
