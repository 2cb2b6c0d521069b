//! CollegeFootballData recruiting API extraction.
//!
//! Authenticated endpoint (Bearer key). Returns a JSON array of recruits
//! with the 247 composite rating (0.0-1.0) and star count, either of which
//! maps onto extraction confidence.

use fieldscout_common::{CandidateRecord, DiscoveryCriteria, SourceId, Sport};
use serde::Deserialize;
use tracing::{debug, warn};

use super::util;
use super::{ExtractContext, SourceAdapter};

const BASE_URL: &str = "https://api.collegefootballdata.com";
const BASE_CONFIDENCE: u8 = 60;

pub struct CfbdAdapter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfbdRecruit {
    name: Option<String>,
    school: Option<String>,
    committed_to: Option<String>,
    position: Option<String>,
    height: Option<f64>,
    weight: Option<f64>,
    stars: Option<u32>,
    rating: Option<f64>,
    ranking: Option<u32>,
    state_province: Option<String>,
    year: Option<u16>,
}

impl SourceAdapter for CfbdAdapter {
    fn id(&self) -> SourceId {
        SourceId::CollegeFootballData
    }

    fn request_url(&self, criteria: &DiscoveryCriteria, _region: &str) -> String {
        let mut url = format!("{BASE_URL}/recruiting/players");
        let mut params: Vec<String> = Vec::new();
        if let Some(year) = criteria.graduation_year {
            params.push(format!("year={year}"));
        }
        if let Some(state) = criteria.state.as_deref() {
            params.push(format!("state={}", state.to_uppercase()));
        }
        if let Some(position) = criteria.position.as_deref() {
            params.push(format!("position={position}"));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }

    fn extract(&self, body: &str, ctx: &ExtractContext) -> Vec<CandidateRecord> {
        let recruits: Vec<CfbdRecruit> = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(url = %ctx.url, error = %e, "CFBD response was not the expected JSON array");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for recruit in recruits {
            let Some(name) = recruit.name else {
                debug!(url = %ctx.url, "Skipping recruit without a name");
                continue;
            };
            if !util::valid_name(&name) {
                continue;
            }
            let school = recruit.school.unwrap_or_else(|| "N/A".to_string());

            let mut record =
                CandidateRecord::new(name.trim(), school, Sport::Football, SourceId::CollegeFootballData);
            record.position = recruit.position;
            record.state = recruit.state_province;
            record.graduation_year = recruit.year;
            record.height = recruit.height.and_then(format_height);
            record.weight = recruit.weight.map(|w| format!("{} lbs", w.round() as u32));
            record.rankings.national = recruit.ranking;
            if let Some(committed) = recruit.committed_to.filter(|c| !c.trim().is_empty()) {
                record.offers.push(committed);
            }
            record.confidence = confidence_from(recruit.rating, recruit.stars);
            records.push(record);
        }
        records
    }
}

/// CFBD reports height in inches.
fn format_height(inches: f64) -> Option<String> {
    if !(20.0..=100.0).contains(&inches) {
        return None;
    }
    let total = inches.round() as u32;
    Some(format!("{}'{}\"", total / 12, total % 12))
}

fn confidence_from(rating: Option<f64>, stars: Option<u32>) -> u8 {
    if let Some(rating) = rating {
        return (rating * 100.0).round().clamp(0.0, 100.0) as u8;
    }
    if let Some(stars) = stars {
        return (stars * 20).min(100) as u8;
    }
    BASE_CONFIDENCE
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "name": "Caleb Ford",
            "school": "North Gwinnett",
            "committedTo": "Georgia",
            "position": "RB",
            "height": 71.5,
            "weight": 205.0,
            "stars": 4,
            "rating": 0.92,
            "ranking": 45,
            "stateProvince": "GA",
            "year": 2026
        },
        {
            "name": "Mo Diallo",
            "school": "Jesuit Prep",
            "stars": 4
        },
        {
            "school": "Anonymous High"
        }
    ]"#;

    fn ctx() -> ExtractContext {
        ExtractContext {
            url: "https://api.collegefootballdata.com/recruiting/players?year=2026".to_string(),
            fallback_sport: Sport::Other,
        }
    }

    #[test]
    fn recruits_map_onto_football_records() {
        let records = CfbdAdapter.extract(SAMPLE, &ctx());
        assert_eq!(records.len(), 2);

        let caleb = &records[0];
        assert_eq!(caleb.name, "Caleb Ford");
        assert_eq!(caleb.sport, Sport::Football);
        assert_eq!(caleb.rankings.national, Some(45));
        assert_eq!(caleb.state.as_deref(), Some("GA"));
        assert_eq!(caleb.height.as_deref(), Some(r#"6'0""#));
        assert_eq!(caleb.weight.as_deref(), Some("205 lbs"));
        assert_eq!(caleb.offers, vec!["Georgia"]);
    }

    #[test]
    fn rating_beats_stars_for_confidence() {
        let records = CfbdAdapter.extract(SAMPLE, &ctx());
        assert_eq!(records[0].confidence, 92);
        assert_eq!(records[1].confidence, 80);
    }

    #[test]
    fn height_formats_from_inches() {
        assert_eq!(format_height(75.0).as_deref(), Some(r#"6'3""#));
        assert_eq!(format_height(71.5).as_deref(), Some(r#"6'0""#));
        assert_eq!(format_height(0.0), None);
        assert_eq!(format_height(400.0), None);
    }

    #[test]
    fn request_url_carries_criteria_params() {
        let criteria = fieldscout_common::DiscoveryCriteria::builder()
            .graduation_year(Some(2026))
            .state(Some("ga".to_string()))
            .position(Some("RB".to_string()))
            .build();
        assert_eq!(
            CfbdAdapter.request_url(&criteria, "US"),
            "https://api.collegefootballdata.com/recruiting/players?year=2026&state=GA&position=RB"
        );
        assert_eq!(
            CfbdAdapter.request_url(&fieldscout_common::DiscoveryCriteria::default(), "US"),
            "https://api.collegefootballdata.com/recruiting/players"
        );
    }
}
