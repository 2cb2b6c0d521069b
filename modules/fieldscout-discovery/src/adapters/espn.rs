//! ESPN athlete API extraction. Public endpoint, no auth.

use fieldscout_common::{CandidateRecord, DiscoveryCriteria, SourceId, Sport};
use serde::Deserialize;
use tracing::{debug, warn};

use super::util;
use super::{ExtractContext, SourceAdapter};

const BASE_URL: &str = "https://site.api.espn.com/apis/common/v3/sports";
const SOURCE_CONFIDENCE: u8 = 65;

pub struct EspnAdapter;

#[derive(Debug, Deserialize)]
struct EspnResponse {
    #[serde(default)]
    athletes: Vec<EspnAthlete>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EspnAthlete {
    full_name: Option<String>,
    display_name: Option<String>,
    position: Option<EspnPosition>,
    school: Option<EspnSchool>,
    display_height: Option<String>,
    display_weight: Option<String>,
    hometown: Option<EspnHometown>,
    graduation_year: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct EspnPosition {
    abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EspnSchool {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EspnHometown {
    state: Option<String>,
}

impl SourceAdapter for EspnAdapter {
    fn id(&self) -> SourceId {
        SourceId::Espn
    }

    fn request_url(&self, criteria: &DiscoveryCriteria, region: &str) -> String {
        let sport = criteria.sport.unwrap_or(Sport::Basketball);
        format!("{BASE_URL}/{sport}/athletes?region={region}&limit=50")
    }

    fn extract(&self, body: &str, ctx: &ExtractContext) -> Vec<CandidateRecord> {
        let response: EspnResponse = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(url = %ctx.url, error = %e, "ESPN response was not the expected JSON");
                return Vec::new();
            }
        };

        let sport = util::infer_sport(&ctx.url, body, ctx.fallback_sport);
        let mut records = Vec::new();

        for athlete in response.athletes {
            let Some(name) = athlete.full_name.or(athlete.display_name) else {
                debug!(url = %ctx.url, "Skipping athlete without a name");
                continue;
            };
            if !util::valid_name(&name) {
                continue;
            }
            let school = athlete
                .school
                .and_then(|s| s.name)
                .unwrap_or_else(|| "N/A".to_string());

            let mut record = CandidateRecord::new(name.trim(), school, sport, SourceId::Espn);
            record.position = athlete.position.and_then(|p| p.abbreviation);
            record.height = athlete.display_height;
            record.weight = athlete.display_weight;
            record.state = athlete.hometown.and_then(|h| h.state);
            record.graduation_year = athlete.graduation_year;
            record.confidence = SOURCE_CONFIDENCE;
            records.push(record);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "athletes": [
            {
                "fullName": "Tre Johnson",
                "position": {"abbreviation": "SG"},
                "school": {"name": "Central High"},
                "displayHeight": "6'4\"",
                "displayWeight": "195 lbs",
                "hometown": {"city": "Memphis", "state": "TN"},
                "graduationYear": 2026
            },
            {
                "displayName": "Kai Rivers",
                "position": {}
            },
            {
                "position": {"abbreviation": "C"}
            }
        ]
    }"#;

    fn ctx() -> ExtractContext {
        ExtractContext {
            url: "https://site.api.espn.com/apis/common/v3/sports/basketball/athletes?region=US&limit=50"
                .to_string(),
            fallback_sport: Sport::Other,
        }
    }

    #[test]
    fn athletes_array_maps_onto_records() {
        let records = EspnAdapter.extract(SAMPLE, &ctx());
        assert_eq!(records.len(), 2);

        let tre = &records[0];
        assert_eq!(tre.name, "Tre Johnson");
        assert_eq!(tre.school, "Central High");
        assert_eq!(tre.sport, Sport::Basketball);
        assert_eq!(tre.position.as_deref(), Some("SG"));
        assert_eq!(tre.height.as_deref(), Some(r#"6'4""#));
        assert_eq!(tre.state.as_deref(), Some("TN"));
        assert_eq!(tre.graduation_year, Some(2026));
        assert_eq!(tre.confidence, SOURCE_CONFIDENCE);
    }

    #[test]
    fn display_name_backfills_and_nameless_entries_drop() {
        let records = EspnAdapter.extract(SAMPLE, &ctx());
        let kai = &records[1];
        assert_eq!(kai.name, "Kai Rivers");
        assert_eq!(kai.school, "N/A");
        assert_eq!(kai.position, None);
    }

    #[test]
    fn non_json_body_yields_nothing() {
        assert!(EspnAdapter.extract("<html>down for maintenance</html>", &ctx()).is_empty());
        assert!(EspnAdapter.extract("", &ctx()).is_empty());
    }
}
