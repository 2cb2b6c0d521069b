//! MaxPreps athlete card extraction.
//!
//! MaxPreps renders athletes as a grid of cards. Each card carries name,
//! position, school, class year, hometown, measurables, and a short stat
//! line of season averages ("18.4 PPG" style tokens).

use fieldscout_common::{stat, CandidateRecord, DiscoveryCriteria, SourceId, Sport};
use scraper::{Html, Selector};
use tracing::debug;

use super::util;
use super::{ExtractContext, SourceAdapter};

const BASE_URL: &str = "https://www.maxpreps.com";
const SOURCE_CONFIDENCE: u8 = 70;

pub struct MaxprepsAdapter;

impl SourceAdapter for MaxprepsAdapter {
    fn id(&self) -> SourceId {
        SourceId::Maxpreps
    }

    fn request_url(&self, criteria: &DiscoveryCriteria, _region: &str) -> String {
        let sport = criteria.sport.unwrap_or(Sport::Basketball);
        match criteria.state.as_deref() {
            Some(state) => format!("{BASE_URL}/{}/{sport}/athletes", state.to_lowercase()),
            None => format!("{BASE_URL}/{sport}/athletes"),
        }
    }

    fn extract(&self, body: &str, ctx: &ExtractContext) -> Vec<CandidateRecord> {
        let doc = Html::parse_document(body);
        let card_sel = Selector::parse("li.athlete-card, div.athlete-card").expect("valid selector");
        let name_sel = Selector::parse(".athlete-name").expect("valid selector");
        let position_sel = Selector::parse(".athlete-position").expect("valid selector");
        let school_sel = Selector::parse(".athlete-school").expect("valid selector");
        let class_sel = Selector::parse(".athlete-class").expect("valid selector");
        let hometown_sel = Selector::parse(".athlete-hometown").expect("valid selector");
        let measurables_sel = Selector::parse(".athlete-measurables").expect("valid selector");
        let stat_sel = Selector::parse(".stat-line .stat").expect("valid selector");

        let sport = util::infer_sport(&ctx.url, body, ctx.fallback_sport);
        let mut records = Vec::new();

        for card in doc.select(&card_sel) {
            let Some(name) = util::text_in(&card, &name_sel) else {
                debug!(url = %ctx.url, "Skipping card without a name");
                continue;
            };
            if !util::valid_name(&name) {
                debug!(url = %ctx.url, name = %name, "Skipping card with unusable name");
                continue;
            }
            let school = util::text_in(&card, &school_sel).unwrap_or_else(|| "N/A".to_string());

            let mut record = CandidateRecord::new(name.trim(), school, sport, SourceId::Maxpreps);
            record.position = util::text_in(&card, &position_sel);
            record.state = util::text_in(&card, &hometown_sel)
                .as_deref()
                .and_then(util::state_from_hometown);
            record.graduation_year = util::text_in(&card, &class_sel)
                .as_deref()
                .and_then(util::first_int)
                .and_then(|y| u16::try_from(y).ok());

            if let Some(measurables) = util::text_in(&card, &measurables_sel) {
                let mut parts = measurables.split('|').map(str::trim);
                record.height = parts.next().filter(|p| !p.is_empty()).map(str::to_string);
                record.weight = parts.next().filter(|p| !p.is_empty()).map(str::to_string);
            }

            for stat_el in card.select(&stat_sel) {
                let text = util::element_text(&stat_el);
                match parse_stat(&text) {
                    Some((key, value)) => record.stats.set(key, value),
                    None => debug!(url = %ctx.url, token = %text, "Unrecognized stat token"),
                }
            }

            record.confidence = SOURCE_CONFIDENCE;
            records.push(record);
        }
        records
    }
}

/// "18.4 PPG" -> (points, 18.4). Unknown labels are dropped.
fn parse_stat(text: &str) -> Option<(&'static str, f64)> {
    let value = util::first_float(text)?;
    let label = text.to_uppercase();
    let key = if label.contains("PPG") {
        stat::POINTS
    } else if label.contains("APG") {
        stat::ASSISTS
    } else if label.contains("RPG") {
        stat::REBOUNDS
    } else if label.contains("FG") {
        stat::FG_PCT
    } else {
        return None;
    };
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
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
              <span class="stat">2 charges taken</span>
            </div>
          </li>
          <li class="athlete-card">
            <span class="athlete-position">SF</span>
            <span class="athlete-school">No Name Academy</span>
          </li>
          <li class="athlete-card">
            <span class="athlete-name">AJ</span>
            <span class="athlete-school">Short Name High</span>
          </li>
          <li class="athlete-card">
            <span class="athlete-name">Deja Mills</span>
          </li>
        </ul>
        </body></html>
    "#;

    fn ctx() -> ExtractContext {
        ExtractContext {
            url: "https://www.maxpreps.com/tx/basketball/athletes".to_string(),
            fallback_sport: Sport::Other,
        }
    }

    #[test]
    fn extracts_full_cards_and_skips_broken_ones() {
        let records = MaxprepsAdapter.extract(SAMPLE, &ctx());
        assert_eq!(records.len(), 2);

        let marcus = &records[0];
        assert_eq!(marcus.name, "Marcus Thompson");
        assert_eq!(marcus.school, "Lincoln High School");
        assert_eq!(marcus.sport, Sport::Basketball);
        assert_eq!(marcus.position.as_deref(), Some("PG"));
        assert_eq!(marcus.state.as_deref(), Some("TX"));
        assert_eq!(marcus.graduation_year, Some(2026));
        assert_eq!(marcus.height.as_deref(), Some(r#"6'2""#));
        assert_eq!(marcus.weight.as_deref(), Some("180 lbs"));
        assert_eq!(marcus.source, SourceId::Maxpreps);
    }

    #[test]
    fn stat_tokens_map_to_well_known_keys() {
        let records = MaxprepsAdapter.extract(SAMPLE, &ctx());
        let stats = &records[0].stats;
        assert_eq!(stats.get(stat::POINTS), Some(18.4));
        assert_eq!(stats.get(stat::ASSISTS), Some(5.2));
        assert_eq!(stats.get(stat::REBOUNDS), Some(4.1));
        assert_eq!(stats.get(stat::FG_PCT), Some(47.5));
        // "charges taken" is not a stat the pipeline knows.
        assert_eq!(stats.len(), 4);
    }

    #[test]
    fn missing_school_falls_back_to_placeholder() {
        let records = MaxprepsAdapter.extract(SAMPLE, &ctx());
        let deja = &records[1];
        assert_eq!(deja.name, "Deja Mills");
        assert_eq!(deja.school, "N/A");
    }

    #[test]
    fn garbage_body_yields_nothing() {
        assert!(MaxprepsAdapter.extract("", &ctx()).is_empty());
        assert!(MaxprepsAdapter.extract("not html at all {{{", &ctx()).is_empty());
    }

    #[test]
    fn request_url_honors_sport_and_state() {
        let criteria = fieldscout_common::DiscoveryCriteria::builder()
            .sport(Some(Sport::Basketball))
            .state(Some("TX".to_string()))
            .build();
        assert_eq!(
            MaxprepsAdapter.request_url(&criteria, "US"),
            "https://www.maxpreps.com/tx/basketball/athletes"
        );
        let bare = fieldscout_common::DiscoveryCriteria::default();
        assert_eq!(
            MaxprepsAdapter.request_url(&bare, "US"),
            "https://www.maxpreps.com/basketball/athletes"
        );
    }
}
