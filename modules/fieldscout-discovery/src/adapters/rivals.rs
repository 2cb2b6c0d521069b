//! Rivals prospect table extraction.
//!
//! Rivals publishes ranked prospect tables. Rows carry the national rank in
//! a cell, the state rank and class year as data attributes, and the Rivals
//! rating (0.0-6.1 scale) which maps onto extraction confidence.

use fieldscout_common::{CandidateRecord, DiscoveryCriteria, SourceId, Sport};
use scraper::{Html, Selector};
use tracing::debug;

use super::util;
use super::{ExtractContext, SourceAdapter};

const BASE_URL: &str = "https://n.rivals.com";
const BASE_CONFIDENCE: u8 = 60;
const RATING_SCALE_MAX: f64 = 6.1;

pub struct RivalsAdapter;

impl SourceAdapter for RivalsAdapter {
    fn id(&self) -> SourceId {
        SourceId::Rivals
    }

    fn request_url(&self, criteria: &DiscoveryCriteria, _region: &str) -> String {
        let sport = criteria.sport.unwrap_or(Sport::Football);
        let year = criteria.graduation_year.map(|y| y.to_string());
        let mut url = format!("{BASE_URL}/prospect_rankings/{sport}");
        if let Some(year) = year {
            url.push('/');
            url.push_str(&year);
        }
        if let Some(state) = criteria.state.as_deref() {
            url.push_str("?state=");
            url.push_str(&state.to_lowercase());
        }
        url
    }

    fn extract(&self, body: &str, ctx: &ExtractContext) -> Vec<CandidateRecord> {
        let doc = Html::parse_document(body);
        let row_sel = Selector::parse("tr.prospect-row").expect("valid selector");
        let rank_sel = Selector::parse("td.rank").expect("valid selector");
        let name_sel = Selector::parse("td.name").expect("valid selector");
        let position_sel = Selector::parse("td.position").expect("valid selector");
        let school_sel = Selector::parse("td.school").expect("valid selector");
        let hometown_sel = Selector::parse("td.hometown").expect("valid selector");
        let rating_sel = Selector::parse("td.rating").expect("valid selector");

        let sport = util::infer_sport(&ctx.url, body, ctx.fallback_sport);
        let mut records = Vec::new();

        for row in doc.select(&row_sel) {
            let Some(name) = util::text_in(&row, &name_sel) else {
                debug!(url = %ctx.url, "Skipping row without a name cell");
                continue;
            };
            if !util::valid_name(&name) {
                continue;
            }
            let school = util::text_in(&row, &school_sel).unwrap_or_else(|| "N/A".to_string());

            let mut record = CandidateRecord::new(name.trim(), school, sport, SourceId::Rivals);
            record.position = util::text_in(&row, &position_sel);
            record.state = util::text_in(&row, &hometown_sel)
                .as_deref()
                .and_then(util::state_from_hometown);
            record.rankings.national = util::text_in(&row, &rank_sel)
                .as_deref()
                .and_then(util::first_int);
            record.rankings.state = row
                .value()
                .attr("data-state-rank")
                .and_then(util::first_int);
            record.graduation_year = row
                .value()
                .attr("data-class")
                .and_then(util::first_int)
                .and_then(|y| u16::try_from(y).ok());

            record.confidence = match util::text_in(&row, &rating_sel).as_deref().and_then(util::first_float) {
                Some(rating) => rating_to_confidence(rating),
                None => BASE_CONFIDENCE,
            };
            records.push(record);
        }
        records
    }
}

/// Map the 0.0-6.1 Rivals rating onto a 0-100 confidence.
fn rating_to_confidence(rating: f64) -> u8 {
    ((rating / RATING_SCALE_MAX) * 100.0).round().clamp(0.0, 100.0) as u8
}
