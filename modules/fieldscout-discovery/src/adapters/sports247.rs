//! 247Sports recruit list extraction.
//!
//! Recruits arrive as list items with ranking data attributes, a combined
//! "position | hometown" meta line, an offer list, and sometimes a link to
//! highlight film.

use fieldscout_common::{CandidateRecord, DiscoveryCriteria, SourceId, Sport};
use scraper::{Html, Selector};
use tracing::debug;

use super::util;
use super::{ExtractContext, SourceAdapter};

const BASE_URL: &str = "https://247sports.com";
const SOURCE_CONFIDENCE: u8 = 80;

pub struct Sports247Adapter;

impl SourceAdapter for Sports247Adapter {
    fn id(&self) -> SourceId {
        SourceId::Sports247
    }

    fn request_url(&self, criteria: &DiscoveryCriteria, _region: &str) -> String {
        let sport = criteria.sport.unwrap_or(Sport::Football);
        let year = criteria.graduation_year.unwrap_or(2026);
        format!("{BASE_URL}/season/{year}-{sport}/recruits/")
    }

    fn extract(&self, body: &str, ctx: &ExtractContext) -> Vec<CandidateRecord> {
        let doc = Html::parse_document(body);
        let item_sel = Selector::parse("li.recruit").expect("valid selector");
        let name_sel = Selector::parse("a.recruit-name, .recruit-name").expect("valid selector");
        let meta_sel = Selector::parse(".recruit-meta").expect("valid selector");
        let school_sel = Selector::parse(".recruit-school").expect("valid selector");
        let offers_sel = Selector::parse(".offer-list").expect("valid selector");
        let highlight_sel = Selector::parse("a.highlight-link").expect("valid selector");

        let sport = util::infer_sport(&ctx.url, body, ctx.fallback_sport);
        let mut records = Vec::new();

        for item in doc.select(&item_sel) {
            let Some(name) = util::text_in(&item, &name_sel) else {
                debug!(url = %ctx.url, "Skipping recruit without a name");
                continue;
            };
            if !util::valid_name(&name) {
                continue;
            }
            let school = util::text_in(&item, &school_sel).unwrap_or_else(|| "N/A".to_string());

            let mut record = CandidateRecord::new(name.trim(), school, sport, SourceId::Sports247);

            if let Some(meta) = util::text_in(&item, &meta_sel) {
                let mut parts = meta.split('|').map(str::trim);
                record.position = parts.next().filter(|p| !p.is_empty()).map(str::to_string);
                record.state = parts.next().and_then(util::state_from_hometown);
            }

            record.rankings.national = item
                .value()
                .attr("data-national-rank")
                .and_then(util::first_int);
            record.rankings.position = item
                .value()
                .attr("data-position-rank")
                .and_then(util::first_int);
            record.graduation_year = item
                .value()
                .attr("data-class")
                .and_then(util::first_int)
                .and_then(|y| u16::try_from(y).ok());

            if let Some(offers) = util::text_in(&item, &offers_sel) {
                record.offers = offers
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            for link in item.select(&highlight_sel) {
                if let Some(href) = link.value().attr("href") {
                    record.highlight_videos.push(href.to_string());
                }
            }

            record.confidence = SOURCE_CONFIDENCE;
            records.push(record);
        }
        records
    }
}
