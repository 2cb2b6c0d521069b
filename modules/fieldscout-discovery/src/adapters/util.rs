//! Parsing helpers shared by the adapters. All of them are tolerant: bad
//! input yields `None`, never a panic.

use fieldscout_common::Sport;
use regex::Regex;
use scraper::{ElementRef, Selector};

/// First unsigned integer anywhere in the text, e.g. "Class of 2026" -> 2026.
pub(crate) fn first_int(text: &str) -> Option<u32> {
    let re = Regex::new(r"\d+").expect("valid regex");
    re.find(text)?.as_str().parse().ok()
}

/// First decimal number anywhere in the text, e.g. "18.4 PPG" -> 18.4.
pub(crate) fn first_float(text: &str) -> Option<f64> {
    let re = Regex::new(r"\d+(\.\d+)?").expect("valid regex");
    re.find(text)?.as_str().parse().ok()
}

/// Names shorter than three characters are debris, not athletes.
pub(crate) fn valid_name(name: &str) -> bool {
    name.trim().chars().count() >= 3
}

/// Trailing two-letter state code from a hometown like "Dallas, TX".
pub(crate) fn state_from_hometown(hometown: &str) -> Option<String> {
    let tail = hometown.rsplit(',').next()?.trim();
    if tail.len() == 2 && tail.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(tail.to_uppercase())
    } else {
        None
    }
}

const SPORT_KEYWORDS: &[(&str, Sport)] = &[
    ("basketball", Sport::Basketball),
    ("football", Sport::Football),
    ("baseball", Sport::Baseball),
    ("soccer", Sport::Soccer),
    ("volleyball", Sport::Volleyball),
    ("track", Sport::Track),
];

/// Guess the sport from the page URL first, then the document text.
pub(crate) fn infer_sport(url: &str, text: &str, fallback: Sport) -> Sport {
    for haystack in [url, text] {
        let lower = haystack.to_lowercase();
        for (keyword, sport) in SPORT_KEYWORDS {
            if lower.contains(keyword) {
                return *sport;
            }
        }
    }
    fallback
}

/// Trimmed text of the first `selector` match under `element`, if any and
/// non-empty.
pub(crate) fn text_in(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    let node = element.select(selector).next()?;
    let text = node.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Trimmed text content of an element.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_int_scans_past_words() {
        assert_eq!(first_int("Class of 2026"), Some(2026));
        assert_eq!(first_int("#12 overall"), Some(12));
        assert_eq!(first_int("no numbers here"), None);
    }

    #[test]
    fn first_float_reads_leading_stat_values() {
        assert_eq!(first_float("18.4 PPG"), Some(18.4));
        assert_eq!(first_float("7 RPG"), Some(7.0));
        assert_eq!(first_float("PPG"), None);
    }

    #[test]
    fn short_names_are_rejected() {
        assert!(valid_name("Ace Carter"));
        assert!(valid_name(" Ira "));
        assert!(!valid_name("AJ"));
        assert!(!valid_name("  x  "));
    }

    #[test]
    fn hometown_state_requires_a_two_letter_tail() {
        assert_eq!(state_from_hometown("Dallas, TX"), Some("TX".to_string()));
        assert_eq!(state_from_hometown("St. Louis, mo"), Some("MO".to_string()));
        assert_eq!(state_from_hometown("London, England"), None);
        assert_eq!(state_from_hometown("Dallas"), None);
    }

    #[test]
    fn sport_inference_prefers_url_over_text_over_fallback() {
        assert_eq!(
            infer_sport("https://x.test/girls-soccer/rankings", "football football", Sport::Other),
            Sport::Soccer
        );
        assert_eq!(
            infer_sport("https://x.test/athletes", "state volleyball finals", Sport::Other),
            Sport::Volleyball
        );
        assert_eq!(
            infer_sport("https://x.test/athletes", "no hints", Sport::Basketball),
            Sport::Basketball
        );
    }
}
