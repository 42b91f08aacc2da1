//! Local fallback responder.
//!
//! Maps a query to one of a fixed set of canned advisory texts when no
//! backend is reachable. Pure and synchronous: the same `(query, language)`
//! always yields the same text.
//!
//! # Classification
//!
//! | Priority | Topic | Keywords |
//! |----------|-------|----------|
//! | 1 | wheat | wheat, gehu, गेहूं |
//! | 2 | rice | rice, paddy, धान, चावल |
//! | 3 | pest | pest, insect, bug, कीट, कीड़े |
//! | 4 | fertilizer | fertilizer, fertiliser, manure, उर्वरक, खाद |
//! | 5 | irrigation | irrigation, water, सिंचाई, पानी |
//! | 6 | market | market, price, mandi, बाजार, भाव |
//! | 7 | weather | weather, rain, मौसम, बारिश |
//!
//! Matching is case-insensitive substring search, so keywords also hit
//! inside longer words ("overwatering" is irrigation, and "price" contains
//! "rice"). An attached image always wins over text classification.

mod templates;

use crate::advisory::Query;
use crate::language::Language;

/// Advisory topic recognized by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Wheat,
    Rice,
    Pest,
    Fertilizer,
    Irrigation,
    Market,
    Weather,
}

/// Topics in match priority order with their keywords in both languages.
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Wheat, &["wheat", "gehu", "गेहूं", "गेहूँ"]),
    (Topic::Rice, &["rice", "paddy", "धान", "चावल"]),
    (Topic::Pest, &["pest", "insect", "bug", "कीट", "कीड़े"]),
    (
        Topic::Fertilizer,
        &["fertilizer", "fertiliser", "manure", "उर्वरक", "खाद"],
    ),
    (Topic::Irrigation, &["irrigation", "water", "सिंचाई", "पानी"]),
    (Topic::Market, &["market", "price", "mandi", "बाजार", "भाव"]),
    (Topic::Weather, &["weather", "rain", "मौसम", "बारिश"]),
];

/// Classify free text into a topic. First match in priority order wins.
///
/// Keywords of both languages are always checked, so a Hindi query typed
/// while the English UI is active still classifies correctly.
pub fn classify(text: &str) -> Option<Topic> {
    let normalized = text.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| normalized.contains(kw)))
        .map(|(topic, _)| *topic)
}

/// Produce the offline advisory text for `query` in `language`.
///
/// Every result starts with a demo label line.
pub fn generate(query: &Query, language: Language) -> String {
    let body = if query.has_image() {
        templates::image_analysis(language)
    } else {
        match classify(query.text()) {
            Some(topic) => templates::topic(topic, language),
            None => templates::overview(language),
        }
    };
    format!("{}\n\n{body}", templates::demo_label(language))
}

/// Returns `true` if `text` carries the fallback demo label.
pub fn is_demo_text(text: &str) -> bool {
    text.starts_with(templates::demo_label(Language::English))
        || text.starts_with(templates::demo_label(Language::Hindi))
}
