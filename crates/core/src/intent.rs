use crate::models::IntentSet;

pub const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "whether",
    "temperature",
    "rain",
    "hot",
    "cold",
    "climate",
];

pub const PLACES_KEYWORDS: &[&str] = &["place", "visit", "attraction", "trip", "plan", "see", "spot"];

/// Applied when neither keyword family matches: a bare city name is a
/// places request.
pub const DEFAULT_INTENTS: IntentSet = IntentSet::PLACES;

pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Substring scan of the lower-cased utterance. The two families are
/// independent; the result is never empty.
pub fn classify_intents(text_lower: &str) -> IntentSet {
    let intents = IntentSet::new(
        contains_any(text_lower, WEATHER_KEYWORDS),
        contains_any(text_lower, PLACES_KEYWORDS),
    );

    if intents.is_empty() {
        DEFAULT_INTENTS
    } else {
        intents
    }
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
