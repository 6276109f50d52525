//! Place-name extraction from free text.
//!
//! Lead-in rules are tried in table order against the lower-cased utterance
//! and the first capture wins. Without a lead-in match, the first word of the
//! original text that is neither a stop word nor shorter than three
//! characters is taken instead.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::UtteranceContext;

const PLACE_CAPTURE: &str = r"(\p{L}[\p{L}\s]*?)";
// A bare "and" belongs to the place ("bosnia and herzegovina"); it only ends
// the capture when the rest of the sentence moves on to another request.
const TERMINATOR: &str = r"(?:\s*[,.!?;]|\s*$|\s+(?:let|what|how|and\s+(?:what|how|the|places?|weather|attractions?|spots?|things)|for|with|please|today|tomorrow|next|this)\b)";

const MIN_TOKEN_CHARS: usize = 3;

const STOP_WORDS: &[&str] = &[
    "i'm", "i'd", "i'll", "i've", "im", "what", "what's", "where", "where's", "how", "how's",
    "tell", "the", "weather", "whether", "temperature", "climate", "rain", "hot", "cold", "places", "place", "visit",
    "visiting", "plan", "planning", "trip", "for", "let's", "lets", "want", "wanna", "would",
    "like", "can", "you", "are", "there", "some", "show", "about", "and", "best", "top", "good",
    "things", "spots", "spot", "attractions", "today", "tomorrow", "please", "which", "when",
    "who", "why", "should", "could", "need", "know", "travel", "going", "see", "near", "around",
    "with", "this", "that", "it's", "hello", "hey", "thanks", "give", "find", "suggest", "into",
    "from", "any", "our", "your", "get", "tour", "they", "them", "she", "her", "his", "does",
    "did", "will", "have", "has", "was", "were", "say", "here", "me", "us",
];

pub struct LeadInRule {
    pub name: &'static str,
    pattern: Regex,
}

impl LeadInRule {
    fn new(name: &'static str, lead_in: &str) -> Self {
        let pattern = Regex::new(&format!("{lead_in}{PLACE_CAPTURE}{TERMINATOR}"))
            .expect("valid lead-in pattern");
        Self { name, pattern }
    }

    /// Trimmed place capture for this rule alone, if it matches anywhere.
    pub fn capture<'t>(&self, text_lower: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text_lower)?
            .get(1)
            .map(|group| group.as_str().trim())
            .filter(|place| !place.is_empty() && !is_stop_word(place))
    }
}

static LEAD_IN_RULES: Lazy<Vec<LeadInRule>> = Lazy::new(|| {
    vec![
        LeadInRule::new(
            "weather",
            r"\b(?:weather|whether|temperature|climate)\s+(?:like\s+)?(?:in|of|for|at)\s+",
        ),
        LeadInRule::new(
            "places",
            r"\b(?:places?|attractions?|spots?|things\s+to\s+do)\s+(?:to\s+(?:visit|see)\s+)?(?:in|near|at|around)\s+",
        ),
        LeadInRule::new(
            "go_to",
            r"\b(?:go|going|travel|travelling|traveling|trip|headed|heading)\s+to\s+",
        ),
        LeadInRule::new("visit", r"\bvisit(?:ing)?\s+(?:in\s+|to\s+)?"),
        LeadInRule::new("in", r"\bin\s+"),
    ]
});

/// Lead-in rules in priority order.
pub fn lead_in_rules() -> &'static [LeadInRule] {
    &LEAD_IN_RULES
}

pub fn extract_place(utterance: &UtteranceContext) -> Option<String> {
    lead_in_rules()
        .iter()
        .find_map(|rule| rule.capture(&utterance.lower))
        .map(str::to_string)
        .or_else(|| first_candidate_word(&utterance.raw))
}

fn first_candidate_word(raw: &str) -> Option<String> {
    raw.split_whitespace()
        .map(|word| {
            word.replace('\u{2019}', "'")
                .trim_matches(|c: char| c.is_ascii_punctuation())
                .to_lowercase()
        })
        .find(|word| word.chars().count() >= MIN_TOKEN_CHARS && !is_stop_word(word))
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
