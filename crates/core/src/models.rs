use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const CLARIFICATION_MESSAGE: &str = "I'm sorry, I couldn't understand which city you want to visit. Please try saying 'Weather in Goa' or 'Visit Paris'.";
pub const GREETING_MESSAGE: &str = "Hello! Where would you like to go today?";
pub const WEATHER_UNAVAILABLE: &str = "weather info unavailable";
pub const DEFAULT_ATTRACTION_CAP: usize = 5;

pub fn place_not_found_message(place: &str) -> String {
    format!("I searched for '{place}' but couldn't find it on the map. Please check the spelling.")
}

/// One user utterance, kept alongside its lower-cased form for the rule scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceContext {
    pub raw: String,
    pub lower: String,
}

impl UtteranceContext {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            lower: raw.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, display_name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            display_name: display_name.into(),
        }
    }

    /// First comma-separated segment of the geocoder's display name
    /// ("Goa, India" -> "Goa").
    pub fn short_name(&self) -> &str {
        let head = self.display_name.split(',').next().unwrap_or_default().trim();
        if head.is_empty() {
            self.display_name.trim()
        } else {
            head
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct IntentSet {
    weather: bool,
    places: bool,
}

impl IntentSet {
    pub const WEATHER: Self = Self {
        weather: true,
        places: false,
    };
    pub const PLACES: Self = Self {
        weather: false,
        places: true,
    };
    pub const BOTH: Self = Self {
        weather: true,
        places: true,
    };

    pub fn new(weather: bool, places: bool) -> Self {
        Self { weather, places }
    }

    pub fn wants_weather(self) -> bool {
        self.weather
    }

    pub fn wants_places(self) -> bool {
        self.places
    }

    pub fn is_empty(self) -> bool {
        !self.weather && !self.places
    }
}

/// Unique attraction names in first-seen order, capped at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttractionList {
    names: Vec<String>,
}

impl AttractionList {
    pub fn from_names<I, S>(names: I, cap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for name in names {
            if kept.len() >= cap {
                break;
            }
            let name = name.into();
            if name.trim().is_empty() {
                continue;
            }
            if seen.insert(name.clone()) {
                kept.push(name);
            }
        }

        Self { names: kept }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub at: DateTime<Utc>,
    pub speaker: Speaker,
    pub text: String,
}

/// Append-only record of a chat session. Owned by the shell and lent to the
/// agent for the duration of a turn.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    session_id: String,
    entries: Vec<TranscriptEntry>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            entries: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Speaker::User, text.into());
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.push(Speaker::Assistant, text.into());
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.entries.push(TranscriptEntry {
            at: Utc::now(),
            speaker,
            text,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    Answered,
    /// Location resolved but the weather or places lookup fell back.
    Degraded,
    ExtractionFailed,
    ResolutionFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub text: String,
    pub outcome: TurnOutcome,
    pub place: Option<String>,
    pub intents: Option<IntentSet>,
}
