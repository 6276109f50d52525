use crate::models::{AttractionList, IntentSet, Location, WEATHER_UNAVAILABLE};

const SEGMENT_SEPARATOR: &str = "\n\n";

/// Reply segments in emission order: weather first, then places.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyMessage {
    segments: Vec<String>,
}

impl ReplyMessage {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn render(&self) -> String {
        self.segments.join(SEGMENT_SEPARATOR)
    }
}

/// Builds the reply for a resolved location. A missing weather text stands
/// for a failed lookup; a missing list is treated as empty.
pub fn compose_reply(
    location: &Location,
    intents: IntentSet,
    weather_text: Option<&str>,
    places: Option<&AttractionList>,
) -> ReplyMessage {
    let city = location.short_name();
    let mut segments = Vec::new();

    if intents.wants_weather() {
        let weather = weather_text.unwrap_or(WEATHER_UNAVAILABLE);
        segments.push(format!("In {city} it is {weather}."));
    }

    if intents.wants_places() {
        match places.filter(|list| !list.is_empty()) {
            Some(list) => {
                let intro = if intents.wants_weather() {
                    "And these are the places you can visit:".to_string()
                } else {
                    format!("In {city}, these are the places you can visit:")
                };
                let bullets = list
                    .names()
                    .iter()
                    .map(|name| format!("- {name}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                segments.push(format!("{intro}\n{bullets}"));
            }
            None => segments.push(format!(
                "I found {city}, but I couldn't retrieve specific tourist spots right now."
            )),
        }
    }

    ReplyMessage { segments }
}
