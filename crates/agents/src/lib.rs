use std::sync::Arc;
use std::time::Instant;

use sanchari_core::{
    classify_intents, compose_reply, extract_place, normalize_text, place_not_found_message,
    AttractionList, IntentSet, Location, Transcript, TurnOutcome, TurnReply, UtteranceContext,
    CLARIFICATION_MESSAGE, DEFAULT_ATTRACTION_CAP,
};
use sanchari_observability::AppMetrics;
use sanchari_services::{
    Geocoder, LookupError, PlacesLookup, ServiceConfig, WeatherLookup, WeatherReport,
};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSettings {
    pub attraction_cap: usize,
    pub radius_meters: u32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            attraction_cap: DEFAULT_ATTRACTION_CAP,
            radius_meters: 20_000,
        }
    }
}

impl From<&ServiceConfig> for AgentSettings {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            attraction_cap: config.attraction_cap,
            radius_meters: config.places_radius_meters,
        }
    }
}

/// Runs one conversational turn at a time: extract a place, resolve it,
/// fetch what the user asked for and compose the reply. Holds no state
/// between turns.
pub struct TravelAgent<G, W, P> {
    geocoder: Arc<G>,
    weather: Arc<W>,
    places: Arc<P>,
    settings: AgentSettings,
    metrics: Arc<AppMetrics>,
}

impl<G, W, P> TravelAgent<G, W, P>
where
    G: Geocoder,
    W: WeatherLookup,
    P: PlacesLookup,
{
    pub fn new(
        geocoder: Arc<G>,
        weather: Arc<W>,
        places: Arc<P>,
        settings: AgentSettings,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            places,
            settings,
            metrics,
        }
    }

    pub fn metrics(&self) -> &AppMetrics {
        &self.metrics
    }

    /// Reply text only.
    pub async fn reply(&self, user_text: &str) -> String {
        self.handle_turn(user_text).await.text
    }

    /// Runs a turn and, once it has completed, appends the user and
    /// assistant records to the caller's transcript.
    pub async fn respond(&self, transcript: &mut Transcript, user_text: &str) -> TurnReply {
        let reply = self.handle_turn(user_text).await;
        transcript.push_user(user_text);
        transcript.push_assistant(reply.text.clone());
        reply
    }

    #[instrument(skip(self, user_text))]
    pub async fn handle_turn(&self, user_text: &str) -> TurnReply {
        let started = Instant::now();
        self.metrics.inc_turn();

        let utterance = UtteranceContext::new(&normalize_text(user_text));
        let reply = self.run_turn(&utterance).await;

        self.metrics.observe_latency(started.elapsed());
        info!(
            place = reply.place.as_deref().unwrap_or(""),
            wants_weather = reply.intents.is_some_and(IntentSet::wants_weather),
            wants_places = reply.intents.is_some_and(IntentSet::wants_places),
            outcome = ?reply.outcome,
            latency_ms = started.elapsed().as_millis() as u64,
            "turn handled"
        );

        reply
    }

    async fn run_turn(&self, utterance: &UtteranceContext) -> TurnReply {
        let Some(place) = extract_place(utterance) else {
            self.metrics.inc_extraction_failure();
            return TurnReply {
                text: CLARIFICATION_MESSAGE.to_string(),
                outcome: TurnOutcome::ExtractionFailed,
                place: None,
                intents: None,
            };
        };

        let location = match self.geocoder.geocode(&place).await {
            Ok(Some(location)) => location,
            Ok(None) => return self.not_found(place),
            Err(err) => {
                warn!(place = %place, error = %err, "geocoding failed");
                return self.not_found(place);
            }
        };

        let intents = classify_intents(&utterance.lower);
        let (weather, places) = tokio::join!(
            self.fetch_weather(&location, intents),
            self.fetch_places(&location, intents)
        );

        let mut degraded = false;
        let weather_text = match weather {
            Some(Ok(report)) => Some(report.summary()),
            Some(Err(err)) => {
                warn!(place = %place, error = %err, "weather lookup failed");
                degraded = true;
                None
            }
            None => None,
        };
        let attractions = match places {
            Some(Ok(names)) => Some(AttractionList::from_names(names, self.settings.attraction_cap)),
            Some(Err(err)) => {
                warn!(place = %place, error = %err, "places lookup failed");
                degraded = true;
                Some(AttractionList::default())
            }
            None => None,
        };

        if degraded {
            self.metrics.inc_degraded_lookup();
        }

        let message = compose_reply(
            &location,
            intents,
            weather_text.as_deref(),
            attractions.as_ref(),
        );

        TurnReply {
            text: message.render(),
            outcome: if degraded {
                TurnOutcome::Degraded
            } else {
                TurnOutcome::Answered
            },
            place: Some(place),
            intents: Some(intents),
        }
    }

    async fn fetch_weather(
        &self,
        location: &Location,
        intents: IntentSet,
    ) -> Option<Result<WeatherReport, LookupError>> {
        if !intents.wants_weather() {
            return None;
        }
        Some(
            self.weather
                .current_weather(location.latitude, location.longitude)
                .await,
        )
    }

    async fn fetch_places(
        &self,
        location: &Location,
        intents: IntentSet,
    ) -> Option<Result<Vec<String>, LookupError>> {
        if !intents.wants_places() {
            return None;
        }
        Some(
            self.places
                .attraction_names(
                    location.latitude,
                    location.longitude,
                    self.settings.radius_meters,
                )
                .await,
        )
    }

    fn not_found(&self, place: String) -> TurnReply {
        self.metrics.inc_resolution_failure();
        TurnReply {
            text: place_not_found_message(&place),
            outcome: TurnOutcome::ResolutionFailed,
            place: Some(place),
            intents: None,
        }
    }
}
