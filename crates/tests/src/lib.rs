//! Shared fixtures for the integration tests: counting in-memory
//! collaborators and a local stand-in for the upstream HTTP services.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use sanchari_agents::{AgentSettings, TravelAgent};
use sanchari_core::Location;
use sanchari_observability::AppMetrics;
use sanchari_services::{
    Geocoder, LookupError, PlacesLookup, ServiceConfig, WeatherLookup, WeatherReport,
};
use serde_json::{json, Value};

pub enum GeoAnswer {
    Found(Location),
    Missing,
    Fails,
}

pub struct FakeGeocoder {
    answer: GeoAnswer,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn new(answer: GeoAnswer) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn found(display_name: &str) -> Self {
        Self::new(GeoAnswer::Found(Location::new(10.0, 20.0, display_name)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Geocoder for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Location>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        match &self.answer {
            GeoAnswer::Found(location) => Ok(Some(location.clone())),
            GeoAnswer::Missing => Ok(None),
            GeoAnswer::Fails => Err(LookupError::Transport("connection refused".to_string())),
        }
    }
}

/// `None` answers simulate a timed-out request.
pub struct FakeWeather {
    answer: Option<WeatherReport>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeWeather {
    pub fn reporting(temperature_c: f64, precipitation_probability: u8) -> Self {
        Self::new(Some(WeatherReport {
            temperature_c: Some(temperature_c),
            precipitation_probability: Some(precipitation_probability),
        }))
    }

    pub fn timing_out() -> Self {
        Self::new(None)
    }

    pub fn new(answer: Option<WeatherReport>) -> Self {
        Self {
            answer,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WeatherLookup for FakeWeather {
    async fn current_weather(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<WeatherReport, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answer.clone().ok_or(LookupError::Timeout)
    }
}

/// `None` answers simulate a failed request.
pub struct FakePlaces {
    answer: Option<Vec<String>>,
    calls: AtomicUsize,
    radii: Mutex<Vec<u32>>,
}

impl FakePlaces {
    pub fn listing(names: &[&str]) -> Self {
        Self::new(Some(names.iter().map(|name| name.to_string()).collect()))
    }

    pub fn failing() -> Self {
        Self::new(None)
    }

    pub fn new(answer: Option<Vec<String>>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            radii: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn radii(&self) -> Vec<u32> {
        self.radii.lock().unwrap().clone()
    }
}

impl PlacesLookup for FakePlaces {
    async fn attraction_names(
        &self,
        _latitude: f64,
        _longitude: f64,
        radius_meters: u32,
    ) -> Result<Vec<String>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.radii.lock().unwrap().push(radius_meters);
        self.answer.clone().ok_or(LookupError::Status(504))
    }
}

pub type FakeAgent = TravelAgent<FakeGeocoder, FakeWeather, FakePlaces>;

pub struct Harness {
    pub agent: FakeAgent,
    pub geocoder: Arc<FakeGeocoder>,
    pub weather: Arc<FakeWeather>,
    pub places: Arc<FakePlaces>,
}

impl Harness {
    pub fn new(geocoder: FakeGeocoder, weather: FakeWeather, places: FakePlaces) -> Self {
        Self::with_settings(geocoder, weather, places, AgentSettings::default())
    }

    pub fn with_settings(
        geocoder: FakeGeocoder,
        weather: FakeWeather,
        places: FakePlaces,
        settings: AgentSettings,
    ) -> Self {
        let geocoder = Arc::new(geocoder);
        let weather = Arc::new(weather);
        let places = Arc::new(places);
        let agent = TravelAgent::new(
            geocoder.clone(),
            weather.clone(),
            places.clone(),
            settings,
            AppMetrics::shared(),
        );

        Self {
            agent,
            geocoder,
            weather,
            places,
        }
    }
}

/// Serves canned Nominatim, Open-Meteo and Overpass responses on an
/// ephemeral local port and returns the base URL.
pub async fn spawn_upstream() -> String {
    let router = Router::new()
        .route("/search", get(search))
        .route("/forecast", get(forecast))
        .route("/interpreter", get(interpreter))
        .route("/slow", get(slow))
        .route("/broken", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local upstream");
    let addr: SocketAddr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve local upstream");
    });

    format!("http://{addr}")
}

/// Like Nominatim, refuses clients that do not identify themselves.
async fn search(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    if user_agent != Some(ServiceConfig::default().user_agent.as_str()) {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "user agent" })));
    }

    if params.get("format").map(String::as_str) != Some("json") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "format" })));
    }

    let body = match params.get("q").map(String::as_str) {
        Some("goa") => json!([{
            "place_id": 1,
            "lat": "15.3004543",
            "lon": "74.0855134",
            "display_name": "Goa, India"
        }]),
        Some("paris") => json!([{
            "place_id": 2,
            "lat": "48.8588897",
            "lon": "2.3200410",
            "display_name": "Paris, Ile-de-France, Metropolitan France, France"
        }]),
        Some("garbled") => json!([{ "lat": "north", "lon": "2.3", "display_name": "Nowhere" }]),
        _ => json!([]),
    };
    (StatusCode::OK, Json(body))
}

async fn forecast(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if params.get("current").map(String::as_str)
        != Some("temperature_2m,precipitation_probability")
        || !params.contains_key("latitude")
        || !params.contains_key("longitude")
    {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": true })));
    }

    (
        StatusCode::OK,
        Json(json!({
            "latitude": 15.3,
            "longitude": 74.08,
            "current": {
                "time": "2026-10-18T12:00",
                "temperature_2m": 29.5,
                "precipitation_probability": 20
            }
        })),
    )
}

async fn interpreter(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let query = params.get("data").cloned().unwrap_or_default();
    if !query.contains("\"tourism\"=\"attraction\"") || !query.contains("around:20000,") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": query })));
    }

    (
        StatusCode::OK,
        Json(json!({
            "version": 0.6,
            "elements": [
                { "type": "node", "id": 1, "tags": { "name": "Eiffel Tower", "tourism": "attraction" } },
                { "type": "node", "id": 2, "tags": { "tourism": "attraction" } },
                { "type": "node", "id": 3, "tags": { "name": "Louvre", "tourism": "attraction" } },
                { "type": "node", "id": 4, "tags": { "name": "Eiffel Tower", "tourism": "attraction" } },
                { "type": "node", "id": 5 }
            ]
        })),
    )
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({}))
}
