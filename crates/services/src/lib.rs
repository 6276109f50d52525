mod config;
mod error;
mod nominatim;
mod open_meteo;
mod overpass;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use sanchari_core::Location;

pub use config::ServiceConfig;
pub use error::LookupError;
pub use nominatim::NominatimGeocoder;
pub use open_meteo::{OpenMeteoWeather, WeatherReport};
pub use overpass::OverpassPlaces;

pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service answered but knows no such place.
    async fn geocode(&self, query: &str) -> Result<Option<Location>, LookupError>;
}

pub trait WeatherLookup: Send + Sync {
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReport, LookupError>;
}

pub trait PlacesLookup: Send + Sync {
    /// Raw attraction names around a point, unordered and possibly repeated.
    async fn attraction_names(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
    ) -> Result<Vec<String>, LookupError>;
}

/// The three HTTP collaborators built from one configuration.
#[derive(Debug, Clone)]
pub struct HttpCollaborators {
    pub geocoder: NominatimGeocoder,
    pub weather: OpenMeteoWeather,
    pub places: OverpassPlaces,
}

impl HttpCollaborators {
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            geocoder: NominatimGeocoder::new(
                http_client(config, config.geocoder_timeout_secs)?,
                config.geocoder_url.clone(),
            ),
            weather: OpenMeteoWeather::new(
                http_client(config, config.weather_timeout_secs)?,
                config.weather_url.clone(),
            ),
            places: OverpassPlaces::new(
                http_client(config, config.places_timeout_secs)?,
                config.places_url.clone(),
                config.places_fetch_limit,
            ),
        })
    }
}

const CONNECT_TIMEOUT_SECS: u64 = 6;

fn http_client(config: &ServiceConfig, timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build HTTP client")
}
