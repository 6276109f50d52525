use reqwest::Client;
use sanchari_core::Location;
use serde::Deserialize;
use tracing::debug;

use crate::error::{check_status, LookupError};
use crate::Geocoder;

/// Forward geocoding against a Nominatim `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Location>, LookupError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;
        check_status(&response)?;

        let places = response.json::<Vec<NominatimPlace>>().await?;
        let Some(place) = places.into_iter().next() else {
            debug!(query, "geocoder returned no results");
            return Ok(None);
        };

        let latitude = parse_coordinate("lat", &place.lat)?;
        let longitude = parse_coordinate("lon", &place.lon)?;
        Ok(Some(Location::new(latitude, longitude, place.display_name)))
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, LookupError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| LookupError::Decode(format!("{field} is not a number: '{raw}'")))
}
