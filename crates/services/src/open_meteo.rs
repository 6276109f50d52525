use reqwest::Client;
use serde::Deserialize;

use crate::error::{check_status, LookupError};
use crate::WeatherLookup;

const CURRENT_FIELDS: &str = "temperature_2m,precipitation_probability";

/// Current conditions at a point. Either field may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReport {
    pub temperature_c: Option<f64>,
    pub precipitation_probability: Option<u8>,
}

impl WeatherReport {
    /// Prose used verbatim by the reply composer.
    pub fn summary(&self) -> String {
        let temperature = self
            .temperature_c
            .map(|value| value.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let rain = self.precipitation_probability.unwrap_or(0);
        format!("currently {temperature}°C with a chance of {rain}% to rain")
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: Option<f64>,
    precipitation_probability: Option<f64>,
}

impl From<ForecastResponse> for WeatherReport {
    fn from(response: ForecastResponse) -> Self {
        let Some(current) = response.current else {
            return Self::default();
        };

        Self {
            temperature_c: current.temperature_2m,
            precipitation_probability: current
                .precipitation_probability
                .map(|value| value.round().clamp(0.0, 100.0) as u8),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeather {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl WeatherLookup for OpenMeteoWeather {
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReport, LookupError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await?;
        check_status(&response)?;

        let forecast = response.json::<ForecastResponse>().await?;
        Ok(forecast.into())
    }
}
