use std::env;
use std::str::FromStr;

use anyhow::{bail, Result};
use sanchari_core::DEFAULT_ATTRACTION_CAP;

const MAX_TIMEOUT_SECS: u64 = 60;
const MAX_ATTRACTION_CAP: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub geocoder_url: String,
    pub weather_url: String,
    pub places_url: String,
    pub user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub weather_timeout_secs: u64,
    pub places_timeout_secs: u64,
    pub places_radius_meters: u32,
    pub places_fetch_limit: u32,
    pub attraction_cap: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            geocoder_url: "https://nominatim.openstreetmap.org/search".to_string(),
            weather_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            places_url: "https://overpass-api.de/api/interpreter".to_string(),
            user_agent: "SanchariAI/1.0 (+https://github.com/sanchari-ai)".to_string(),
            geocoder_timeout_secs: 10,
            weather_timeout_secs: 5,
            places_timeout_secs: 25,
            places_radius_meters: 20_000,
            places_fetch_limit: 20,
            attraction_cap: DEFAULT_ATTRACTION_CAP,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `SANCHARI_*` variables. Values that fail to
    /// parse keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            geocoder_url: env_string("SANCHARI_GEOCODER_URL", defaults.geocoder_url),
            weather_url: env_string("SANCHARI_WEATHER_URL", defaults.weather_url),
            places_url: env_string("SANCHARI_PLACES_URL", defaults.places_url),
            user_agent: env_string("SANCHARI_USER_AGENT", defaults.user_agent),
            geocoder_timeout_secs: env_parse(
                "SANCHARI_GEOCODER_TIMEOUT_SECS",
                defaults.geocoder_timeout_secs,
            ),
            weather_timeout_secs: env_parse(
                "SANCHARI_WEATHER_TIMEOUT_SECS",
                defaults.weather_timeout_secs,
            ),
            places_timeout_secs: env_parse(
                "SANCHARI_PLACES_TIMEOUT_SECS",
                defaults.places_timeout_secs,
            ),
            places_radius_meters: env_parse(
                "SANCHARI_PLACES_RADIUS_METERS",
                defaults.places_radius_meters,
            ),
            places_fetch_limit: env_parse("SANCHARI_PLACES_FETCH_LIMIT", defaults.places_fetch_limit),
            attraction_cap: env_parse("SANCHARI_ATTRACTION_CAP", defaults.attraction_cap),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("geocoder_url", &self.geocoder_url),
            ("weather_url", &self.weather_url),
            ("places_url", &self.places_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("{name} must be an http(s) URL, got '{url}'");
            }
        }

        for (name, secs) in [
            ("geocoder_timeout_secs", self.geocoder_timeout_secs),
            ("weather_timeout_secs", self.weather_timeout_secs),
            ("places_timeout_secs", self.places_timeout_secs),
        ] {
            if secs == 0 || secs > MAX_TIMEOUT_SECS {
                bail!("{name} must be between 1 and {MAX_TIMEOUT_SECS} seconds, got {secs}");
            }
        }

        if self.attraction_cap == 0 || self.attraction_cap > MAX_ATTRACTION_CAP {
            bail!(
                "attraction_cap must be between 1 and {MAX_ATTRACTION_CAP}, got {}",
                self.attraction_cap
            );
        }

        if self.places_radius_meters == 0 {
            bail!("places_radius_meters must be positive");
        }

        if self.places_fetch_limit == 0 {
            bail!("places_fetch_limit must be positive");
        }

        Ok(())
    }
}

fn env_string(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}
