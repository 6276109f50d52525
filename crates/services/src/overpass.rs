use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{check_status, LookupError};
use crate::PlacesLookup;

/// Tourist attractions from an Overpass interpreter endpoint.
#[derive(Debug, Clone)]
pub struct OverpassPlaces {
    client: Client,
    base_url: String,
    fetch_limit: u32,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl OverpassPlaces {
    pub fn new(client: Client, base_url: impl Into<String>, fetch_limit: u32) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            fetch_limit,
        }
    }
}

impl PlacesLookup for OverpassPlaces {
    async fn attraction_names(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
    ) -> Result<Vec<String>, LookupError> {
        let query = attraction_query(latitude, longitude, radius_meters, self.fetch_limit);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("data", query)])
            .send()
            .await?;
        check_status(&response)?;

        let body = response.json::<OverpassResponse>().await?;
        Ok(named_elements(body))
    }
}

fn attraction_query(latitude: f64, longitude: f64, radius_meters: u32, limit: u32) -> String {
    format!(
        "[out:json];node[\"tourism\"=\"attraction\"](around:{radius_meters},{latitude},{longitude});out {limit};"
    )
}

fn named_elements(body: OverpassResponse) -> Vec<String> {
    body.elements
        .into_iter()
        .filter_map(|mut element| element.tags.remove("name"))
        .collect()
}
