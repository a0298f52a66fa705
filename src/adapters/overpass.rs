use crate::domain::model::{Coordinate, Place, PlaceCategory};
use crate::domain::ports::PlaceSearch;
use crate::utils::error::{MapError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

/// Overpass API client searching OSM nodes by `amenity` tag.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    endpoint: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl OverpassClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

/// Overpass QL for nodes with `amenity={tag}` within `radius_m` of `center`.
pub fn overpass_query(tag: &str, center: Coordinate, radius_m: u32) -> String {
    format!(
        "[out:json];node[\"amenity\"=\"{}\"](around:{},{},{});out;",
        tag, radius_m, center.lat, center.lon
    )
}

#[async_trait]
impl PlaceSearch for OverpassClient {
    async fn search(
        &self,
        category: &PlaceCategory,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<Place>> {
        let query = overpass_query(&category.tag, center, radius_m);
        tracing::debug!("Overpass query to {}: {}", self.endpoint, query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Overpass response status: {}", status);
        if !status.is_success() {
            return Err(MapError::UnexpectedResponse {
                service: "overpass".to_string(),
                message: format!("status {}", status),
            });
        }

        let body: OverpassResponse = response.json().await?;
        tracing::debug!("Overpass returned {} elements", body.elements.len());

        let places = body
            .elements
            .into_iter()
            .map(|element| {
                let label = element
                    .tags
                    .get("name")
                    .filter(|name| !name.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| category.fallback_label());
                Place {
                    label,
                    position: Coordinate::new(element.lat, element.lon),
                    category: category.clone(),
                }
            })
            .collect();

        Ok(places)
    }
}
