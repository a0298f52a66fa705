use crate::domain::model::{Coordinate, Route};
use crate::domain::ports::RouteProvider;
use crate::utils::error::{MapError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// OSRM HTTP route service (`/route/v1/{profile}/...`).
#[derive(Debug, Clone)]
pub struct OsrmClient {
    base_url: String,
    profile: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: LineString,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

/// GeoJSON geometry; positions are `[lon, lat]`.
#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<[f64; 2]>,
}

impl OsrmClient {
    pub fn new(base_url: impl Into<String>, profile: impl Into<String>) -> Self {
        Self::with_client(base_url, profile, Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        profile: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            profile: profile.into(),
            client,
        }
    }

    pub fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url.trim_end_matches('/'),
            self.profile,
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat
        )
    }
}

#[async_trait]
impl RouteProvider for OsrmClient {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Option<Route>> {
        let url = self.route_url(origin, destination);
        tracing::debug!("Requesting route: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("OSRM response status: {}", status);

        // OSRM answers "no route" with a 400 and a JSON body, so read it before judging the status.
        let body: OsrmResponse = match response.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(MapError::UnexpectedResponse {
                    service: "osrm".to_string(),
                    message: format!("status {}", status),
                })
            }
        };

        match body.code.as_str() {
            "Ok" => {}
            "NoRoute" | "NoSegment" => {
                tracing::debug!("OSRM found no route: {:?}", body.message);
                return Ok(None);
            }
            other => {
                return Err(MapError::UnexpectedResponse {
                    service: "osrm".to_string(),
                    message: format!(
                        "{}: {}",
                        other,
                        body.message.unwrap_or_else(|| format!("status {}", status))
                    ),
                })
            }
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .map(|route| Route {
                path: route
                    .geometry
                    .coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coordinate::new(lat, lon))
                    .collect(),
                distance_m: route.distance,
                duration_s: route.duration,
            })
            .filter(|route| !route.path.is_empty());

        Ok(route)
    }
}
