//! GeoNames search client
//!
//! Resolves a free-text location name to coordinates via the GeoNames
//! `searchJSON` endpoint, restricted to administrative areas (feature class
//! A) and populated places (feature class P), requesting a single best
//! match. The full response body is returned alongside the coordinates so
//! the store can keep it for auditing.
//!
//! GeoNames serves `lng`/`lat` as JSON strings; numeric values are accepted
//! too in case the provider ever changes that.

use std::time::Duration;

use async_trait::async_trait;
use atlas_core::sync::ports::Geocoder;
use atlas_domain::{AtlasError, ResolvedLocation, Result};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::InfraError;

/// Configuration for the GeoNames client
#[derive(Debug, Clone)]
pub struct GeoNamesClientConfig {
    /// Base URL of the search API (e.g. "https://secure.geonames.org")
    pub base_url: String,
    /// GeoNames account name sent with every lookup
    pub username: String,
    /// Timeout for API requests
    pub timeout: Duration,
}

/// HTTP client for the GeoNames search API.
pub struct GeoNamesClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
}

impl GeoNamesClient {
    /// Create a new client from configuration.
    pub fn new(config: GeoNamesClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| AtlasError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username,
        })
    }
}

#[async_trait]
impl Geocoder for GeoNamesClient {
    #[instrument(skip(self))]
    async fn resolve(&self, name: &str) -> Result<ResolvedLocation> {
        let url = format!("{}/searchJSON", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", name),
                ("maxRows", "1"),
                ("featureClass", "A"),
                ("featureClass", "P"),
                ("username", &self.username),
            ])
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AtlasError::RemoteApi(format!(
                "geocoding API returned HTTP {status} for '{name}'"
            )));
        }

        let body: Value = response.json().await.map_err(|err| {
            AtlasError::RemoteApi(format!("failed to parse geocoding response: {err}"))
        })?;

        // GeoNames reports errors (bad username, rate limits) as a status
        // payload inside a 200 response.
        if let Some(message) = body.pointer("/status/message").and_then(Value::as_str) {
            return Err(AtlasError::RemoteApi(format!("geocoding provider error: {message}")));
        }

        let first_match = body
            .pointer("/geonames/0")
            .ok_or_else(|| AtlasError::Geocode(format!("no geocoder matches for '{name}'")))?;

        let longitude = coordinate(first_match.get("lng")).ok_or_else(|| {
            AtlasError::Geocode(format!("match for '{name}' is missing a longitude"))
        })?;
        let latitude = coordinate(first_match.get("lat")).ok_or_else(|| {
            AtlasError::Geocode(format!("match for '{name}' is missing a latitude"))
        })?;

        debug!(location = name, longitude, latitude, "resolved location");

        Ok(ResolvedLocation { longitude, latitude, raw: body })
    }
}

/// Coordinate fields arrive as strings or numbers depending on the provider.
fn coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}
