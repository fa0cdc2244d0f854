//! HTTP adapter for the Google Elevation web service.

use rayon::prelude::*;
use serde::Deserialize;

use crate::coord::{LatLng, LatLngEle, format_lat_lngs};
use crate::error::ElevationError;
use crate::traits::ElevationProvider;

/// Maximum number of locations the service accepts in a single request.
pub const MAX_LOCATIONS_PER_REQUEST: usize = 512;

/// Environment variable holding the service API key.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Clone)]
pub struct ElevationConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_locations_per_request: usize,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            api_key: None,
            timeout_secs: 10,
            max_locations_per_request: MAX_LOCATIONS_PER_REQUEST,
        }
    }
}

impl ElevationConfig {
    /// Defaults, with the API key taken from `GOOGLE_MAPS_API_KEY` when set and non-empty.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/elevation/json", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct ElevationClient {
    config: ElevationConfig,
    client: reqwest::blocking::Client,
}

impl ElevationClient {
    pub fn new(config: ElevationConfig) -> Result<Self, ElevationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(config, client))
    }

    /// Uses a pre-built HTTP client; `timeout_secs` is then left to that client.
    pub fn with_client(config: ElevationConfig, client: reqwest::blocking::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ElevationConfig {
        &self.config
    }

    fn fetch_batch(&self, batch: usize, points: &[LatLng]) -> Result<Vec<LatLngEle>, ElevationError> {
        tracing::debug!(batch, size = points.len(), "requesting elevations");

        let mut query = vec![("locations", format_lat_lngs(points))];
        if let Some(key) = &self.config.api_key {
            query.push(("key", key.clone()));
        }

        let body = self
            .client
            .get(self.config.endpoint())
            .query(&query)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<ElevationResponse>())?;

        body.into_points(points.len())
    }
}

impl ElevationProvider for ElevationClient {
    fn elevation_for(&self, points: &[LatLng]) -> Result<Vec<LatLngEle>, ElevationError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let per = self.config.max_locations_per_request.max(1);
        let batches = points
            .par_chunks(per)
            .enumerate()
            .map(|(batch, chunk)| self.fetch_batch(batch, chunk))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(batches.into_iter().flatten().collect())
    }
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<ElevationResult>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: f64,
    location: LatLng,
}

impl ElevationResponse {
    fn into_points(self, requested: usize) -> Result<Vec<LatLngEle>, ElevationError> {
        if self.status != "OK" {
            tracing::warn!(status = %self.status, message = ?self.error_message, "elevation service error");
            return Err(ElevationError::Status {
                status: self.status,
                message: self.error_message,
            });
        }
        if self.results.len() != requested {
            return Err(ElevationError::CountMismatch {
                requested,
                returned: self.results.len(),
            });
        }

        Ok(self
            .results
            .into_iter()
            .map(|r| r.location.with_elevation(r.elevation))
            .collect())
    }
}
