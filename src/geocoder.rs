//! Nominatim / OpenStreetMap geocoder client.
//!
//! The public instance allows at most one request per second and requires an
//! identifying User-Agent, which is set on the shared HTTP client.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::utils::truncate_body;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoder returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse geocoder response: {0}")]
    Parse(String),
}

impl GeocodeError {
    /// Transport failures, 5xx and rate limiting (429) mean the geocoder
    /// cannot answer right now, not that the place is unknown.
    pub fn is_unavailable(&self) -> bool {
        match self {
            GeocodeError::Request(_) => true,
            GeocodeError::Status { status, .. } => *status >= 500 || *status == 429,
            GeocodeError::Parse(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GeocodedLocation {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// Location-text to coordinates collaborator.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free text to coordinates; `Ok(None)` when nothing matches.
    async fn geocode(&self, location: &str) -> Result<Option<GeocodedLocation>, GeocodeError>;
}

#[derive(Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    url: String,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn geocode(&self, location: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
        debug!("Sending geocoding request");
        let response = self
            .client
            .get(&self.url)
            .query(&[("format", "json"), ("q", location), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Received geocoder response with status: {}", status);

        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Parse(e.to_string()))?;
        parse_response(&json)
    }
}

/// Parses a Nominatim search result array; `lat`/`lon` arrive as strings.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let results = body
        .as_array()
        .ok_or_else(|| GeocodeError::Parse("Nominatim response is not an array".to_string()))?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let coordinate = |key: &str| {
        first[key]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| GeocodeError::Parse(format!("Missing {key} in Nominatim response")))
    };

    let lat = coordinate("lat")?;
    let lon = coordinate("lon")?;
    let display_name = first["display_name"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| format!("{lat:.4}, {lon:.4}"));

    Ok(Some(GeocodedLocation {
        lat,
        lon,
        display_name,
    }))
}
