//! The external address -> coordinate collaborator.
//!
//! Production geocoding goes through the Google Geocoding API over reqwest.
//! The `Fixed` variant pins every address to one coordinate for development
//! and tests (no network, no API key). No retries and no provider failover:
//! a geocoding failure is fatal to the current operation.

use serde::Deserialize;
use thiserror::Error;

use geonear_core::LatLng;

const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Errors from the geocoding collaborator.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The provider returned zero results for the address.
    #[error("could not find address: '{0}'")]
    AddressNotFound(String),

    /// Transport-level failure talking to the provider.
    #[error("geocoding request failed: {0}")]
    Request(String),

    /// The provider responded with something unusable.
    #[error("geocoding response malformed: {0}")]
    Malformed(String),
}

/// Address geocoder.
pub enum Geocoder {
    /// Google Geocoding API client.
    Google(GoogleGeocoder),
    /// Every address resolves to this coordinate. Development/test use.
    Fixed { latitude: f64, longitude: f64 },
}

impl Geocoder {
    pub fn google(api_key: String) -> Self {
        Geocoder::Google(GoogleGeocoder {
            client: reqwest::Client::new(),
            api_key,
        })
    }

    pub fn fixed(latitude: f64, longitude: f64) -> Self {
        Geocoder::Fixed { latitude, longitude }
    }

    /// Resolves an address to a validated coordinate.
    pub async fn geocode(&self, address: &str) -> Result<LatLng, GeocodeError> {
        match self {
            Geocoder::Google(g) => g.geocode(address).await,
            Geocoder::Fixed { latitude, longitude } => LatLng::new(*latitude, *longitude)
                .map_err(|e| GeocodeError::Malformed(e.to_string())),
        }
    }
}

/// Google Geocoding API client.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<LatLng, GeocodeError> {
        let response = self
            .client
            .get(GEOCODE_ENDPOINT)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| GeocodeError::Request(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GeocodeError::Request(err.to_string()))?;
        if !status.is_success() {
            return Err(GeocodeError::Request(format!(
                "provider returned {}: {}",
                status, body
            )));
        }

        let parsed: GeocodeResponse = serde_json::from_str(&body)
            .map_err(|err| GeocodeError::Malformed(err.to_string()))?;

        if parsed.status == "ZERO_RESULTS" || parsed.results.is_empty() {
            return Err(GeocodeError::AddressNotFound(address.to_string()));
        }
        if parsed.status != "OK" {
            return Err(GeocodeError::Request(format!(
                "provider status {}",
                parsed.status
            )));
        }

        let location = &parsed.results[0].geometry.location;
        LatLng::new(location.lat, location.lng)
            .map_err(|err| GeocodeError::Malformed(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: GeocodeLocation,
}

#[derive(Debug, Deserialize)]
struct GeocodeLocation {
    lat: f64,
    lng: f64,
}
