//! Google Maps Platform client for geocoding, distance matrix and place
//! autocomplete lookups.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::maps::{Geocoder, PlaceSuggestions, RouteEstimate, RouteEstimator};
use async_trait::async_trait;
use entity::Coordinate;
use log::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    description: String,
}

/// Google Maps API client
pub struct GoogleMapsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleMapsClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, Error> {
        if api_key.is_empty() {
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            });
        }

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, Error> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Google Maps {path}: {e:?}");
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google Maps {path} returned {status}: {error_text}");
            return Err(Error::external(ExternalErrorKind::Network));
        }

        response.json::<T>().await.map_err(|e| {
            warn!("Failed to parse Google Maps {path} response: {e:?}");
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                    "Unexpected Google Maps response".to_string(),
                )),
            }
        })
    }
}

// Any status besides OK and ZERO_RESULTS means the provider refused the call
// (quota, key, malformed request), which callers treat as unavailable.
fn provider_failure(path: &str, status: &str) -> Error {
    warn!("Google Maps {path} answered with status {status}");
    Error::external(ExternalErrorKind::Network)
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn coordinates(&self, address: &str) -> Result<Coordinate, Error> {
        debug!("Geocoding address: {address}");
        let response: GeocodeResponse = self.get("geocode/json", &[("address", address)]).await?;

        match response.status.as_str() {
            STATUS_OK => response
                .results
                .into_iter()
                .next()
                .map(|result| Coordinate::new(result.geometry.location.lat, result.geometry.location.lng))
                .ok_or_else(|| Error::external(ExternalErrorKind::AddressNotFound)),
            STATUS_ZERO_RESULTS => Err(Error::external(ExternalErrorKind::AddressNotFound)),
            other => Err(provider_failure("geocode", other)),
        }
    }
}

#[async_trait]
impl RouteEstimator for GoogleMapsClient {
    async fn estimate(&self, origin: &str, destination: &str) -> Result<RouteEstimate, Error> {
        debug!("Estimating route from {origin} to {destination}");
        let response: DistanceMatrixResponse = self
            .get(
                "distancematrix/json",
                &[("origins", origin), ("destinations", destination)],
            )
            .await?;

        if response.status != STATUS_OK {
            return Err(provider_failure("distancematrix", &response.status));
        }

        let element = response
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| Error::external(ExternalErrorKind::RouteNotFound))?;

        match (element.status.as_str(), element.distance, element.duration) {
            (STATUS_OK, Some(distance), Some(duration)) => Ok(RouteEstimate {
                distance_meters: distance.value,
                duration_seconds: duration.value,
            }),
            (status, _, _) => {
                debug!("No route from {origin} to {destination}: {status}");
                Err(Error::external(ExternalErrorKind::RouteNotFound))
            }
        }
    }
}

#[async_trait]
impl PlaceSuggestions for GoogleMapsClient {
    async fn suggestions(&self, input: &str) -> Result<Vec<String>, Error> {
        let response: AutocompleteResponse = self
            .get("place/autocomplete/json", &[("input", input)])
            .await?;

        match response.status.as_str() {
            STATUS_OK => Ok(response
                .predictions
                .into_iter()
                .map(|prediction| prediction.description)
                .collect()),
            STATUS_ZERO_RESULTS => Ok(Vec::new()),
            other => Err(provider_failure("place/autocomplete", other)),
        }
    }
}
