//! Address lookups and route estimates used when pricing and creating rides.
//!
//! The domain only depends on the three traits below. [`Maps`] bundles one
//! implementation of each and is built from configuration: the Google Maps
//! gateway when an API key is present, the offline fallbacks otherwise.

use crate::error::Error;
use crate::gateway::{google_maps::GoogleMapsClient, offline};
use async_trait::async_trait;
use entity::Coordinate;
use log::*;
use serde::Serialize;
use service::config::Config;
use std::sync::Arc;

/// Road distance and travel time between two addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEstimate {
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn coordinates(&self, address: &str) -> Result<Coordinate, Error>;
}

#[async_trait]
pub trait RouteEstimator: Send + Sync {
    async fn estimate(&self, origin: &str, destination: &str) -> Result<RouteEstimate, Error>;
}

#[async_trait]
pub trait PlaceSuggestions: Send + Sync {
    async fn suggestions(&self, input: &str) -> Result<Vec<String>, Error>;
}

#[derive(Clone)]
pub struct Maps {
    pub geocoder: Arc<dyn Geocoder>,
    pub routes: Arc<dyn RouteEstimator>,
    pub places: Arc<dyn PlaceSuggestions>,
}

impl Maps {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        routes: Arc<dyn RouteEstimator>,
        places: Arc<dyn PlaceSuggestions>,
    ) -> Self {
        Self {
            geocoder,
            routes,
            places,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        match config.google_maps_api_key() {
            Some(api_key) => {
                info!(
                    "Using Google Maps at {} for geocoding and routing",
                    config.google_maps_base_url()
                );
                let client = Arc::new(GoogleMapsClient::new(
                    &api_key,
                    config.google_maps_base_url(),
                )?);
                Ok(Self::new(client.clone(), client.clone(), client))
            }
            None => {
                warn!("No Google Maps API key configured, using offline geocoding and routing");
                Ok(Self::offline())
            }
        }
    }

    /// Accepts only literal `lat,lng` addresses and estimates routes as
    /// straight lines.
    pub fn offline() -> Self {
        let geocoder = Arc::new(offline::LiteralCoordinateGeocoder);
        Self::new(
            geocoder.clone(),
            Arc::new(offline::StraightLineRouteEstimator::new(geocoder)),
            Arc::new(offline::NoSuggestions),
        )
    }
}
