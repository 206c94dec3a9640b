//! Maps collaborators that work without network access.
//!
//! Addresses must be literal `lat,lng` pairs. Routes are the great-circle
//! distance travelled at a fixed average city speed.

use crate::error::{Error, ExternalErrorKind};
use crate::geo::haversine_km;
use crate::maps::{Geocoder, PlaceSuggestions, RouteEstimate, RouteEstimator};
use async_trait::async_trait;
use entity::Coordinate;
use std::sync::Arc;

/// Average speed assumed for straight-line estimates.
pub const AVERAGE_SPEED_KMH: f64 = 18.0;

pub struct LiteralCoordinateGeocoder;

impl LiteralCoordinateGeocoder {
    fn parse(address: &str) -> Option<Coordinate> {
        let (lat, lng) = address.split_once(',')?;
        let coordinate = Coordinate::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?);
        coordinate.is_valid().then_some(coordinate)
    }
}

#[async_trait]
impl Geocoder for LiteralCoordinateGeocoder {
    async fn coordinates(&self, address: &str) -> Result<Coordinate, Error> {
        Self::parse(address).ok_or_else(|| Error::external(ExternalErrorKind::AddressNotFound))
    }
}

pub struct StraightLineRouteEstimator {
    geocoder: Arc<dyn Geocoder>,
}

impl StraightLineRouteEstimator {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }
}

#[async_trait]
impl RouteEstimator for StraightLineRouteEstimator {
    async fn estimate(&self, origin: &str, destination: &str) -> Result<RouteEstimate, Error> {
        let from = self.geocoder.coordinates(origin).await?;
        let to = self.geocoder.coordinates(destination).await?;
        let km = haversine_km(from, to);

        Ok(RouteEstimate {
            distance_meters: (km * 1000.0).round() as u64,
            duration_seconds: (km / AVERAGE_SPEED_KMH * 3600.0).round() as u64,
        })
    }
}

pub struct NoSuggestions;

#[async_trait]
impl PlaceSuggestions for NoSuggestions {
    async fn suggestions(&self, _input: &str) -> Result<Vec<String>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn literal_pairs_geocode_to_themselves() {
        let coordinate = LiteralCoordinateGeocoder
            .coordinates(" 12.9716 , 77.5946 ")
            .await
            .unwrap();
        assert_eq!(coordinate, Coordinate::new(12.9716, 77.5946));
    }

    #[tokio::test]
    async fn free_text_and_out_of_range_pairs_are_not_found() {
        for address in ["MG Road", "12.9", "91.0,10.0", "a,b"] {
            let err = LiteralCoordinateGeocoder
                .coordinates(address)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound, "{address}");
        }
    }

    #[tokio::test]
    async fn straight_line_route_uses_average_speed() {
        let estimator = StraightLineRouteEstimator::new(Arc::new(LiteralCoordinateGeocoder));

        // One degree of latitude is about 111.2 km.
        let estimate = estimator.estimate("0,0", "1,0").await.unwrap();

        assert!((111_150..111_250).contains(&estimate.distance_meters));
        let expected_seconds = estimate.distance_meters as f64 / 1000.0 / AVERAGE_SPEED_KMH * 3600.0;
        assert!((estimate.duration_seconds as f64 - expected_seconds).abs() <= 1.0);
    }
}
