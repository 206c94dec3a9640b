//! Per-class fares from a route estimate.

use crate::error::Error;
use crate::maps::{RouteEstimate, RouteEstimator};
use async_trait::async_trait;
use entity::{vehicle_class::VehicleClass, Coordinate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tariff {
    pub base: f64,
    pub per_km: f64,
    pub per_minute: f64,
}

impl Tariff {
    pub fn for_class(vehicle_class: VehicleClass) -> Self {
        match vehicle_class {
            VehicleClass::Auto => Tariff {
                base: 30.0,
                per_km: 10.0,
                per_minute: 2.0,
            },
            VehicleClass::Car => Tariff {
                base: 50.0,
                per_km: 15.0,
                per_minute: 3.0,
            },
            VehicleClass::Moto => Tariff {
                base: 20.0,
                per_km: 8.0,
                per_minute: 1.5,
            },
        }
    }

    /// Whole-currency fare for the route.
    pub fn price(&self, route: RouteEstimate) -> f64 {
        let km = route.distance_meters as f64 / 1000.0;
        let minutes = route.duration_seconds as f64 / 60.0;
        (self.base + km * self.per_km + minutes * self.per_minute).round()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareEstimate {
    pub fares: BTreeMap<VehicleClass, f64>,
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

impl FareEstimate {
    pub fn from_route(route: RouteEstimate) -> Self {
        let fares = VehicleClass::ALL
            .into_iter()
            .map(|vehicle_class| (vehicle_class, Tariff::for_class(vehicle_class).price(route)))
            .collect();

        Self {
            fares,
            distance_meters: route.distance_meters,
            duration_seconds: route.duration_seconds,
        }
    }
}

#[async_trait]
pub trait FareEstimator: Send + Sync {
    async fn estimate(&self, pickup: Coordinate, destination: Coordinate)
        -> Result<FareEstimate, Error>;
}

/// Prices the route the configured [`RouteEstimator`] reports between the
/// two points.
pub struct TariffFareEstimator {
    routes: Arc<dyn RouteEstimator>,
}

impl TariffFareEstimator {
    pub fn new(routes: Arc<dyn RouteEstimator>) -> Self {
        Self { routes }
    }
}

fn as_waypoint(coordinate: Coordinate) -> String {
    format!("{},{}", coordinate.latitude, coordinate.longitude)
}

#[async_trait]
impl FareEstimator for TariffFareEstimator {
    async fn estimate(
        &self,
        pickup: Coordinate,
        destination: Coordinate,
    ) -> Result<FareEstimate, Error> {
        let route = self
            .routes
            .estimate(&as_waypoint(pickup), &as_waypoint(destination))
            .await?;
        Ok(FareEstimate::from_route(route))
    }
}
