use crate::{
    otp::Otp, ride_status::RideStatus, vehicle_class::VehicleClass, Coordinate,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Full ride record as stored. Carries the OTP, so it is only ever handed
/// back to the rider who requested it; everything else goes out as a
/// [`PublicRide`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = rides::Model)]
pub struct Model {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub captain_id: Option<Uuid>,
    pub pickup: String,
    pub pickup_coordinate: Coordinate,
    pub destination: String,
    pub destination_coordinate: Coordinate,
    pub vehicle_class: VehicleClass,
    /// Fare per vehicle class, fixed when the ride is requested.
    pub fare: BTreeMap<VehicleClass, f64>,
    pub otp: Otp,
    pub status: RideStatus,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn public(&self) -> PublicRide {
        PublicRide::from(self)
    }
}

/// Ride fields that are safe to send to captains and over the event channel.
/// There is no OTP field here at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = rides::PublicRide)]
pub struct PublicRide {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub captain_id: Option<Uuid>,
    pub pickup: String,
    pub pickup_coordinate: Coordinate,
    pub destination: String,
    pub vehicle_class: VehicleClass,
    pub fare: BTreeMap<VehicleClass, f64>,
    pub status: RideStatus,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Model> for PublicRide {
    fn from(ride: &Model) -> Self {
        Self {
            id: ride.id,
            rider_id: ride.rider_id,
            captain_id: ride.captain_id,
            pickup: ride.pickup.clone(),
            pickup_coordinate: ride.pickup_coordinate,
            destination: ride.destination.clone(),
            vehicle_class: ride.vehicle_class,
            fare: ride.fare.clone(),
            status: ride.status,
            distance_meters: ride.distance_meters,
            duration_seconds: ride.duration_seconds,
            created_at: ride.created_at,
            updated_at: ride.updated_at,
        }
    }
}
