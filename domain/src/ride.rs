//! Ride lifecycle: `requested -> accepted -> ongoing -> completed`.
//!
//! [`RideManager`] is the only writer of rides. Every transition runs under a
//! per-ride lock held from the read of the current record to the write of
//! the new one, so two captains racing to accept the same ride cannot both
//! succeed. Guards only validate; the status always moves exactly one step
//! along [`RideStatus::next`]. Notifications go out through the
//! [`EventPublisher`] before the lock is released, so a ride's events are
//! seen in the order its transitions happened. They never fail the
//! transition.
//!
//! The OTP stays on the stored record. Accept, Start and End hand back a
//! [`PublicRide`] and every event payload is built from one, so the code
//! only ever leaves the server in the direct answer to the requesting rider.

use crate::captain_location::NearbyCaptains;
use crate::error::{Error, RideErrorKind};
use crate::fare::{FareEstimate, FareEstimator};
use crate::maps::Geocoder;
use crate::otp;
use entity::rides::{Model, PublicRide};
use entity::{ride_status::RideStatus, vehicle_class::VehicleClass, Id};
use dashmap::DashMap;
use entity_api::{captain, ride, rider, Database};
use events::{DomainEvent, EventPublisher};
use log::*;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What a rider asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct RideRequest {
    pub rider_id: Id,
    pub pickup: String,
    pub destination: String,
    pub vehicle_class: VehicleClass,
}

pub struct RideManager {
    db: Arc<Database>,
    geocoder: Arc<dyn Geocoder>,
    fares: Arc<dyn FareEstimator>,
    nearby: Arc<dyn NearbyCaptains>,
    events: EventPublisher,
    dispatch_radius_km: f64,
    ride_locks: DashMap<Id, Arc<Mutex<()>>>,
}

impl RideManager {
    pub fn new(
        db: Arc<Database>,
        geocoder: Arc<dyn Geocoder>,
        fares: Arc<dyn FareEstimator>,
        nearby: Arc<dyn NearbyCaptains>,
        events: EventPublisher,
        dispatch_radius_km: f64,
    ) -> Self {
        Self {
            db,
            geocoder,
            fares,
            nearby,
            events,
            dispatch_radius_km,
            ride_locks: DashMap::new(),
        }
    }

    pub async fn find_by_id(&self, ride_id: Id) -> Result<Model, Error> {
        Ok(ride::find_by_id(&self.db, ride_id).await?)
    }

    /// Fares for every vehicle class between two addresses.
    pub async fn fare_quote(&self, pickup: &str, destination: &str) -> Result<FareEstimate, Error> {
        let pickup = self.geocoder.coordinates(pickup).await?;
        let destination = self.geocoder.coordinates(destination).await?;
        self.fares.estimate(pickup, destination).await
    }

    /// Stores a new ride and offers it to every active captain near the
    /// pickup. The returned record carries the OTP and must only go back to
    /// the requesting rider.
    pub async fn request(&self, request: RideRequest) -> Result<Model, Error> {
        rider::find_by_id(&self.db, request.rider_id).await?;

        let pickup_coordinate = self.geocoder.coordinates(&request.pickup).await?;
        let destination_coordinate = self.geocoder.coordinates(&request.destination).await?;
        let estimate = self
            .fares
            .estimate(pickup_coordinate, destination_coordinate)
            .await?;

        let now = chrono::Utc::now();
        let ride = ride::create(
            &self.db,
            Model {
                id: Id::new_v4(),
                rider_id: request.rider_id,
                captain_id: None,
                pickup: request.pickup,
                pickup_coordinate,
                destination: request.destination,
                destination_coordinate,
                vehicle_class: request.vehicle_class,
                fare: estimate.fares,
                otp: otp::generate(),
                status: RideStatus::Requested,
                distance_meters: estimate.distance_meters,
                duration_seconds: estimate.duration_seconds,
                created_at: now,
                updated_at: now,
            },
        )
        .await?;

        let candidates = self
            .nearby
            .query_within_radius(pickup_coordinate, self.dispatch_radius_km);
        info!(
            "Ride {} requested by {}, offering to {} captain(s)",
            ride.id,
            ride.rider_id,
            candidates.len()
        );

        self.events
            .publish(DomainEvent::RideRequested {
                ride_id: ride.id,
                ride: public_payload(&ride.public()),
                notify_captain_ids: candidates,
            })
            .await;

        Ok(ride)
    }

    /// Binds `captain_id` to a ride still waiting for one. Only the first
    /// accept wins; later ones fail with `AlreadyAssigned`.
    pub async fn accept(&self, ride_id: Id, captain_id: Id) -> Result<PublicRide, Error> {
        let captain = captain::find_by_id(&self.db, captain_id).await?;

        self.transition(
            ride_id,
            |ride| {
                if ride.status != RideStatus::Requested {
                    return Err(RideErrorKind::AlreadyAssigned);
                }
                ride.captain_id = Some(captain_id);
                Ok(())
            },
            |ride| {
                let mut payload = public_payload(&ride.public());
                if let (Value::Object(fields), Ok(captain)) =
                    (&mut payload, serde_json::to_value(&captain))
                {
                    fields.insert("captain".to_string(), captain);
                }
                DomainEvent::RideConfirmed {
                    ride_id,
                    ride: payload,
                    notify_user_ids: vec![ride.rider_id],
                }
            },
        )
        .await
    }

    /// Starts the trip once the bound captain presents the rider's OTP.
    pub async fn start(&self, ride_id: Id, captain_id: Id, otp: &str) -> Result<PublicRide, Error> {
        self.transition(
            ride_id,
            |ride| {
                if is_bound_to_other_captain(ride, captain_id) {
                    return Err(RideErrorKind::Forbidden);
                }
                if !ride.otp.matches(otp) {
                    return Err(RideErrorKind::InvalidOtp);
                }
                if ride.status != RideStatus::Accepted {
                    return Err(RideErrorKind::NotAccepted);
                }
                Ok(())
            },
            |ride| DomainEvent::RideStarted {
                ride_id,
                ride: public_payload(&ride.public()),
                notify_user_ids: vec![ride.rider_id],
            },
        )
        .await
    }

    pub async fn end(&self, ride_id: Id, captain_id: Id) -> Result<PublicRide, Error> {
        self.transition(
            ride_id,
            |ride| {
                if is_bound_to_other_captain(ride, captain_id) {
                    return Err(RideErrorKind::Forbidden);
                }
                if ride.status != RideStatus::Ongoing {
                    return Err(RideErrorKind::NotOngoing);
                }
                Ok(())
            },
            |ride| DomainEvent::RideEnded {
                ride_id,
                ride: public_payload(&ride.public()),
                notify_user_ids: vec![ride.rider_id],
            },
        )
        .await
    }

    /// Reads the ride, runs `guard`, advances it one status and stores it,
    /// then publishes `event` for the stored record, all while holding the
    /// ride's lock. A rejected guard leaves the stored record untouched and
    /// publishes nothing.
    async fn transition<G, E>(&self, ride_id: Id, guard: G, event: E) -> Result<PublicRide, Error>
    where
        G: FnOnce(&mut Model) -> Result<(), RideErrorKind>,
        E: FnOnce(&Model) -> DomainEvent,
    {
        let lock = self.ride_locks.entry(ride_id).or_default().clone();
        let result = {
            let _guard = lock.lock().await;
            match self.apply(ride_id, guard).await {
                Ok(ride) => {
                    // Publishing before unlocking keeps event order equal to
                    // transition order for the same ride.
                    self.events.publish(event(&ride)).await;
                    Ok(ride.public())
                }
                Err(e) => Err(e),
            }
        };
        drop(lock);
        // Nobody else holds or waits on the lock once only the map's copy is left.
        self.ride_locks
            .remove_if(&ride_id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    async fn apply<G>(&self, ride_id: Id, guard: G) -> Result<Model, Error>
    where
        G: FnOnce(&mut Model) -> Result<(), RideErrorKind>,
    {
        let mut ride = ride::find_by_id(&self.db, ride_id).await?;
        let from = ride.status;

        if let Err(kind) = guard(&mut ride) {
            warn!("Ride {ride_id} rejected transition from {from}: {kind:?}");
            return Err(Error::ride(kind));
        }
        let Some(to) = from.next() else {
            error!("Ride {ride_id} passed a guard while already {from}");
            return Err(Error::internal(format!("ride {ride_id} is already {from}")));
        };
        ride.status = to;

        let ride = ride::update(&self.db, ride).await?;
        info!("Ride {ride_id} moved from {from} to {to}");
        Ok(ride)
    }
}

// A ride nobody accepted yet has no captain to mismatch; its status guard
// rejects the call instead.
fn is_bound_to_other_captain(ride: &Model, captain_id: Id) -> bool {
    ride.captain_id.is_some_and(|bound| bound != captain_id)
}

fn public_payload(ride: &PublicRide) -> Value {
    serde_json::to_value(ride).unwrap_or_else(|e| {
        error!("Failed to serialize ride {}: {e}", ride.id);
        Value::Null
    })
}
