//! Last known position and availability of every captain.
//!
//! Presence is written only by the socket layer (location updates and
//! disconnects) and read by ride dispatch. Radius queries scan the whole
//! table, which is fine at the number of captains one process serves; the
//! [`NearbyCaptains`] trait is the seam for a spatial index.

use crate::geo::haversine_km;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use entity::{captain_status::CaptainStatus, Coordinate, Id};
use log::*;

#[derive(Debug, Clone, PartialEq)]
pub struct PresenceRecord {
    pub captain_id: Id,
    pub coordinate: Coordinate,
    pub status: CaptainStatus,
    pub updated_at: DateTime<Utc>,
}

/// Finds captains available for dispatch around a point.
pub trait NearbyCaptains: Send + Sync {
    /// Active captains within `radius_km` of `center`, nearest first, ties
    /// broken by captain id.
    fn query_within_radius(&self, center: Coordinate, radius_km: f64) -> Vec<Id>;
}

pub struct CaptainLocationIndex {
    presence: DashMap<Id, PresenceRecord>,
}

impl CaptainLocationIndex {
    pub fn new() -> Self {
        Self {
            presence: DashMap::new(),
        }
    }

    /// Records a new position for the captain and marks them active.
    pub fn update(&self, captain_id: Id, coordinate: Coordinate) -> PresenceRecord {
        let record = PresenceRecord {
            captain_id,
            coordinate,
            status: CaptainStatus::Active,
            updated_at: Utc::now(),
        };
        self.presence.insert(captain_id, record.clone());
        trace!(
            "Captain {captain_id} at {}, {}",
            coordinate.latitude,
            coordinate.longitude
        );
        record
    }

    /// Marks the captain inactive, keeping their last position, and returns
    /// the updated record. `None` if the captain never reported a location.
    pub fn mark_inactive(&self, captain_id: &Id) -> Option<PresenceRecord> {
        let mut record = self.presence.get_mut(captain_id)?;
        record.status = CaptainStatus::Inactive;
        record.updated_at = Utc::now();
        debug!("Captain {captain_id} marked inactive");
        Some(record.clone())
    }

    /// Active captains within `radius_km` of `center` with their distance in
    /// kilometres, nearest first.
    pub fn nearby(&self, center: Coordinate, radius_km: f64) -> Vec<(Id, f64)> {
        let mut found: Vec<(Id, f64)> = self
            .presence
            .iter()
            .filter(|record| record.status == CaptainStatus::Active)
            .map(|record| (record.captain_id, haversine_km(center, record.coordinate)))
            .filter(|(_, distance)| *distance <= radius_km)
            .collect();

        found.sort_by(|(id_a, d_a), (id_b, d_b)| d_a.total_cmp(d_b).then_with(|| id_a.cmp(id_b)));
        found
    }
}

impl NearbyCaptains for CaptainLocationIndex {
    fn query_within_radius(&self, center: Coordinate, radius_km: f64) -> Vec<Id> {
        self.nearby(center, radius_km)
            .into_iter()
            .map(|(captain_id, _)| captain_id)
            .collect()
    }
}

impl Default for CaptainLocationIndex {
    fn default() -> Self {
        Self::new()
    }
}
