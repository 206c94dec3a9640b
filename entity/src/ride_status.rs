use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a ride through its lifecycle. Rides only ever move forward
/// through these states, one step at a time.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Default, Serialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    /// Rider asked for a ride, no captain bound yet
    #[default]
    Requested,
    /// A captain accepted and is on the way to the pickup
    Accepted,
    /// Captain verified the rider's OTP and the trip is underway
    Ongoing,
    /// Trip finished
    Completed,
}

impl RideStatus {
    /// The single state this status may advance to, if any.
    pub fn next(self) -> Option<RideStatus> {
        match self {
            RideStatus::Requested => Some(RideStatus::Accepted),
            RideStatus::Accepted => Some(RideStatus::Ongoing),
            RideStatus::Ongoing => Some(RideStatus::Completed),
            RideStatus::Completed => None,
        }
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RideStatus::Requested => write!(fmt, "requested"),
            RideStatus::Accepted => write!(fmt, "accepted"),
            RideStatus::Ongoing => write!(fmt, "ongoing"),
            RideStatus::Completed => write!(fmt, "completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_advance_one_step_at_a_time() {
        assert_eq!(RideStatus::Requested.next(), Some(RideStatus::Accepted));
        assert_eq!(RideStatus::Accepted.next(), Some(RideStatus::Ongoing));
        assert_eq!(RideStatus::Ongoing.next(), Some(RideStatus::Completed));
        assert_eq!(RideStatus::Completed.next(), None);
    }

    #[test]
    fn statuses_are_ordered_by_progress() {
        assert!(RideStatus::Requested < RideStatus::Accepted);
        assert!(RideStatus::Accepted < RideStatus::Ongoing);
        assert!(RideStatus::Ongoing < RideStatus::Completed);
    }
}
