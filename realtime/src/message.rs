use crate::connection::PersonId;
use serde::Serialize;
use serde_json::Value;

/// Trait for getting the wire event name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// Events pushed to a connected rider or captain. Ride payloads must already
/// be stripped of the OTP by whoever builds the event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A ride near this captain is waiting for someone to accept it
    NewRide { ride: Value },
    /// A captain accepted the rider's ride
    RideConfirmed { ride: Value },
    /// The captain verified the OTP
    RideStarted { ride: Value },
    /// The ride is completed
    RideEnded { ride: Value },
    /// An inbound socket message was rejected
    Error { message: String },
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::NewRide { .. } => "new-ride",
            Event::RideConfirmed { .. } => "ride-confirmed",
            Event::RideStarted { .. } => "ride-started",
            Event::RideEnded { .. } => "ride-ended",
            Event::Error { .. } => "error",
        }
    }
}

impl Event {
    /// The `data` part of the frame. Ride events carry the ride itself.
    pub fn payload(&self) -> Value {
        match self {
            Event::NewRide { ride }
            | Event::RideConfirmed { ride }
            | Event::RideStarted { ride }
            | Event::RideEnded { ride } => ride.clone(),
            Event::Error { message } => serde_json::json!({ "message": message }),
        }
    }

    pub fn into_frame(self) -> Frame {
        Frame {
            event: self.event_type().to_string(),
            data: self.payload(),
        }
    }
}

/// One event as it goes over the wire: `{"event": "...", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub event: String,
    pub data: Value,
}

impl Frame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// What travels down a connection's channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Frame(Frame),
    /// The connection was replaced by a newer one for the same person
    Close,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub event: Event,
    pub recipient: PersonId,
}
