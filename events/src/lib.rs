//! Event system infrastructure for ride dispatch.
//!
//! This crate provides the event system that decouples the ride lifecycle
//! from real-time delivery concerns (like pushing to a rider's socket).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all ride lifecycle events
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Ride data is carried as serialized JSON values
//! that the domain layer has already stripped of the OTP.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Domain events emitted after a ride transition has been stored.
///
/// Every variant names the people to notify. The domain layer decides who
/// they are; handlers only route.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A rider requested a ride. Sent to every active captain near the pickup.
    RideRequested {
        ride_id: Id,
        /// Public ride fields, never the OTP.
        ride: Value,
        notify_captain_ids: Vec<Id>,
    },
    /// A captain accepted the ride. Sent to the rider.
    RideConfirmed {
        ride_id: Id,
        ride: Value,
        notify_user_ids: Vec<Id>,
    },
    /// The captain verified the OTP and the trip is underway. Sent to the rider.
    RideStarted {
        ride_id: Id,
        ride: Value,
        notify_user_ids: Vec<Id>,
    },
    /// The trip finished. Sent to the rider.
    RideEnded {
        ride_id: Id,
        ride: Value,
        notify_user_ids: Vec<Id>,
    },
}

impl DomainEvent {
    pub fn ride_id(&self) -> Id {
        match self {
            DomainEvent::RideRequested { ride_id, .. }
            | DomainEvent::RideConfirmed { ride_id, .. }
            | DomainEvent::RideStarted { ride_id, .. }
            | DomainEvent::RideEnded { ride_id, .. } => *ride_id,
        }
    }
}

/// Trait for handling domain events.
/// Implementations perform side effects like sending notifications.
/// A handler must not fail the transition that produced the event, so
/// `handle` returns nothing.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
