use crate::dispatcher::Dispatcher;
use crate::message::{Event, EventType, Message};
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to socket events and pushing them
/// to the people named in the event.
///
/// The domain layer decides who gets notified and has already removed the
/// OTP from the ride payload. This handler only routes.
pub struct RealtimeDomainEventHandler {
    dispatcher: Arc<Dispatcher>,
}

impl RealtimeDomainEventHandler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn send_to_people(&self, event: Event, person_ids: &[events::Id]) {
        for person_id in person_ids {
            self.dispatcher.send_message(Message {
                event: event.clone(),
                recipient: *person_id,
            });
        }
    }
}

#[async_trait]
impl EventHandler for RealtimeDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        let (outgoing, recipients) = match event {
            DomainEvent::RideRequested {
                ride,
                notify_captain_ids,
                ..
            } => (Event::NewRide { ride: ride.clone() }, notify_captain_ids),
            DomainEvent::RideConfirmed {
                ride,
                notify_user_ids,
                ..
            } => (Event::RideConfirmed { ride: ride.clone() }, notify_user_ids),
            DomainEvent::RideStarted {
                ride,
                notify_user_ids,
                ..
            } => (Event::RideStarted { ride: ride.clone() }, notify_user_ids),
            DomainEvent::RideEnded {
                ride,
                notify_user_ids,
                ..
            } => (Event::RideEnded { ride: ride.clone() }, notify_user_ids),
        };

        debug!(
            "Routing {} for ride {} to {} person(s)",
            outgoing.event_type(),
            event.ride_id(),
            recipients.len()
        );
        self.send_to_people(outgoing, recipients);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConnectionHandle, ConnectionRegistry};
    use crate::message::{Frame, Outbound};
    use entity::{roles::Role, Id};
    use serde_json::json;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn ride_requested_reaches_every_connected_candidate() {
        let registry = Arc::new(ConnectionRegistry::new());
        let handler = RealtimeDomainEventHandler::new(Arc::new(Dispatcher::new(registry.clone())));
        let (c1, c2, offline) = (Id::new_v4(), Id::new_v4(), Id::new_v4());
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        registry.bind(c1, Role::Captain, ConnectionHandle::new(tx1));
        registry.bind(c2, Role::Captain, ConnectionHandle::new(tx2));
        let ride = json!({ "id": "r1", "status": "requested" });

        handler
            .handle(&DomainEvent::RideRequested {
                ride_id: Id::new_v4(),
                ride: ride.clone(),
                notify_captain_ids: vec![c1, c2, offline],
            })
            .await;

        let expected = Outbound::Frame(Frame::new("new-ride", ride));
        assert_eq!(rx1.try_recv().unwrap(), expected);
        assert_eq!(rx2.try_recv().unwrap(), expected);
    }

    #[tokio::test]
    async fn ride_confirmed_goes_to_the_rider_only() {
        let registry = Arc::new(ConnectionRegistry::new());
        let handler = RealtimeDomainEventHandler::new(Arc::new(Dispatcher::new(registry.clone())));
        let (rider, captain) = (Id::new_v4(), Id::new_v4());
        let (rider_tx, mut rider_rx) = mpsc::unbounded_channel();
        let (captain_tx, mut captain_rx) = mpsc::unbounded_channel();
        registry.bind(rider, Role::Rider, ConnectionHandle::new(rider_tx));
        registry.bind(captain, Role::Captain, ConnectionHandle::new(captain_tx));

        handler
            .handle(&DomainEvent::RideConfirmed {
                ride_id: Id::new_v4(),
                ride: json!({ "status": "accepted" }),
                notify_user_ids: vec![rider],
            })
            .await;

        assert!(
            matches!(rider_rx.try_recv(), Ok(Outbound::Frame(frame)) if frame.event == "ride-confirmed")
        );
        assert!(captain_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn started_and_ended_keep_their_own_event_names() {
        let registry = Arc::new(ConnectionRegistry::new());
        let handler = RealtimeDomainEventHandler::new(Arc::new(Dispatcher::new(registry.clone())));
        let (rider, ride_id) = (Id::new_v4(), Id::new_v4());
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.bind(rider, Role::Rider, ConnectionHandle::new(tx));

        for event in [
            DomainEvent::RideStarted {
                ride_id,
                ride: json!({ "status": "ongoing" }),
                notify_user_ids: vec![rider],
            },
            DomainEvent::RideEnded {
                ride_id,
                ride: json!({ "status": "completed" }),
                notify_user_ids: vec![rider],
            },
        ] {
            handler.handle(&event).await;
        }

        let names: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|outbound| match outbound {
                Outbound::Frame(frame) => frame.event,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["ride-started", "ride-ended"]);
    }
}
