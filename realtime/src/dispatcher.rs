use crate::connection::{ConnectionRegistry, PersonId};
use crate::message::{EventType, Frame, Message, Outbound};
use log::*;
use serde_json::Value;
use std::sync::Arc;

/// What happened to a single notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the person's live connection
    Sent,
    /// The person has no live connection; the event is dropped
    NotConnected,
    /// The bound connection's channel is already closed; the event is dropped
    Stale,
}

/// Delivers named events to a person's live connection, if they have one.
/// Delivery is at-most-once with no queueing or retry, and payloads are
/// sent as given.
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn notify(&self, person_id: &PersonId, event_name: &str, payload: Value) -> Delivery {
        let Some(handle) = self.registry.lookup(person_id) else {
            debug!("Person {person_id} not connected, dropping {event_name} event");
            return Delivery::NotConnected;
        };

        match handle.send(Outbound::Frame(Frame::new(event_name, payload))) {
            Ok(()) => {
                trace!(
                    "Sent {event_name} event to {person_id} on connection {}",
                    handle.id()
                );
                Delivery::Sent
            }
            Err(e) => {
                // The binding is left in place; the socket task unbinds it on exit.
                warn!(
                    "Dropping {event_name} event for {person_id}: connection {} is already closed ({e})",
                    handle.id()
                );
                Delivery::Stale
            }
        }
    }

    /// Send a typed message to its recipient
    pub fn send_message(&self, message: Message) -> Delivery {
        let event_type = message.event.event_type();
        self.notify(&message.recipient, event_type, message.event.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionHandle;
    use crate::message::Event;
    use entity::{roles::Role, Id};
    use serde_json::json;
    use tokio::sync::mpsc;

    #[test]
    fn notify_pushes_frame_to_bound_connection() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Dispatcher::new(registry.clone());
        let person = Id::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.bind(person, Role::Rider, ConnectionHandle::new(tx));

        let delivery = dispatcher.notify(&person, "ride-confirmed", json!({ "id": 7 }));

        assert_eq!(delivery, Delivery::Sent);
        assert_eq!(
            rx.try_recv().unwrap(),
            Outbound::Frame(Frame::new("ride-confirmed", json!({ "id": 7 })))
        );
    }

    #[test]
    fn notify_without_binding_is_a_silent_no_op() {
        let dispatcher = Dispatcher::new(Arc::new(ConnectionRegistry::new()));

        let delivery = dispatcher.notify(&Id::new_v4(), "new-ride", json!({}));

        assert_eq!(delivery, Delivery::NotConnected);
    }

    #[test]
    fn notify_on_closed_channel_reports_stale() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Dispatcher::new(registry.clone());
        let person = Id::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        registry.bind(person, Role::Captain, ConnectionHandle::new(tx));
        drop(rx);

        assert_eq!(
            dispatcher.notify(&person, "new-ride", json!({})),
            Delivery::Stale
        );
        assert!(
            registry.lookup(&person).is_some(),
            "binding stays until the socket task unbinds it"
        );
    }

    #[test]
    fn replaced_connection_no_longer_receives_events() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Dispatcher::new(registry.clone());
        let person = Id::new_v4();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        registry.bind(person, Role::Rider, ConnectionHandle::new(tx1));
        registry.bind(person, Role::Rider, ConnectionHandle::new(tx2));

        dispatcher.send_message(Message {
            event: Event::RideEnded {
                ride: json!({ "status": "completed" }),
            },
            recipient: person,
        });

        assert!(rx1.try_recv().is_err());
        assert!(matches!(rx2.try_recv(), Ok(Outbound::Frame(frame)) if frame.event == "ride-ended"));
    }
}
