//! Inbound socket protocol.
//!
//! A socket is authenticated before it is upgraded, so every session starts
//! knowing who is on the other end. Clients then announce themselves with
//! `join` and captains stream `update-location-captain` messages. Each
//! inbound message is turned into a list of [`Effect`]s; applying them to
//! the registry and the location index is up to the transport.

use crate::connection::PersonId;
use crate::message::Event;
use entity::{roles::Role, Coordinate};
use log::*;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum Inbound {
    #[serde(rename = "join")]
    Join(Join),
    #[serde(rename = "update-location-captain")]
    UpdateLocationCaptain(LocationUpdate),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    pub user_id: PersonId,
    pub user_type: Role,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub user_id: PersonId,
    pub location: Coordinate,
}

/// Something the transport must do in response to an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Bind this connection to the person, closing whatever it replaces
    Bind { person_id: PersonId, role: Role },
    /// Upsert the captain's presence as active at `coordinate`
    UpdateLocation {
        captain_id: PersonId,
        coordinate: Coordinate,
    },
    /// Remove this connection's binding if it is still the live one. When it
    /// was bound as a captain, the captain goes inactive.
    Unbind { person_id: PersonId },
    /// Answer on this connection only
    Reply(Event),
}

/// Per-connection protocol state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketSession {
    person_id: PersonId,
    role: Role,
    joined: bool,
}

impl SocketSession {
    /// A fresh session for a socket whose credentials resolved to `person_id`.
    pub fn new(person_id: PersonId, role: Role) -> Self {
        Self {
            person_id,
            role,
            joined: false,
        }
    }

    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Parses one text frame and handles it. Unparseable frames are answered
    /// with an error and leave the session unchanged.
    pub fn on_text(self, text: &str) -> (SocketSession, Vec<Effect>) {
        match serde_json::from_str::<Inbound>(text) {
            Ok(inbound) => self.handle(inbound),
            Err(e) => {
                warn!(
                    "Dropping malformed socket message from {} {}: {e}",
                    self.role, self.person_id
                );
                (self, vec![reject("Malformed message")])
            }
        }
    }

    pub fn handle(self, inbound: Inbound) -> (SocketSession, Vec<Effect>) {
        match inbound {
            Inbound::Join(join) => self.join(join),
            Inbound::UpdateLocationCaptain(update) => self.update_location(update),
        }
    }

    /// Effects to apply once the socket is gone.
    pub fn on_disconnect(self) -> Vec<Effect> {
        if self.joined {
            vec![Effect::Unbind {
                person_id: self.person_id,
            }]
        } else {
            Vec::new()
        }
    }

    fn join(self, join: Join) -> (SocketSession, Vec<Effect>) {
        if join.user_id != self.person_id || join.user_type != self.role {
            warn!(
                "Socket authenticated as {} {} tried to join as {} {}",
                self.role, self.person_id, join.user_type, join.user_id
            );
            return (self, vec![reject("Join identity does not match session")]);
        }

        info!("{} {} joined", self.role, self.person_id);
        (
            SocketSession {
                joined: true,
                ..self
            },
            vec![Effect::Bind {
                person_id: self.person_id,
                role: self.role,
            }],
        )
    }

    fn update_location(self, update: LocationUpdate) -> (SocketSession, Vec<Effect>) {
        if !self.joined || self.role != Role::Captain || update.user_id != self.person_id {
            warn!(
                "Socket {} {} (joined: {}) attempted to update location for captain {}. Denying.",
                self.role, self.person_id, self.joined, update.user_id
            );
            return (self, vec![reject("Not allowed to update this location")]);
        }

        if !update.location.is_valid() {
            warn!(
                "Invalid location from captain {}: {:?}",
                self.person_id, update.location
            );
            return (self, vec![reject("Invalid location")]);
        }

        (
            self,
            vec![Effect::UpdateLocation {
                captain_id: self.person_id,
                coordinate: update.location,
            }],
        )
    }
}

fn reject(message: &str) -> Effect {
    Effect::Reply(Event::Error {
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::EventType;
    use entity::Id;

    fn join_text(id: Id, user_type: &str) -> String {
        format!(r#"{{"event":"join","data":{{"userId":"{id}","userType":"{user_type}"}}}}"#)
    }

    fn location_text(id: Id, ltd: f64, lng: f64) -> String {
        format!(
            r#"{{"event":"update-location-captain","data":{{"userId":"{id}","location":{{"ltd":{ltd},"lng":{lng}}}}}}}"#
        )
    }

    fn is_error_reply(effects: &[Effect]) -> bool {
        matches!(effects, [Effect::Reply(event)] if event.event_type() == "error")
    }

    #[test]
    fn join_with_matching_identity_binds() {
        let captain = Id::new_v4();
        let session = SocketSession::new(captain, Role::Captain);

        let (session, effects) = session.on_text(&join_text(captain, "captain"));

        assert!(session.is_joined());
        assert_eq!(
            effects,
            vec![Effect::Bind {
                person_id: captain,
                role: Role::Captain
            }]
        );
    }

    #[test]
    fn rider_joins_as_user() {
        let rider = Id::new_v4();

        let (session, effects) =
            SocketSession::new(rider, Role::Rider).on_text(&join_text(rider, "user"));

        assert!(session.is_joined());
        assert_eq!(
            effects,
            vec![Effect::Bind {
                person_id: rider,
                role: Role::Rider
            }]
        );
    }

    #[test]
    fn join_as_someone_else_is_rejected() {
        let session = SocketSession::new(Id::new_v4(), Role::Rider);

        let (session, effects) = session.on_text(&join_text(Id::new_v4(), "user"));

        assert!(!session.is_joined());
        assert!(is_error_reply(&effects));
    }

    #[test]
    fn join_with_wrong_role_is_rejected() {
        let rider = Id::new_v4();

        let (session, effects) =
            SocketSession::new(rider, Role::Rider).on_text(&join_text(rider, "captain"));

        assert!(!session.is_joined());
        assert!(is_error_reply(&effects));
    }

    #[test]
    fn joined_captain_location_update_is_applied() {
        let captain = Id::new_v4();
        let (session, _) =
            SocketSession::new(captain, Role::Captain).on_text(&join_text(captain, "captain"));

        let (_, effects) = session.on_text(&location_text(captain, 12.97, 77.59));

        assert_eq!(
            effects,
            vec![Effect::UpdateLocation {
                captain_id: captain,
                coordinate: Coordinate::new(12.97, 77.59)
            }]
        );
    }

    #[test]
    fn location_update_before_join_is_rejected() {
        let captain = Id::new_v4();

        let (_, effects) =
            SocketSession::new(captain, Role::Captain).on_text(&location_text(captain, 1.0, 1.0));

        assert!(is_error_reply(&effects));
    }

    #[test]
    fn rider_cannot_update_a_location() {
        let rider = Id::new_v4();
        let (session, _) =
            SocketSession::new(rider, Role::Rider).on_text(&join_text(rider, "user"));

        let (_, effects) = session.on_text(&location_text(rider, 1.0, 1.0));

        assert!(is_error_reply(&effects));
    }

    #[test]
    fn out_of_range_location_is_rejected() {
        let captain = Id::new_v4();
        let (session, _) =
            SocketSession::new(captain, Role::Captain).on_text(&join_text(captain, "captain"));

        let (_, effects) = session.on_text(&location_text(captain, 123.0, 1.0));

        assert!(is_error_reply(&effects));
    }

    #[test]
    fn malformed_frame_is_answered_with_error() {
        let session = SocketSession::new(Id::new_v4(), Role::Rider);

        let (after, effects) = session.on_text("{not json");

        assert_eq!(after, session);
        assert!(is_error_reply(&effects));
    }

    #[test]
    fn disconnect_unbinds_only_after_join() {
        let captain = Id::new_v4();
        let fresh = SocketSession::new(captain, Role::Captain);
        assert!(fresh.on_disconnect().is_empty());

        let (joined, _) = fresh.on_text(&join_text(captain, "captain"));
        assert_eq!(
            joined.on_disconnect(),
            vec![Effect::Unbind { person_id: captain }]
        );
    }
}
