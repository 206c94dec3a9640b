use crate::message::Outbound;
use dashmap::DashMap;
use entity::{roles::Role, Id};
use log::*;
use tokio::sync::mpsc::{error::SendError, UnboundedSender};

// Riders and captains share one id space.
pub type PersonId = Id;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sending half of one live connection. Two handles are equal when they
/// refer to the same connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: UnboundedSender<Outbound>,
}

impl ConnectionHandle {
    pub fn new(sender: UnboundedSender<Outbound>) -> Self {
        Self {
            id: ConnectionId::new(),
            sender,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn send(&self, outbound: Outbound) -> Result<(), SendError<Outbound>> {
        self.sender.send(outbound)
    }

    /// Asks the transport behind this handle to close the connection.
    pub fn close(&self) {
        if self.sender.send(Outbound::Close).is_err() {
            trace!("Connection {} already gone before close", self.id);
        }
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

/// A person's current live connection.
#[derive(Debug, Clone)]
pub struct Binding {
    pub role: Role,
    pub handle: ConnectionHandle,
}

/// Process-wide table of who is connected where. At most one binding per
/// person; every operation is a single map operation, so a person's binding
/// is replaced or removed atomically.
pub struct ConnectionRegistry {
    bindings: DashMap<PersonId, Binding>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            bindings: DashMap::new(),
        }
    }

    /// Binds `person_id` to `handle`, replacing any previous binding.
    /// Returns the replaced handle so the caller can close it.
    pub fn bind(
        &self,
        person_id: PersonId,
        role: Role,
        handle: ConnectionHandle,
    ) -> Option<ConnectionHandle> {
        let previous = self
            .bindings
            .insert(person_id, Binding { role, handle })
            .map(|binding| binding.handle);

        if let Some(previous) = &previous {
            debug!(
                "Rebound {role} {person_id}, replacing connection {}",
                previous.id()
            );
        }

        previous
    }

    /// Removes the binding for `person_id` only if it still points at `handle`.
    /// Returns the role the removed binding was made under.
    pub fn unbind(&self, person_id: &PersonId, handle: &ConnectionHandle) -> Option<Role> {
        let removed = self
            .bindings
            .remove_if(person_id, |_, binding| binding.handle == *handle)
            .map(|(_, binding)| binding.role);

        if removed.is_none() {
            debug!(
                "Skipped unbind of {person_id}: connection {} is not the live binding",
                handle.id()
            );
        }

        removed
    }

    pub fn lookup(&self, person_id: &PersonId) -> Option<ConnectionHandle> {
        self.bindings
            .get(person_id)
            .map(|binding| binding.handle.clone())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
