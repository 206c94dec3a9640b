//! Real-time delivery of ride events over live connections.
//!
//! # Architecture
//!
//! - **Single binding per person**: a person has at most one live connection.
//!   A new `join` replaces the previous binding and hands the old handle back
//!   so the transport can close it.
//! - **Guarded cleanup**: a disconnect only removes the binding if it still
//!   points at the disconnecting connection, so a late disconnect from an old
//!   socket cannot clobber a newer one.
//! - **Best-effort delivery**: if a person is not connected the event is
//!   dropped and logged. Nothing is queued or retried.
//! - **Transport agnostic**: connections are channels of [`message::Outbound`]
//!   frames. The web layer pumps them into websocket frames.
//! - **Pure protocol**: inbound socket messages are turned into a list of
//!   [`protocol::Effect`]s by [`protocol::SocketSession`] without touching any
//!   shared state, which keeps the protocol testable without a socket.
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry and type-safe ConnectionId / ConnectionHandle
//! - `dispatcher`: notify a person by id (delegates to ConnectionRegistry)
//! - `message`: outbound event types and wire frames
//! - `domain_event_handler`: bridges `events::DomainEvent`s to the dispatcher
//! - `protocol`: inbound socket messages and the effects they produce

pub mod connection;
pub mod dispatcher;
pub mod domain_event_handler;
pub mod message;
pub mod protocol;

pub use connection::{ConnectionHandle, ConnectionId, ConnectionRegistry};
pub use dispatcher::{Delivery, Dispatcher};
pub use domain_event_handler::RealtimeDomainEventHandler;
pub use message::{Event, EventType, Frame, Outbound};
pub use protocol::{Effect, SocketSession};
