//! Websocket transport for the real-time protocol.
//!
//! The protocol itself (what `join` and location updates mean) lives in the
//! `realtime` crate. This module upgrades authenticated requests, pumps
//! frames in both directions and applies the effects the protocol returns.

pub(crate) mod handler;
