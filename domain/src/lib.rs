//! Ride dispatch domain layer.
//!
//! Owns the ride lifecycle, captain presence, fare estimation, the maps
//! collaborators and session verification. Storage comes in through
//! `entity_api::Database`, notifications leave through an
//! `events::EventPublisher`; this crate knows nothing about sockets or HTTP.

// Re-exports from `entity` crate via `entity_api`
pub use entity::{
    captain_status, otp::Otp, ride_status, roles, vehicle_class, Coordinate,
};
pub use entity_api::{captains, riders, rides, Database, Id};

pub mod captain_location;
pub mod error;
pub mod fare;
pub mod gateway;
pub mod geo;
pub mod jwt;
pub mod maps;
pub mod otp;
pub mod person;
pub mod ride;
