use uuid::Uuid;

pub mod captain_status;
pub mod captains;
pub mod coordinate;
pub mod otp;
pub mod ride_status;
pub mod riders;
pub mod rides;
pub mod roles;
pub mod vehicle_class;

pub use coordinate::Coordinate;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
