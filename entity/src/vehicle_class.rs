use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Class of vehicle a rider can request and a captain can drive.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Deserialize, Serialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Auto,
    Car,
    Moto,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [VehicleClass::Auto, VehicleClass::Car, VehicleClass::Moto];
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleClass::Auto => write!(fmt, "auto"),
            VehicleClass::Car => write!(fmt, "car"),
            VehicleClass::Moto => write!(fmt, "moto"),
        }
    }
}
