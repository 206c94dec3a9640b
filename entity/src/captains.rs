use crate::vehicle_class::VehicleClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = captains::Model)]
pub struct Model {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub vehicle: Vehicle,
    pub created_at: DateTime<Utc>,
}

/// The vehicle a captain drives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub color: String,
    pub plate: String,
    pub capacity: u8,
    pub vehicle_class: VehicleClass,
}
