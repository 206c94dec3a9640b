use crate::{captain, error::Error, rider, Database};
use chrono::Utc;
use entity::{captains, riders, vehicle_class::VehicleClass, Id};
use log::*;

/// Ids of the people created by [`seed_database`].
#[derive(Debug, Clone)]
pub struct Seeded {
    pub rider_ids: Vec<Id>,
    pub captain_ids: Vec<Id>,
}

/// Populates an empty store with a couple of riders and one captain per
/// vehicle class so a development server has someone to dispatch to.
pub async fn seed_database(db: &Database) -> Result<Seeded, Error> {
    let now = Utc::now();
    let mut seeded = Seeded {
        rider_ids: Vec::new(),
        captain_ids: Vec::new(),
    };

    for (first_name, last_name, email) in [
        ("Asha", "Rao", "asha@example.com"),
        ("Vikram", "Shah", "vikram@example.com"),
    ] {
        let rider = rider::create(
            db,
            riders::Model {
                id: Id::new_v4(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                created_at: now,
            },
        )
        .await?;
        seeded.rider_ids.push(rider.id);
    }

    for (index, vehicle_class) in VehicleClass::ALL.into_iter().enumerate() {
        let captain = captain::create(
            db,
            captains::Model {
                id: Id::new_v4(),
                first_name: format!("Captain{}", index + 1),
                last_name: "Demo".to_string(),
                email: format!("captain{}@example.com", index + 1),
                vehicle: captains::Vehicle {
                    color: "white".to_string(),
                    plate: format!("KA01AB{:04}", index + 1),
                    capacity: match vehicle_class {
                        VehicleClass::Moto => 1,
                        VehicleClass::Auto => 3,
                        VehicleClass::Car => 4,
                    },
                    vehicle_class,
                },
                created_at: now,
            },
        )
        .await?;
        seeded.captain_ids.push(captain.id);
    }

    info!(
        "Seeded {} riders and {} captains",
        seeded.rider_ids.len(),
        seeded.captain_ids.len()
    );

    Ok(seeded)
}
