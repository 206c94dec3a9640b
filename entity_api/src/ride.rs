use super::error::Error;
use crate::Database;
use entity::rides::Model;
use entity::Id;
use log::*;

pub async fn create(db: &Database, ride_model: Model) -> Result<Model, Error> {
    debug!("New Ride Model to be inserted: {ride_model:?}");

    let now = chrono::Utc::now();
    let ride_model = Model {
        created_at: now,
        updated_at: now,
        ..ride_model
    };

    db.rides.insert(ride_model).await
}

pub async fn find_by_id(db: &Database, id: Id) -> Result<Model, Error> {
    db.rides.find_by_id(id).await.inspect_err(|_| {
        debug!("Ride with id {id} not found");
    })
}

/// Stores `ride_model` over the existing record, stamping `updated_at`.
pub async fn update(db: &Database, ride_model: Model) -> Result<Model, Error> {
    debug!(
        "Updating Ride {} to status {}",
        ride_model.id, ride_model.status
    );

    let ride_model = Model {
        updated_at: chrono::Utc::now(),
        ..ride_model
    };

    db.rides.update(ride_model).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use chrono::{Duration, Utc};
    use entity::{
        otp::Otp, ride_status::RideStatus, vehicle_class::VehicleClass, Coordinate,
    };
    use std::collections::BTreeMap;

    fn ride_model() -> Model {
        let long_ago = Utc::now() - Duration::days(30);
        Model {
            id: Id::new_v4(),
            rider_id: Id::new_v4(),
            captain_id: None,
            pickup: "12.9716,77.5946".to_string(),
            pickup_coordinate: Coordinate::new(12.9716, 77.5946),
            destination: "12.9352,77.6245".to_string(),
            destination_coordinate: Coordinate::new(12.9352, 77.6245),
            vehicle_class: VehicleClass::Moto,
            fare: BTreeMap::from([(VehicleClass::Moto, 82.0)]),
            otp: Otp::new("120934"),
            status: RideStatus::Requested,
            distance_meters: 4_100,
            duration_seconds: 900,
            created_at: long_ago,
            updated_at: long_ago,
        }
    }

    #[tokio::test]
    async fn create_stamps_timestamps() {
        let db = Database::in_memory();
        let before = Utc::now();

        let ride = create(&db, ride_model()).await.unwrap();

        assert!(ride.created_at >= before);
        assert_eq!(ride.created_at, ride.updated_at);
        assert_eq!(find_by_id(&db, ride.id).await.unwrap(), ride);
    }

    #[tokio::test]
    async fn update_moves_updated_at_forward() {
        let db = Database::in_memory();
        let ride = create(&db, ride_model()).await.unwrap();

        let accepted = update(
            &db,
            Model {
                status: RideStatus::Accepted,
                captain_id: Some(Id::new_v4()),
                ..ride.clone()
            },
        )
        .await
        .unwrap();

        assert_eq!(accepted.status, RideStatus::Accepted);
        assert!(accepted.updated_at >= ride.updated_at);
        assert_eq!(accepted.created_at, ride.created_at);
    }

    #[tokio::test]
    async fn find_by_unknown_id_is_not_found() {
        let db = Database::in_memory();

        let err = find_by_id(&db, Id::new_v4()).await.unwrap_err();

        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotFound);
    }
}
