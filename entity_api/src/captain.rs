use super::error::Error;
use crate::Database;
use entity::captains::Model;
use entity::Id;
use log::*;

pub async fn create(db: &Database, captain_model: Model) -> Result<Model, Error> {
    debug!(
        "New Captain Model to be inserted: {} ({})",
        captain_model.id, captain_model.vehicle.vehicle_class
    );
    db.captains.insert(captain_model).await
}

pub async fn find_by_id(db: &Database, id: Id) -> Result<Model, Error> {
    db.captains.find_by_id(id).await
}
