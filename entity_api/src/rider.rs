use super::error::Error;
use crate::Database;
use entity::riders::Model;
use entity::Id;
use log::*;

pub async fn create(db: &Database, rider_model: Model) -> Result<Model, Error> {
    debug!("New Rider Model to be inserted: {}", rider_model.id);
    db.riders.insert(rider_model).await
}

pub async fn find_by_id(db: &Database, id: Id) -> Result<Model, Error> {
    db.riders.find_by_id(id).await
}
