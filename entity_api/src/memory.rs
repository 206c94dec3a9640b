use crate::error::{EntityApiErrorKind, Error};
use crate::{Id, Record, Repository};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::*;

/// Process-local repository. Each record lives under its own shard lock, so
/// a single `insert` or `update` is atomic with respect to that record.
pub struct InMemoryRepository<M: Record> {
    records: DashMap<Id, M>,
}

impl<M: Record> InMemoryRepository<M> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<M: Record> Default for InMemoryRepository<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<M: Record> Repository<M> for InMemoryRepository<M> {
    async fn find_by_id(&self, id: Id) -> Result<M, Error> {
        self.records
            .get(&id)
            .map(|record| record.value().clone())
            .ok_or_else(Error::not_found)
    }

    async fn insert(&self, model: M) -> Result<M, Error> {
        match self.records.entry(model.id()) {
            Entry::Occupied(_) => {
                warn!("Record with id {} already exists", model.id());
                Err(Error {
                    source: None,
                    error_kind: EntityApiErrorKind::RecordAlreadyExists,
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(model.clone());
                Ok(model)
            }
        }
    }

    async fn update(&self, model: M) -> Result<M, Error> {
        match self.records.get_mut(&model.id()) {
            Some(mut existing) => {
                *existing = model.clone();
                Ok(model)
            }
            None => {
                error!("Record with id {} not found", model.id());
                Err(Error::not_found())
            }
        }
    }
}
