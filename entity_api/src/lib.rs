//! Storage for rides, riders and captains.
//!
//! The rest of the workspace talks to storage only through [`Repository`],
//! a keyed store with single-record atomicity and nothing more. [`Database`]
//! bundles one repository per entity and is what gets passed around as `db`.
//! The in-process [`memory::InMemoryRepository`] backs the server binary and
//! the tests.

use async_trait::async_trait;
use std::sync::Arc;

pub use entity::{captains, riders, rides, Id};

pub mod captain;
pub mod error;
pub mod memory;
pub mod ride;
pub mod rider;
pub mod seed;

pub use seed::seed_database;

use error::Error;

/// Anything that can be stored in a [`Repository`].
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Id;
}

impl Record for rides::Model {
    fn id(&self) -> Id {
        self.id
    }
}

impl Record for riders::Model {
    fn id(&self) -> Id {
        self.id
    }
}

impl Record for captains::Model {
    fn id(&self) -> Id {
        self.id
    }
}

/// Keyed store for one entity type.
#[async_trait]
pub trait Repository<M: Record>: Send + Sync {
    async fn find_by_id(&self, id: Id) -> Result<M, Error>;

    /// Stores a new record. Fails if the id is already taken.
    async fn insert(&self, model: M) -> Result<M, Error>;

    /// Replaces an existing record. Fails if the id is unknown.
    async fn update(&self, model: M) -> Result<M, Error>;
}

/// One repository per entity.
#[derive(Clone)]
pub struct Database {
    pub rides: Arc<dyn Repository<rides::Model>>,
    pub riders: Arc<dyn Repository<riders::Model>>,
    pub captains: Arc<dyn Repository<captains::Model>>,
}

impl Database {
    pub fn new(
        rides: Arc<dyn Repository<rides::Model>>,
        riders: Arc<dyn Repository<riders::Model>>,
        captains: Arc<dyn Repository<captains::Model>>,
    ) -> Self {
        Self {
            rides,
            riders,
            captains,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(memory::InMemoryRepository::new()),
            Arc::new(memory::InMemoryRepository::new()),
            Arc::new(memory::InMemoryRepository::new()),
        )
    }
}
