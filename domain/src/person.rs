//! The two kinds of people the system serves, each with its own record.

use crate::error::{Error, ErrorKind};
use crate::jwt::Identity;
use entity::{captains, riders, roles::Role, Id};
use entity_api::{captain, rider, Database};
use log::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Person {
    Rider(riders::Model),
    Captain(captains::Model),
}

impl Person {
    pub fn id(&self) -> Id {
        match self {
            Person::Rider(rider) => rider.id,
            Person::Captain(captain) => captain.id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Person::Rider(_) => Role::Rider,
            Person::Captain(_) => Role::Captain,
        }
    }

    /// Loads the record behind an authenticated identity. A token for a
    /// person that no longer exists is treated as unauthorized.
    pub async fn resolve(db: &Database, identity: &Identity) -> Result<Person, Error> {
        let person = match identity.role {
            Role::Rider => rider::find_by_id(db, identity.person_id)
                .await
                .map(Person::Rider),
            Role::Captain => captain::find_by_id(db, identity.person_id)
                .await
                .map(Person::Captain),
        };

        person.map_err(Error::from).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                warn!(
                    "Authenticated {} {} has no record",
                    identity.role, identity.person_id
                );
                Error::unauthorized()
            } else {
                err
            }
        })
    }
}
