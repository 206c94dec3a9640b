use crate::extractors::bearer_token::BearerToken;
use crate::{AppState, Error};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use domain::person::Person;
use domain::{captains, riders};
use log::*;

/// The rider or captain behind the request's bearer token.
pub(crate) struct AuthenticatedPerson(pub Person);

impl FromRequestParts<AppState> for AuthenticatedPerson {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let identity = state.gatekeeper.authenticate(&token)?;
        let person = Person::resolve(&state.db, &identity).await?;
        trace!("Authenticated {} {}", person.role(), person.id());
        Ok(AuthenticatedPerson(person))
    }
}

pub(crate) struct AuthenticatedRider(pub riders::Model);

impl FromRequestParts<AppState> for AuthenticatedRider {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthenticatedPerson::from_request_parts(parts, state).await?.0 {
            Person::Rider(rider) => Ok(AuthenticatedRider(rider)),
            Person::Captain(captain) => {
                warn!("Captain {} called rider endpoint {}", captain.id, parts.uri.path());
                Err(domain::error::Error::unauthorized().into())
            }
        }
    }
}

pub(crate) struct AuthenticatedCaptain(pub captains::Model);

impl FromRequestParts<AppState> for AuthenticatedCaptain {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthenticatedPerson::from_request_parts(parts, state).await?.0 {
            Person::Captain(captain) => Ok(AuthenticatedCaptain(captain)),
            Person::Rider(rider) => {
                warn!("Rider {} called captain endpoint {}", rider.id, parts.uri.path());
                Err(domain::error::Error::unauthorized().into())
            }
        }
    }
}
