//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. `web` flattens the tree with [`Error::kind`] to pick a status code.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    /// A ride lifecycle guard rejected the transition
    Ride(RideErrorKind),
    /// Credentials are missing, invalid, expired or revoked
    Unauthorized,
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    Other(String),
}

/// Entity errors bubbling up from `entity_api`, reduced to what the domain cares about.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    Other(String),
}

/// Failures of the maps collaborators.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The provider could not be reached or answered with an error
    Network,
    /// The provider has no coordinate for an address
    AddressNotFound,
    /// The provider found no route between two points
    RouteNotFound,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideErrorKind {
    /// The ride is no longer waiting for a captain
    AlreadyAssigned,
    /// The caller is not the captain bound to the ride
    Forbidden,
    /// The submitted passcode does not match
    InvalidOtp,
    /// The ride is not in `accepted`
    NotAccepted,
    /// The ride is not in `ongoing`
    NotOngoing,
}

/// Flat view of [`DomainErrorKind`] for callers that map errors to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyAssigned,
    Forbidden,
    InvalidOtp,
    NotAccepted,
    NotOngoing,
    Unauthorized,
    UpstreamUnavailable,
    Invalid,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)) => {
                ErrorKind::NotFound
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid)) => {
                ErrorKind::Invalid
            }
            DomainErrorKind::Internal(_) => ErrorKind::Internal,
            DomainErrorKind::External(ExternalErrorKind::AddressNotFound)
            | DomainErrorKind::External(ExternalErrorKind::RouteNotFound) => ErrorKind::NotFound,
            DomainErrorKind::External(_) => ErrorKind::UpstreamUnavailable,
            DomainErrorKind::Ride(RideErrorKind::AlreadyAssigned) => ErrorKind::AlreadyAssigned,
            DomainErrorKind::Ride(RideErrorKind::Forbidden) => ErrorKind::Forbidden,
            DomainErrorKind::Ride(RideErrorKind::InvalidOtp) => ErrorKind::InvalidOtp,
            DomainErrorKind::Ride(RideErrorKind::NotAccepted) => ErrorKind::NotAccepted,
            DomainErrorKind::Ride(RideErrorKind::NotOngoing) => ErrorKind::NotOngoing,
            DomainErrorKind::Unauthorized => ErrorKind::Unauthorized,
        }
    }

    pub(crate) fn ride(kind: RideErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Ride(kind),
        }
    }

    pub fn unauthorized() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Unauthorized,
        }
    }

    pub(crate) fn internal(message: String) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(message)),
        }
    }

    pub(crate) fn external(kind: ExternalErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {:?}", self.error_kind)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api`` layer to the `domain`` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::InvalidQueryTerm | EntityApiErrorKind::ValidationError => {
                EntityErrorKind::Invalid
            }
            ref other => EntityErrorKind::Other(format!("{other:?}")),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "JWT encoding related error".to_string(),
            )),
        }
    }
}
