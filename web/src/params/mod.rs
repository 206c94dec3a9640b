//! This module holds typed parameters for various endpoint inputs.
//!
//! Serde checks the shape of a request; the `validate` methods here check
//! what serde cannot (minimum lengths, OTP format) before anything reaches
//! the domain layer. A failed check becomes a 422 whose message is the
//! reason.

use crate::Error;
use domain::error::{DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind};
use std::fmt;

pub(crate) mod map;
pub(crate) mod ride;

/// Shortest address or search input accepted.
pub(crate) const MIN_INPUT_LENGTH: usize = 3;

#[derive(Debug)]
pub(crate) struct ValidationError(String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

pub(crate) fn invalid(message: impl Into<String>) -> Error {
    DomainError {
        source: Some(Box::new(ValidationError(message.into()))),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid)),
    }
    .into()
}

pub(crate) fn require_min_length(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().chars().count() < MIN_INPUT_LENGTH {
        return Err(invalid(format!(
            "{field} must be at least {MIN_INPUT_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_inputs_are_rejected_after_trimming() {
        assert!(require_min_length("pickup", "  ab  ").is_err());
        assert!(require_min_length("pickup", "abc").is_ok());
    }
}
