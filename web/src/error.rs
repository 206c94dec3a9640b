use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use domain::error::{Error as DomainError, ErrorKind};

extern crate log;
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status_code: u16,
    message: String,
}

impl Error {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self.0.kind() {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ErrorKind::AlreadyAssigned => (
                StatusCode::CONFLICT,
                "Ride is no longer available".to_string(),
            ),
            ErrorKind::Forbidden => (
                StatusCode::FORBIDDEN,
                "Ride is assigned to another captain".to_string(),
            ),
            ErrorKind::InvalidOtp => (StatusCode::BAD_REQUEST, "Invalid OTP".to_string()),
            ErrorKind::NotAccepted => (StatusCode::BAD_REQUEST, "Ride not accepted".to_string()),
            ErrorKind::NotOngoing => (StatusCode::BAD_REQUEST, "Ride not ongoing".to_string()),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ErrorKind::UpstreamUnavailable => (
                StatusCode::BAD_GATEWAY,
                "Maps provider unavailable".to_string(),
            ),
            // Validation failures carry their reason as the source.
            ErrorKind::Invalid => (
                StatusCode::UNPROCESSABLE_ENTITY,
                self.0
                    .source
                    .as_ref()
                    .map(|source| source.to_string())
                    .unwrap_or_else(|| "Unprocessable entity".to_string()),
            ),
            ErrorKind::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Request failed with {status}: {:?}", self.0);
        } else {
            debug!("Request rejected with {status}: {:?}", self.0.error_kind);
        }

        (
            status,
            Json(ErrorBody {
                status_code: status.into(),
                message,
            }),
        )
            .into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
