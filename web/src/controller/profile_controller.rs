use crate::controller::ApiResponse;
use crate::extractors::authenticated_person::{AuthenticatedCaptain, AuthenticatedRider};
use crate::Error;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::*;

/// GET the authenticated rider's own record
#[utoipa::path(
    get,
    path = "/users/profile",
    responses(
        (status = 200, description = "The calling rider", body = domain::riders::Model),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn rider_profile(
    AuthenticatedRider(rider): AuthenticatedRider,
) -> Result<impl IntoResponse, Error> {
    debug!("GET profile for rider {}", rider.id);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), rider)))
}

/// GET the authenticated captain's own record, vehicle included
#[utoipa::path(
    get,
    path = "/captains/profile",
    responses(
        (status = 200, description = "The calling captain", body = domain::captains::Model),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn captain_profile(
    AuthenticatedCaptain(captain): AuthenticatedCaptain,
) -> Result<impl IntoResponse, Error> {
    debug!("GET profile for captain {}", captain.id);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), captain)))
}
