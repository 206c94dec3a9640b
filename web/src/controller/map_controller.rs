use crate::controller::ApiResponse;
use crate::extractors::authenticated_person::AuthenticatedPerson;
use crate::params::map::{CoordinatesParams, DistanceTimeParams, SuggestionsParams};
use crate::{AppState, Error};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::*;

/// GET coordinates for an address
#[utoipa::path(
    get,
    path = "/maps/get-coordinates",
    params(CoordinatesParams),
    responses(
        (status = 200, description = "Resolved coordinate", body = domain::Coordinate),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Address not found"),
        (status = 422, description = "Address too short"),
        (status = 502, description = "Maps provider unavailable"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_coordinates(
    AuthenticatedPerson(_person): AuthenticatedPerson,
    State(app_state): State<AppState>,
    Query(params): Query<CoordinatesParams>,
) -> Result<impl IntoResponse, Error> {
    params.validate()?;
    debug!("GET coordinates for address: {}", params.address);

    let coordinate = app_state.maps.geocoder.coordinates(&params.address).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coordinate)))
}

/// GET road distance and travel time between two addresses
#[utoipa::path(
    get,
    path = "/maps/get-distance-time",
    params(DistanceTimeParams),
    responses(
        (status = 200, description = "Distance in meters and duration in seconds"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No route found"),
        (status = 422, description = "Origin or destination too short"),
        (status = 502, description = "Maps provider unavailable"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_distance_time(
    AuthenticatedPerson(_person): AuthenticatedPerson,
    State(app_state): State<AppState>,
    Query(params): Query<DistanceTimeParams>,
) -> Result<impl IntoResponse, Error> {
    params.validate()?;
    debug!(
        "GET distance and time from {} to {}",
        params.origin, params.destination
    );

    let estimate = app_state
        .maps
        .routes
        .estimate(&params.origin, &params.destination)
        .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), estimate)))
}

/// GET place suggestions for partial input
#[utoipa::path(
    get,
    path = "/maps/get-suggestions",
    params(SuggestionsParams),
    responses(
        (status = 200, description = "Matching place descriptions", body = [String]),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Input too short"),
        (status = 502, description = "Maps provider unavailable"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_suggestions(
    AuthenticatedPerson(_person): AuthenticatedPerson,
    State(app_state): State<AppState>,
    Query(params): Query<SuggestionsParams>,
) -> Result<impl IntoResponse, Error> {
    params.validate()?;

    let suggestions = app_state.maps.places.suggestions(&params.input).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), suggestions)))
}
