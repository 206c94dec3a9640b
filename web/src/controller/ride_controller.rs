use crate::controller::ApiResponse;
use crate::extractors::authenticated_person::{AuthenticatedCaptain, AuthenticatedRider};
use crate::params::ride::{CreateParams, FareParams, RideIdParams, StartParams};
use crate::{AppState, Error};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::ride::RideRequest;
use log::*;

/// POST request a new ride
///
/// The response is the only place the ride's OTP is ever sent.
#[utoipa::path(
    post,
    path = "/rides/create",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Ride requested and offered to nearby captains", body = domain::rides::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Address not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 502, description = "Maps provider unavailable"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedRider(rider): AuthenticatedRider,
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    params.validate()?;
    debug!(
        "POST Create a {} ride for rider {}",
        params.vehicle_type, rider.id
    );

    let ride = app_state
        .rides
        .request(RideRequest {
            rider_id: rider.id,
            pickup: params.pickup,
            destination: params.destination,
            vehicle_class: params.vehicle_type,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), ride)),
    ))
}

/// GET fare per vehicle class between two addresses
#[utoipa::path(
    get,
    path = "/rides/get-fare",
    params(FareParams),
    responses(
        (status = 200, description = "Fare for every vehicle class"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Address not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 502, description = "Maps provider unavailable"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_fare(
    AuthenticatedRider(_rider): AuthenticatedRider,
    State(app_state): State<AppState>,
    Query(params): Query<FareParams>,
) -> Result<impl IntoResponse, Error> {
    params.validate()?;
    debug!(
        "GET fare from {} to {}",
        params.pickup, params.destination
    );

    let quote = app_state
        .rides
        .fare_quote(&params.pickup, &params.destination)
        .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), quote.fares)))
}

/// POST accept a requested ride
#[utoipa::path(
    post,
    path = "/rides/confirm",
    request_body = RideIdParams,
    responses(
        (status = 200, description = "Ride accepted by this captain", body = domain::rides::PublicRide),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Ride not found"),
        (status = 409, description = "Ride is no longer available"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn confirm(
    AuthenticatedCaptain(captain): AuthenticatedCaptain,
    State(app_state): State<AppState>,
    Json(params): Json<RideIdParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Confirm ride {} by captain {}", params.ride_id, captain.id);

    let ride = app_state.rides.accept(params.ride_id, captain.id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), ride)))
}

/// GET start an accepted ride with the rider's OTP
#[utoipa::path(
    get,
    path = "/rides/start-ride",
    params(StartParams),
    responses(
        (status = 200, description = "Ride is ongoing", body = domain::rides::PublicRide),
        (status = 400, description = "Invalid OTP or ride not accepted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Ride is assigned to another captain"),
        (status = 404, description = "Ride not found"),
        (status = 422, description = "OTP is not six digits"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn start_ride(
    AuthenticatedCaptain(captain): AuthenticatedCaptain,
    State(app_state): State<AppState>,
    Query(params): Query<StartParams>,
) -> Result<impl IntoResponse, Error> {
    params.validate()?;
    debug!("GET Start ride {} by captain {}", params.ride_id, captain.id);

    let ride = app_state
        .rides
        .start(params.ride_id, captain.id, &params.otp)
        .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), ride)))
}

/// POST complete an ongoing ride
#[utoipa::path(
    post,
    path = "/rides/end-ride",
    request_body = RideIdParams,
    responses(
        (status = 200, description = "Ride completed", body = domain::rides::PublicRide),
        (status = 400, description = "Ride not ongoing"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Ride is assigned to another captain"),
        (status = 404, description = "Ride not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn end_ride(
    AuthenticatedCaptain(captain): AuthenticatedCaptain,
    State(app_state): State<AppState>,
    Json(params): Json<RideIdParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST End ride {} by captain {}", params.ride_id, captain.id);

    let ride = app_state.rides.end(params.ride_id, captain.id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), ride)))
}
