use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_person::AuthenticatedPerson, bearer_token::BearerToken,
};
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::*;

/// POST end the current session
///
/// The bearer token used for this call is revoked and rejected from then on.
#[utoipa::path(
    post,
    path = "/sessions/logout",
    responses(
        (status = 200, description = "Token revoked"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    AuthenticatedPerson(person): AuthenticatedPerson,
    BearerToken(token): BearerToken,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST logout for {} {}", person.role(), person.id());

    app_state.gatekeeper.revoke(&token);

    Ok(Json(ApiResponse::<()>::no_content(StatusCode::OK.into())))
}
