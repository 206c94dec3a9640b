use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET server liveness, for load balancers
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is accepting requests", body = String),
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
