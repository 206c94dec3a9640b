use crate::controller::{
    health_check_controller, map_controller, profile_controller, ride_controller,
    session_controller,
};
use crate::socket::handler::socket_handler;
use crate::{params, AppState};
use axum::{
    routing::{get, post},
    Router,
};

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Ride Dispatch API"
        ),
        paths(
            health_check_controller::health_check,
            map_controller::get_coordinates,
            map_controller::get_distance_time,
            map_controller::get_suggestions,
            profile_controller::rider_profile,
            profile_controller::captain_profile,
            ride_controller::create,
            ride_controller::get_fare,
            ride_controller::confirm,
            ride_controller::start_ride,
            ride_controller::end_ride,
            session_controller::logout,
        ),
        components(
            schemas(
                domain::rides::Model,
                domain::rides::PublicRide,
                domain::riders::Model,
                domain::captains::Model,
                domain::captains::Vehicle,
                domain::Coordinate,
                domain::Otp,
                domain::ride_status::RideStatus,
                domain::vehicle_class::VehicleClass,
                params::ride::CreateParams,
                params::ride::RideIdParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "ride_dispatch", description = "Ride request, dispatch and trip lifecycle API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Every endpoint except /health expects `Authorization: Bearer <token>`.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(ride_routes(app_state.clone()))
        .merge(map_routes(app_state.clone()))
        .merge(profile_routes(app_state.clone()))
        .merge(session_routes(app_state.clone()))
        .merge(socket_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn ride_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/rides/create", post(ride_controller::create))
        .route("/rides/get-fare", get(ride_controller::get_fare))
        .route("/rides/confirm", post(ride_controller::confirm))
        .route("/rides/start-ride", get(ride_controller::start_ride))
        .route("/rides/end-ride", post(ride_controller::end_ride))
        .with_state(app_state)
}

fn map_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/maps/get-coordinates", get(map_controller::get_coordinates))
        .route(
            "/maps/get-distance-time",
            get(map_controller::get_distance_time),
        )
        .route("/maps/get-suggestions", get(map_controller::get_suggestions))
        .with_state(app_state)
}

fn profile_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/users/profile", get(profile_controller::rider_profile))
        .route("/captains/profile", get(profile_controller::captain_profile))
        .with_state(app_state)
}

fn session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/sessions/logout", post(session_controller::logout))
        .with_state(app_state)
}

fn socket_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/ws", get(socket_handler))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use domain::jwt::JwtGatekeeper;
    use domain::maps::Maps;
    use domain::roles::Role;
    use domain::{Coordinate, Database, Id};
    use entity_api::seed_database;
    use realtime::{ConnectionHandle, Outbound};
    use serde_json::{json, Value};
    use service::config::Config;
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    const PICKUP: &str = "12.9716,77.5946";
    const DESTINATION: &str = "12.9352,77.6245";

    struct TestApp {
        state: AppState,
        rider_id: Id,
        rider_token: String,
        captain_ids: Vec<Id>,
        captain_tokens: Vec<String>,
    }

    async fn test_app() -> TestApp {
        let db = Arc::new(Database::in_memory());
        let seeded = seed_database(&db).await.unwrap();
        let config = Config::from_args(Vec::<&str>::new()).unwrap();
        let state = AppState::with_parts(
            config,
            db,
            Maps::offline(),
            JwtGatekeeper::new("router-test-secret", 3600),
        );

        let rider_token = state
            .gatekeeper
            .issue(seeded.rider_ids[0], Role::Rider)
            .unwrap();
        let captain_tokens = seeded
            .captain_ids
            .iter()
            .map(|id| state.gatekeeper.issue(*id, Role::Captain).unwrap())
            .collect();

        TestApp {
            state,
            rider_id: seeded.rider_ids[0],
            rider_token,
            captain_ids: seeded.captain_ids,
            captain_tokens,
        }
    }

    async fn call(
        app: &TestApp,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = define_routes(app.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn create_body() -> Value {
        json!({ "pickup": PICKUP, "destination": DESTINATION, "vehicleType": "car" })
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let app = test_app().await;
        let response = define_routes(app.state.clone())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ride_lifecycle_over_http() {
        let app = test_app().await;
        let (c1, c2) = (&app.captain_tokens[0], &app.captain_tokens[1]);

        // Captain 1 is online next to the pickup.
        let (tx, mut c1_socket) = mpsc::unbounded_channel();
        app.state
            .registry
            .bind(app.captain_ids[0], Role::Captain, ConnectionHandle::new(tx));
        app.state
            .locations
            .update(app.captain_ids[0], Coordinate::new(12.9720, 77.5946));

        let (status, body) = call(
            &app,
            Method::POST,
            "/rides/create",
            Some(&app.rider_token),
            Some(create_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let ride_id = body["data"]["id"].as_str().unwrap().to_string();
        let otp = body["data"]["otp"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["status"], "requested");

        match c1_socket.try_recv().unwrap() {
            Outbound::Frame(frame) => {
                assert_eq!(frame.event, "new-ride");
                assert_eq!(frame.data["id"], ride_id.as_str());
                assert!(frame.data.get("otp").is_none());
            }
            other => panic!("unexpected {other:?}"),
        }

        let (status, body) = call(
            &app,
            Method::POST,
            "/rides/confirm",
            Some(c1),
            Some(json!({ "rideId": ride_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "accepted");
        assert!(body["data"].get("otp").is_none());

        let (status, _) = call(
            &app,
            Method::POST,
            "/rides/confirm",
            Some(c2),
            Some(json!({ "rideId": ride_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let wrong = if otp == "000000" { "111111" } else { "000000" };
        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/rides/start-ride?rideId={ride_id}&otp={wrong}"),
            Some(c1),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid OTP");

        let (status, _) = call(
            &app,
            Method::GET,
            &format!("/rides/start-ride?rideId={ride_id}&otp={otp}"),
            Some(c2),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/rides/start-ride?rideId={ride_id}&otp={otp}"),
            Some(c1),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ongoing");

        let (status, body) = call(
            &app,
            Method::POST,
            "/rides/end-ride",
            Some(c1),
            Some(json!({ "rideId": ride_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "completed");
    }

    #[tokio::test]
    async fn end_on_requested_ride_is_bad_request() {
        let app = test_app().await;
        let (_, body) = call(
            &app,
            Method::POST,
            "/rides/create",
            Some(&app.rider_token),
            Some(create_body()),
        )
        .await;
        let ride_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            Method::POST,
            "/rides/end-ride",
            Some(&app.captain_tokens[0]),
            Some(json!({ "rideId": ride_id })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Ride not ongoing");
    }

    #[tokio::test]
    async fn unknown_ride_is_not_found() {
        let app = test_app().await;
        let (status, _) = call(
            &app,
            Method::POST,
            "/rides/confirm",
            Some(&app.captain_tokens[0]),
            Some(json!({ "rideId": Id::new_v4() })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn endpoints_enforce_role_and_token() {
        let app = test_app().await;

        let (status, _) = call(&app, Method::POST, "/rides/create", None, Some(create_body())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(
            &app,
            Method::POST,
            "/rides/create",
            Some(&app.captain_tokens[0]),
            Some(create_body()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(
            &app,
            Method::POST,
            "/rides/confirm",
            Some(&app.rider_token),
            Some(json!({ "rideId": Id::new_v4() })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn profiles_return_the_callers_own_record() {
        let app = test_app().await;

        let (status, body) = call(
            &app,
            Method::GET,
            "/users/profile",
            Some(&app.rider_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status_code"], 200);
        assert_eq!(body["data"]["id"], app.rider_id.to_string());

        let (status, body) = call(
            &app,
            Method::GET,
            "/captains/profile",
            Some(&app.captain_tokens[1]),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], app.captain_ids[1].to_string());
        assert!(body["data"]["vehicle"]["plate"].is_string());
    }

    #[tokio::test]
    async fn profiles_reject_the_other_role_and_missing_tokens() {
        let app = test_app().await;

        for (uri, wrong_role) in [
            ("/users/profile", &app.captain_tokens[0]),
            ("/captains/profile", &app.rider_token),
        ] {
            let (status, _) = call(&app, Method::GET, uri, Some(wrong_role), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} with wrong role");

            let (status, _) = call(&app, Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} without token");
        }
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let app = test_app().await;
        let uri = format!("/rides/get-fare?pickup={PICKUP}&destination={DESTINATION}");

        let (status, body) = call(&app, Method::GET, &uri, Some(&app.rider_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["car"].as_f64().is_some());

        let (status, _) = call(
            &app,
            Method::POST,
            "/sessions/logout",
            Some(&app.rider_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&app, Method::GET, &uri, Some(&app.rider_token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn maps_endpoints_validate_and_resolve() {
        let app = test_app().await;
        let token = Some(app.rider_token.as_str());

        let (status, body) = call(&app, Method::GET, "/maps/get-suggestions?input=ab", token, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "input must be at least 3 characters");

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/maps/get-coordinates?address={PICKUP}"),
            token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({ "ltd": 12.9716, "lng": 77.5946 }));

        let (status, _) = call(
            &app,
            Method::GET,
            "/maps/get-coordinates?address=Nowhere%20Street",
            token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/maps/get-distance-time?origin={PICKUP}&destination={DESTINATION}"),
            token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["distance_meters"].as_u64().unwrap() > 5000);
    }

    #[tokio::test]
    async fn malformed_otp_is_unprocessable() {
        let app = test_app().await;
        let (status, _) = call(
            &app,
            Method::GET,
            &format!("/rides/start-ride?rideId={}&otp=12ab", Id::new_v4()),
            Some(&app.captain_tokens[0]),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn openapi_lists_ride_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/rides/create"));
        assert!(doc.paths.paths.contains_key("/rides/start-ride"));
    }
}
