//! HTTP and websocket surface of the ride dispatch server.
//!
//! [`AppState`] wires the domain services together once at startup and is
//! cloned into every handler. [`init_server`] binds the listener and serves
//! the router built in [`router`].

use axum::http::{header::AUTHORIZATION, header::CONTENT_TYPE, HeaderValue, Method};
use domain::captain_location::CaptainLocationIndex;
use domain::fare::TariffFareEstimator;
use domain::jwt::JwtGatekeeper;
use domain::maps::Maps;
use domain::ride::RideManager;
use domain::Database;
use events::EventPublisher;
use log::*;
use realtime::{ConnectionRegistry, Dispatcher, RealtimeDomainEventHandler};
use service::config::Config;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use error::{Error, Result};

mod controller;
mod error;
mod extractors;
mod params;
pub mod router;
mod socket;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Arc<Database>,
    pub maps: Maps,
    pub rides: Arc<RideManager>,
    pub locations: Arc<CaptainLocationIndex>,
    pub registry: Arc<ConnectionRegistry>,
    pub gatekeeper: Arc<JwtGatekeeper>,
}

impl AppState {
    /// Builds every service from `config`, using the maps collaborators it
    /// selects.
    pub fn new(config: Config, db: Arc<Database>) -> std::result::Result<Self, domain::error::Error> {
        let maps = Maps::from_config(&config)?;
        let gatekeeper = JwtGatekeeper::from_config(&config)?;
        Ok(Self::with_parts(config, db, maps, gatekeeper))
    }

    pub fn with_parts(config: Config, db: Arc<Database>, maps: Maps, gatekeeper: JwtGatekeeper) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(registry.clone()));
        let events = EventPublisher::new()
            .with_handler(Arc::new(RealtimeDomainEventHandler::new(dispatcher)));
        let locations = Arc::new(CaptainLocationIndex::new());
        let rides = Arc::new(RideManager::new(
            db.clone(),
            maps.geocoder.clone(),
            Arc::new(TariffFareEstimator::new(maps.routes.clone())),
            locations.clone(),
            events,
            config.dispatch_radius_km,
        ));

        Self {
            config,
            db,
            maps,
            rides,
            locations,
            registry,
            gatekeeper: Arc::new(gatekeeper),
        }
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{}:{}", host, app_state.config.port);
    let listener = tokio::net::TcpListener::bind(&server_url).await?;

    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin}");
                None
            }
        })
        .collect();
    info!("CORS Allowed Origins: {allowed_origins:?}");

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(allowed_origins);

    info!("Server starting... listening for connections on http://{server_url}");

    axum::serve(listener, router::define_routes(app_state).layer(cors_layer)).await
}
