use domain::roles::Role;
use domain::Database;
use log::*;
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!(
        "Starting ride dispatch server [{}] with dispatch radius {} km",
        config.runtime_env(),
        config.dispatch_radius_km
    );

    let db = Arc::new(Database::in_memory());
    let seed_demo_data = config.seed_demo_data;

    let app_state = match web::AppState::new(config, db.clone()) {
        Ok(app_state) => app_state,
        Err(e) => {
            error!("Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    if seed_demo_data {
        if app_state.config.is_production() {
            warn!("Ignoring --seed-demo-data in production");
        } else {
            seed_demo_people(&app_state, &db).await;
        }
    }

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}

// Demo people only exist in memory, so print a token for each to stdout. Tokens
// never go to the log.
async fn seed_demo_people(app_state: &web::AppState, db: &Database) {
    let seeded = match entity_api::seed_database(db).await {
        Ok(seeded) => seeded,
        Err(e) => {
            error!("Failed to seed demo data: {e}");
            return;
        }
    };

    let people = seeded
        .rider_ids
        .iter()
        .map(|id| (*id, Role::Rider))
        .chain(seeded.captain_ids.iter().map(|id| (*id, Role::Captain)));

    for (person_id, role) in people {
        match app_state.gatekeeper.issue(person_id, role) {
            Ok(token) => println!("{role} {person_id}: Bearer {token}"),
            Err(e) => warn!("Failed to issue demo token for {person_id}: {e}"),
        }
    }
}
