//! Satchel API server entry point.

use std::error::Error;
use std::sync::Arc;

use satchel_api::config::AppConfig;
use satchel_api::state::AppState;
use satchel_character::domain::vitals::VitalsLedger;
use satchel_content::application::loader;
use satchel_content::domain::starting_gear::StartingGearTable;
use satchel_core::clock::SystemClock;
use satchel_event_store::memory_event_repository::InMemoryEventRepository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Satchel API server");

    let config = AppConfig::from_env()?;

    // Load static content; the catalog must be resident before any action.
    let catalog = loader::load_catalog(&config.catalog_path)?;
    let starting_gear = match &config.starting_gear_path {
        Some(path) => loader::load_starting_gear(path, &catalog)?,
        None => StartingGearTable::default(),
    };

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(InMemoryEventRepository::new()),
        catalog,
        starting_gear,
        Arc::new(VitalsLedger::new()),
        config.ground_ttl,
    );

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = satchel_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
