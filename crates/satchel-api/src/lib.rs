//! Satchel API: axum HTTP surface over the inventory engine.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the full application router.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::session::router())
        .nest("/api/v1/inventory", routes::inventory::router())
        .nest("/api/v1/ground", routes::ground::router())
        .nest("/api/v1/content", routes::content::router())
        .with_state(app_state)
}
