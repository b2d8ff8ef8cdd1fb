//! Routes for items lying on the ground.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use uuid::Uuid;

use satchel_inventory::application::query_handlers::{self, GroundView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /sessions/{session_id}
async fn get_ground_items(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<GroundView>, ApiError> {
    let view = query_handlers::get_ground_items(
        session_id,
        &state.inventory.sessions,
        &state.inventory.ground,
    )?;
    Ok(Json(view))
}

/// Returns the router for the ground.
pub fn router() -> Router<AppState> {
    Router::new().route("/sessions/{session_id}", get(get_ground_items))
}
