//! Routes for opening, moving and closing play sessions.

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use satchel_inventory::application::sessions::Session;
use satchel_inventory::domain::location::Location;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    /// The character to play.
    pub character_id: Uuid,
    /// Where the character starts.
    #[serde(flatten)]
    pub location: Location,
}

/// POST /
#[instrument(skip(state, request), fields(character_id = %request.character_id))]
async fn open_session(
    State(state): State<AppState>,
    Json(request): Json<OpenSessionRequest>,
) -> Json<Session> {
    let session = state.inventory.sessions.open(
        request.character_id,
        request.location,
        state.clock.as_ref(),
    );
    Json(session)
}

/// GET /{session_id}
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.inventory.sessions.get(session_id)?))
}

/// PUT /{session_id}/location
#[instrument(skip(state, location))]
async fn relocate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(location): Json<Location>,
) -> Result<Json<Session>, ApiError> {
    info!(%location, "moving session");
    Ok(Json(state.inventory.sessions.relocate(session_id, location)?))
}

/// DELETE /{session_id}
#[instrument(skip(state))]
async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.inventory.sessions.close(session_id)?))
}

/// Returns the router for sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_session))
        .route("/{session_id}", get(get_session).delete(close_session))
        .route("/{session_id}/location", put(relocate))
}
