//! Routes for the Inventory & Equipment bounded context.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use satchel_character::domain::grants::GrantList;
use satchel_inventory::application::command_handlers;
use satchel_inventory::application::query_handlers::{
    self, EncumbranceView, HistoryEntry, InventoryView,
};
use satchel_inventory::domain::actions::{ActionRequest, ActionResponse};
use satchel_inventory::domain::commands;
use satchel_inventory::domain::encumbrance::DEFAULT_STRENGTH;
use satchel_inventory::domain::model::Inventory;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /sessions/{session_id}/pick-up.
#[derive(Debug, Deserialize)]
pub struct PickUpRequest {
    /// Item to pick up.
    pub item_id: String,
    /// Units to pick up.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Query string for GET /{character_id}/encumbrance.
#[derive(Debug, Deserialize)]
pub struct EncumbranceQuery {
    /// Character strength; defaults to an average character's.
    #[serde(default = "default_strength")]
    pub strength: u32,
}

fn default_strength() -> u32 {
    DEFAULT_STRENGTH
}

/// Response body returned after an inventory is initialized.
#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    /// The character the inventory belongs to.
    pub character_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
    /// The seeded snapshot.
    pub inventory: Inventory,
}

/// POST /{character_id}/initialize
#[instrument(skip(state, grants))]
async fn initialize_inventory(
    State(state): State<AppState>,
    Path(character_id): Path<Uuid>,
    Json(grants): Json<GrantList>,
) -> Result<Json<InitializeResponse>, ApiError> {
    let command = commands::InitializeInventory {
        correlation_id: Uuid::new_v4(),
        character_id,
        grants,
    };

    info!(correlation_id = %command.correlation_id, "handling initialize_inventory command");

    let result = command_handlers::handle_initialize_inventory(
        &command,
        &state.inventory,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(InitializeResponse {
        character_id: result.aggregate_id,
        event_ids: result.stored_events.iter().map(|e| e.event_id).collect(),
        inventory: result.inventory,
    }))
}

/// GET /{character_id}
async fn get_inventory(
    State(state): State<AppState>,
    Path(character_id): Path<Uuid>,
) -> Result<Json<InventoryView>, ApiError> {
    let view = query_handlers::get_inventory(character_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// GET /{character_id}/history
async fn get_history(
    State(state): State<AppState>,
    Path(character_id): Path<Uuid>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let history = query_handlers::get_history(character_id, &*state.event_repository).await?;
    Ok(Json(history))
}

/// GET /{character_id}/encumbrance
async fn get_encumbrance(
    State(state): State<AppState>,
    Path(character_id): Path<Uuid>,
    Query(query): Query<EncumbranceQuery>,
) -> Result<Json<EncumbranceView>, ApiError> {
    let view = query_handlers::get_encumbrance(
        character_id,
        query.strength,
        state.inventory.catalog.as_ref(),
        &*state.event_repository,
    )
    .await?;
    Ok(Json(view))
}

/// GET /sessions/{session_id}
async fn get_session_inventory(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<InventoryView>, ApiError> {
    let view = query_handlers::get_inventory_for_session(
        session_id,
        &state.inventory.sessions,
        &*state.event_repository,
    )
    .await?;
    Ok(Json(view))
}

/// POST /sessions/{session_id}/actions
#[instrument(skip(state, request), fields(action = %request.action, item_id = %request.item_id))]
async fn apply_action(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let command = commands::ApplyAction {
        correlation_id: Uuid::new_v4(),
        session_id,
        request,
    };

    info!(correlation_id = %command.correlation_id, "handling apply_action command");

    let result = command_handlers::handle_apply_action(
        &command,
        &state.inventory,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(ActionResponse::applied(result.inventory, result.message)))
}

/// POST /sessions/{session_id}/pick-up
#[instrument(skip(state, request), fields(item_id = %request.item_id))]
async fn pick_up_item(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<PickUpRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let command = commands::PickUpItem {
        correlation_id: Uuid::new_v4(),
        session_id,
        item_id: request.item_id,
        quantity: request.quantity,
    };

    info!(correlation_id = %command.correlation_id, "handling pick_up_item command");

    let result = command_handlers::handle_pick_up_item(
        &command,
        &state.inventory,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(ActionResponse::applied(result.inventory, result.message)))
}

/// POST /sessions/{session_id}/vault
#[instrument(skip(state))]
async fn register_vault(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ActionResponse>, ApiError> {
    let command = commands::RegisterVault {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling register_vault command");

    let result = command_handlers::handle_register_vault(
        &command,
        &state.inventory,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(ActionResponse::applied(result.inventory, result.message)))
}

/// Returns the router for the inventory context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{character_id}", get(get_inventory))
        .route("/{character_id}/initialize", post(initialize_inventory))
        .route("/{character_id}/history", get(get_history))
        .route("/{character_id}/encumbrance", get(get_encumbrance))
        .route("/sessions/{session_id}", get(get_session_inventory))
        .route("/sessions/{session_id}/actions", post(apply_action))
        .route("/sessions/{session_id}/pick-up", post(pick_up_item))
        .route("/sessions/{session_id}/vault", post(register_vault))
}
