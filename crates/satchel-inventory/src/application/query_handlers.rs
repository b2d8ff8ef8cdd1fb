//! Query handlers for the Inventory & Equipment context.
//!
//! This module contains query handlers that reconstitute aggregates
//! from stored events and return read-only view DTOs.

use chrono::{DateTime, Utc};
use satchel_core::aggregate::AggregateRoot;
use satchel_core::catalog::ItemCatalog;
use satchel_core::error::DomainError;
use satchel_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use super::command_handlers::{self, InventoryError};
use super::sessions::SessionRegistry;
use crate::domain::encumbrance::{self, CarriedLoad};
use crate::domain::failure::Failure;
use crate::domain::ground::{GroundItem, GroundStore};
use crate::domain::location::Location;
use crate::domain::model::Inventory;

/// Read-only view of a character's inventory.
#[derive(Debug, Serialize)]
pub struct InventoryView {
    /// The owning character.
    pub character_id: Uuid,
    /// Current version (event count).
    pub version: i64,
    /// The authoritative snapshot.
    pub inventory: Inventory,
}

/// One entry of a character's inventory history.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    /// Position in the stream.
    pub sequence_number: i64,
    /// Event type name.
    pub event_type: String,
    /// When the event was recorded.
    pub occurred_at: DateTime<Utc>,
    /// The snapshot the event produced.
    pub inventory: Inventory,
}

/// How heavily a character's current inventory weighs on them.
#[derive(Debug, Serialize)]
pub struct EncumbranceView {
    /// The owning character.
    pub character_id: Uuid,
    /// Strength the capacity was computed for.
    pub strength: u32,
    /// Weight, capacity and level.
    #[serde(flatten)]
    pub load: CarriedLoad,
}

/// Items lying where a session's character stands.
#[derive(Debug, Serialize)]
pub struct GroundView {
    /// The session's current location.
    pub location: Location,
    /// Unexpired items, oldest first.
    pub items: Vec<GroundItem>,
}

/// Retrieves a character's inventory.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_inventory(
    character_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<InventoryView, DomainError> {
    let stored_events = repo.load_events(character_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(character_id));
    }
    let aggregate = command_handlers::reconstitute(character_id, &stored_events)?;
    let inventory = aggregate
        .snapshot()
        .cloned()
        .ok_or(DomainError::AggregateNotFound(character_id))?;
    Ok(InventoryView {
        character_id,
        version: aggregate.version(),
        inventory,
    })
}

/// Retrieves the inventory of the character playing in `session_id`.
///
/// # Errors
///
/// Returns `InventoryError::Rejected` with `NoActiveSession` if the session
/// is not open, and `InventoryError::Domain` as for [`get_inventory`].
pub async fn get_inventory_for_session(
    session_id: Uuid,
    sessions: &SessionRegistry,
    repo: &dyn EventRepository,
) -> Result<InventoryView, InventoryError> {
    let session = sessions.get(session_id)?;
    Ok(get_inventory(session.character_id, repo).await?)
}

/// Retrieves every snapshot a character's inventory has gone through.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_history(
    character_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Vec<HistoryEntry>, DomainError> {
    let stored_events = repo.load_events(character_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(character_id));
    }
    stored_events
        .iter()
        .map(|stored| {
            let event = command_handlers::from_stored_event(stored)?;
            Ok(HistoryEntry {
                sequence_number: stored.sequence_number,
                event_type: stored.event_type.clone(),
                occurred_at: stored.occurred_at,
                inventory: event.kind.inventory().clone(),
            })
        })
        .collect()
}

/// Weighs a character's current inventory.
///
/// # Errors
///
/// As for [`get_inventory`].
pub async fn get_encumbrance(
    character_id: Uuid,
    strength: u32,
    catalog: &dyn ItemCatalog,
    repo: &dyn EventRepository,
) -> Result<EncumbranceView, DomainError> {
    let view = get_inventory(character_id, repo).await?;
    Ok(EncumbranceView {
        character_id,
        strength,
        load: encumbrance::assess(&view.inventory, catalog, strength),
    })
}

/// Lists the ground items where the session's character stands.
///
/// # Errors
///
/// Returns a `NoActiveSession` failure if the session is not open.
pub fn get_ground_items(
    session_id: Uuid,
    sessions: &SessionRegistry,
    ground: &GroundStore,
) -> Result<GroundView, Failure> {
    let session = sessions.get(session_id)?;
    let items = ground.items_at(&session.location);
    Ok(GroundView {
        location: session.location,
        items,
    })
}
