//! Command handlers for the Inventory & Equipment context.
//!
//! Each handler resolves the session, takes the character's lock, loads and
//! reconstitutes the aggregate, runs the domain logic, and persists the
//! resulting event. Effects outside the inventory (ground drops, consumed
//! units) are committed only after the append succeeds.

use std::sync::Arc;

use satchel_core::aggregate::AggregateRoot;
use satchel_core::catalog::ItemCatalog;
use satchel_core::clock::Clock;
use satchel_core::effects::CharacterMutator;
use satchel_core::error::DomainError;
use satchel_core::event::{DomainEvent, EventMetadata};
use satchel_core::repository::{EventRepository, StoredEvent};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::locks::CharacterLocks;
use super::sessions::SessionRegistry;
use crate::domain::actions::Action;
use crate::domain::aggregates::CharacterInventory;
use crate::domain::commands::{ApplyAction, InitializeInventory, PickUpItem, RegisterVault};
use crate::domain::events::{InventoryEvent, InventoryEventKind};
use crate::domain::failure::Failure;
use crate::domain::ground::GroundStore;
use crate::domain::location::{VaultAccess, VaultLocation};
use crate::domain::model::Inventory;
use crate::domain::processor::{self, ActionContext};
use crate::domain::{placement, seeding};

/// Collaborators shared by every inventory handler.
#[derive(Clone)]
pub struct InventoryServices {
    /// Static item properties.
    pub catalog: Arc<dyn ItemCatalog>,
    /// Receives the effects of consumed items.
    pub mutator: Arc<dyn CharacterMutator>,
    /// Dropped items.
    pub ground: Arc<GroundStore>,
    /// Vault reachability policy.
    pub vault_access: Arc<dyn VaultAccess>,
    /// Open sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Per-character mutation locks.
    pub locks: Arc<CharacterLocks>,
    /// Time source for event metadata.
    pub clock: Arc<dyn Clock>,
}

/// Errors returned by inventory handlers.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// An inventory rule rejected the request.
    #[error(transparent)]
    Rejected(#[from] Failure),

    /// Loading, persisting or aggregate lifecycle failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct InventoryCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
    /// The authoritative snapshot after the command.
    pub inventory: Inventory,
    /// Human-readable outcome.
    pub message: String,
}

fn to_stored_event(event: &InventoryEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        causation_id: meta.causation_id,
        occurred_at: meta.occurred_at,
    }
}

/// Decodes a stored event back into its domain envelope.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the payload does not deserialize.
pub(crate) fn from_stored_event(stored: &StoredEvent) -> Result<InventoryEvent, DomainError> {
    let kind: InventoryEventKind = serde_json::from_value(stored.payload.clone())
        .map_err(|e| DomainError::Infrastructure(format!("event deserialization failed: {e}")))?;
    Ok(InventoryEvent {
        metadata: EventMetadata {
            event_id: stored.event_id,
            event_type: stored.event_type.clone(),
            aggregate_id: stored.aggregate_id,
            sequence_number: stored.sequence_number,
            correlation_id: stored.correlation_id,
            causation_id: stored.causation_id,
            occurred_at: stored.occurred_at,
        },
        kind,
    })
}

/// Reconstitutes a `CharacterInventory` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    character_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<CharacterInventory, DomainError> {
    let mut aggregate = CharacterInventory::new(character_id);
    for stored in existing_events {
        aggregate.apply(&from_stored_event(stored)?);
    }
    Ok(aggregate)
}

/// Loads an initialized aggregate and its current snapshot.
async fn load(
    character_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<(CharacterInventory, Inventory), DomainError> {
    let existing_events = repo.load_events(character_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(character_id));
    }
    let aggregate = reconstitute(character_id, &existing_events)?;
    let snapshot = aggregate
        .snapshot()
        .cloned()
        .ok_or(DomainError::AggregateNotFound(character_id))?;
    Ok((aggregate, snapshot))
}

/// Appends the aggregate's uncommitted events.
async fn persist(
    aggregate: &CharacterInventory,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = aggregate
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();
    repo.append_events(aggregate.id, aggregate.version(), &stored_events)
        .await?;
    Ok(stored_events)
}

/// Handles the `InitializeInventory` command: seeds the inventory from the
/// grant list and persists the `InventoryInitialized` event.
///
/// # Errors
///
/// Returns `InventoryError::Domain` with `AggregateAlreadyExists` if the
/// character already has an inventory, `InventoryError::Rejected` if the
/// grants reference unknown items or do not fit, and `InventoryError::Domain`
/// if event loading or appending fails.
pub async fn handle_initialize_inventory(
    command: &InitializeInventory,
    services: &InventoryServices,
    repo: &dyn EventRepository,
) -> Result<InventoryCommandResult, InventoryError> {
    let _guard = services.locks.lock(command.character_id).await;

    let existing_events = repo.load_events(command.character_id).await?;
    if !existing_events.is_empty() {
        return Err(DomainError::AggregateAlreadyExists(command.character_id).into());
    }
    let mut aggregate = reconstitute(command.character_id, &existing_events)?;

    let inventory = seeding::seed(&command.grants, services.catalog.as_ref())?;
    aggregate.initialize(inventory.clone(), command.correlation_id, services.clock.as_ref())?;
    let stored_events = persist(&aggregate, repo).await?;

    info!(character_id = %command.character_id, "Inventory initialized");
    Ok(InventoryCommandResult {
        aggregate_id: command.character_id,
        stored_events,
        inventory,
        message: "Inventory initialized".to_owned(),
    })
}

/// Handles the `ApplyAction` command: validates the request against the
/// current snapshot, persists the `ActionApplied` event, then commits any
/// ground drop or consumption.
///
/// # Errors
///
/// Returns `InventoryError::Rejected` with the typed failure if the session
/// is not open, the request is malformed, or an inventory rule rejects the
/// action. Returns `InventoryError::Domain` if the character has no
/// inventory or event loading or appending fails.
pub async fn handle_apply_action(
    command: &ApplyAction,
    services: &InventoryServices,
    repo: &dyn EventRepository,
) -> Result<InventoryCommandResult, InventoryError> {
    let session = services.sessions.get(command.session_id)?;
    let action = Action::try_from(&command.request)?;
    let _guard = services.locks.lock(session.character_id).await;

    let (mut aggregate, snapshot) = load(session.character_id, repo).await?;
    let ctx = ActionContext {
        character_id: session.character_id,
        location: &session.location,
        catalog: services.catalog.as_ref(),
        vault_access: services.vault_access.as_ref(),
    };
    let outcome = processor::apply(&snapshot, &action, &ctx).inspect_err(|failure| {
        info!(
            character_id = %session.character_id,
            action = %action.kind(),
            item_id = action.item_id(),
            kind = %failure.kind,
            "Action rejected: {}",
            failure.message
        );
    })?;

    aggregate.record_action(
        action.kind(),
        outcome.message.clone(),
        outcome.inventory.clone(),
        command.correlation_id,
        services.clock.as_ref(),
    )?;
    let stored_events = persist(&aggregate, repo).await.inspect_err(|e| {
        warn!(character_id = %session.character_id, error = %e, "Failed to persist action");
    })?;

    if let Some(dropped) = &outcome.dropped {
        services
            .ground
            .drop_item(&dropped.location, &dropped.item_id, dropped.quantity);
    }
    if let Some(consumed) = &outcome.consumed {
        services.mutator.apply_item_effects(
            consumed.character_id,
            &consumed.item_id,
            &consumed.effects,
        );
    }

    info!(
        character_id = %session.character_id,
        action = %action.kind(),
        item_id = action.item_id(),
        "Action applied"
    );
    Ok(InventoryCommandResult {
        aggregate_id: session.character_id,
        stored_events,
        inventory: outcome.inventory,
        message: outcome.message,
    })
}

/// Handles the `PickUpItem` command: takes the units off the ground, places
/// them, and persists the `GroundItemPickedUp` event. The units go back on
/// the ground if anything after the take fails.
///
/// # Errors
///
/// Returns `InventoryError::Rejected` if the session is not open, the items
/// are not on the ground, or they do not fit. Returns `InventoryError::Domain`
/// if the character has no inventory or event loading or appending fails.
pub async fn handle_pick_up_item(
    command: &PickUpItem,
    services: &InventoryServices,
    repo: &dyn EventRepository,
) -> Result<InventoryCommandResult, InventoryError> {
    let session = services.sessions.get(command.session_id)?;
    let _guard = services.locks.lock(session.character_id).await;

    let (mut aggregate, snapshot) = load(session.character_id, repo).await?;
    let taken = services
        .ground
        .take(&session.location, &command.item_id, command.quantity)?;

    let result = async {
        let inventory = placement::pick_up(
            &snapshot,
            &command.item_id,
            command.quantity,
            services.catalog.as_ref(),
        )?;
        aggregate.record_pick_up(
            &command.item_id,
            command.quantity,
            inventory.clone(),
            command.correlation_id,
            services.clock.as_ref(),
        )?;
        let stored_events = persist(&aggregate, repo).await?;
        Ok::<_, InventoryError>((inventory, stored_events))
    }
    .await;

    match result {
        Ok((inventory, stored_events)) => {
            info!(
                character_id = %session.character_id,
                item_id = %command.item_id,
                quantity = command.quantity,
                "Item picked up"
            );
            Ok(InventoryCommandResult {
                aggregate_id: session.character_id,
                stored_events,
                inventory,
                message: format!("Picked up {} {}", command.quantity, command.item_id),
            })
        }
        Err(e) => {
            info!(
                character_id = %session.character_id,
                item_id = %command.item_id,
                error = %e,
                "Pick-up failed; returning items to the ground"
            );
            services.ground.restore(&session.location, taken);
            Err(e)
        }
    }
}

/// Handles the `RegisterVault` command: installs an empty vault in the
/// building the session is in and persists the `VaultRegistered` event.
///
/// # Errors
///
/// Returns `InventoryError::Rejected` if the session is not open.
/// Returns `InventoryError::Domain` with `Validation` if the session is not
/// inside a building, or with `AggregateAlreadyExists` if the character
/// already has a vault.
pub async fn handle_register_vault(
    command: &RegisterVault,
    services: &InventoryServices,
    repo: &dyn EventRepository,
) -> Result<InventoryCommandResult, InventoryError> {
    let session = services.sessions.get(command.session_id)?;
    let building = session.location.building.clone().ok_or_else(|| {
        DomainError::Validation(format!(
            "a vault must be registered inside a building, not in {}",
            session.location
        ))
    })?;
    let _guard = services.locks.lock(session.character_id).await;

    let (mut aggregate, _) = load(session.character_id, repo).await?;
    let location = VaultLocation {
        city: session.location.city.clone(),
        building,
    };
    aggregate.register_vault(location, command.correlation_id, services.clock.as_ref())?;
    let stored_events = persist(&aggregate, repo).await?;
    let inventory = aggregate
        .snapshot()
        .cloned()
        .ok_or(DomainError::AggregateNotFound(session.character_id))?;

    info!(character_id = %session.character_id, location = %session.location, "Vault registered");
    Ok(InventoryCommandResult {
        aggregate_id: session.character_id,
        stored_events,
        inventory,
        message: format!("Vault registered at {}", session.location),
    })
}
