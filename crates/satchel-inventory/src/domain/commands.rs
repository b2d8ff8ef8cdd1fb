//! Commands for the Inventory & Equipment context.

use satchel_character::domain::grants::GrantList;
use uuid::Uuid;

use super::actions::ActionRequest;

/// Command to seed a character's inventory from its starting grants.
#[derive(Debug, Clone)]
pub struct InitializeInventory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character whose inventory is created.
    pub character_id: Uuid,
    /// Output of the equipment wizard.
    pub grants: GrantList,
}

/// Command to apply one atomic action within a session.
#[derive(Debug, Clone)]
pub struct ApplyAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session the request was made in.
    pub session_id: Uuid,
    /// The request as it arrived on the wire.
    pub request: ActionRequest,
}

/// Command to pick items up from the ground at the session's location.
#[derive(Debug, Clone)]
pub struct PickUpItem {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session the request was made in.
    pub session_id: Uuid,
    /// Item identifier.
    pub item_id: String,
    /// Units to pick up.
    pub quantity: u32,
}

/// Command to register a vault in the building the session is in.
#[derive(Debug, Clone)]
pub struct RegisterVault {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session the request was made in.
    pub session_id: Uuid,
}
