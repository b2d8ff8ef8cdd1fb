//! Domain events for the Inventory & Equipment context.
//!
//! Every event carries the full snapshot it produced, so replaying a stream
//! is a matter of keeping the last one and the history query can show every
//! intermediate state.

use satchel_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::actions::ActionKind;
use super::model::Inventory;

/// Event type for [`InventoryInitialized`].
pub const INVENTORY_INITIALIZED_EVENT_TYPE: &str = "inventory.initialized";
/// Event type for [`ActionApplied`].
pub const ACTION_APPLIED_EVENT_TYPE: &str = "inventory.action_applied";
/// Event type for [`GroundItemPickedUp`].
pub const GROUND_ITEM_PICKED_UP_EVENT_TYPE: &str = "inventory.ground_item_picked_up";
/// Event type for [`VaultRegistered`].
pub const VAULT_REGISTERED_EVENT_TYPE: &str = "inventory.vault_registered";

/// Emitted once, when a character's inventory is seeded from its grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryInitialized {
    /// The owning character.
    pub character_id: Uuid,
    /// The seeded snapshot.
    pub inventory: Inventory,
}

/// Emitted when one of the seven atomic actions succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionApplied {
    /// The owning character.
    pub character_id: Uuid,
    /// Which action ran.
    pub action: ActionKind,
    /// Description returned to the client.
    pub message: String,
    /// The resulting snapshot.
    pub inventory: Inventory,
}

/// Emitted when units are picked up from the ground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundItemPickedUp {
    /// The owning character.
    pub character_id: Uuid,
    /// Item identifier.
    pub item_id: String,
    /// Units picked up.
    pub quantity: u32,
    /// The resulting snapshot.
    pub inventory: Inventory,
}

/// Emitted when a storage vault is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRegistered {
    /// The owning character.
    pub character_id: Uuid,
    /// City the vault is in.
    pub city: String,
    /// Building the vault is in.
    pub building: String,
    /// The resulting snapshot.
    pub inventory: Inventory,
}

/// Event payload variants for the Inventory & Equipment context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEventKind {
    /// The inventory has been seeded.
    InventoryInitialized(InventoryInitialized),
    /// An action has been applied.
    ActionApplied(ActionApplied),
    /// Items have been picked up from the ground.
    GroundItemPickedUp(GroundItemPickedUp),
    /// A vault has been registered.
    VaultRegistered(VaultRegistered),
}

impl InventoryEventKind {
    /// The snapshot this event produced.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        match self {
            Self::InventoryInitialized(e) => &e.inventory,
            Self::ActionApplied(e) => &e.inventory,
            Self::GroundItemPickedUp(e) => &e.inventory,
            Self::VaultRegistered(e) => &e.inventory,
        }
    }
}

/// Domain event envelope for the Inventory & Equipment context.
#[derive(Debug, Clone)]
pub struct InventoryEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: InventoryEventKind,
}

impl DomainEvent for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            InventoryEventKind::InventoryInitialized(_) => INVENTORY_INITIALIZED_EVENT_TYPE,
            InventoryEventKind::ActionApplied(_) => ACTION_APPLIED_EVENT_TYPE,
            InventoryEventKind::GroundItemPickedUp(_) => GROUND_ITEM_PICKED_UP_EVENT_TYPE,
            InventoryEventKind::VaultRegistered(_) => VAULT_REGISTERED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("InventoryEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
