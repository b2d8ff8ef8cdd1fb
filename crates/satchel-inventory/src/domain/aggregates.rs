//! Aggregate roots for the Inventory & Equipment context.

use satchel_core::aggregate::AggregateRoot;
use satchel_core::clock::Clock;
use satchel_core::error::DomainError;
use satchel_core::event::EventMetadata;
use uuid::Uuid;

use super::actions::ActionKind;
use super::events::{
    ACTION_APPLIED_EVENT_TYPE, ActionApplied, GROUND_ITEM_PICKED_UP_EVENT_TYPE,
    GroundItemPickedUp, INVENTORY_INITIALIZED_EVENT_TYPE, InventoryEvent, InventoryEventKind,
    InventoryInitialized, VAULT_REGISTERED_EVENT_TYPE, VaultRegistered,
};
use super::location::VaultLocation;
use super::model::{Inventory, Vault};

/// The aggregate root for one character's inventory.
///
/// The stream is keyed by the character id. Its state is the snapshot
/// carried by the last applied event.
#[derive(Debug)]
pub struct CharacterInventory {
    /// Aggregate identifier (the character id).
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Latest snapshot; `None` until initialized.
    inventory: Option<Inventory>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<InventoryEvent>,
}

impl CharacterInventory {
    /// Creates an empty, uninitialized aggregate.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            inventory: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// The latest snapshot, including uncommitted events.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Inventory> {
        self.uncommitted_events
            .last()
            .map(|e| e.kind.inventory())
            .or(self.inventory.as_ref())
    }

    fn record(
        &mut self,
        event_type: &str,
        kind: InventoryEventKind,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        let event = InventoryEvent {
            metadata: EventMetadata::for_command(
                event_type,
                self.id,
                self.next_sequence_number(),
                correlation_id,
                clock.now(),
            ),
            kind,
        };
        self.uncommitted_events.push(event);
    }

    fn require_snapshot(&self) -> Result<&Inventory, DomainError> {
        self.snapshot()
            .ok_or(DomainError::AggregateNotFound(self.id))
    }

    /// Records the seeded inventory, producing an `InventoryInitialized` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateAlreadyExists` if the character already
    /// has an inventory.
    pub fn initialize(
        &mut self,
        inventory: Inventory,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.snapshot().is_some() {
            return Err(DomainError::AggregateAlreadyExists(self.id));
        }
        let kind = InventoryEventKind::InventoryInitialized(InventoryInitialized {
            character_id: self.id,
            inventory,
        });
        self.record(INVENTORY_INITIALIZED_EVENT_TYPE, kind, correlation_id, clock);
        Ok(())
    }

    /// Records the result of an applied action, producing an `ActionApplied`
    /// event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the inventory was never
    /// initialized.
    pub fn record_action(
        &mut self,
        action: ActionKind,
        message: String,
        inventory: Inventory,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_snapshot()?;
        let kind = InventoryEventKind::ActionApplied(ActionApplied {
            character_id: self.id,
            action,
            message,
            inventory,
        });
        self.record(ACTION_APPLIED_EVENT_TYPE, kind, correlation_id, clock);
        Ok(())
    }

    /// Records a pick-up from the ground, producing a `GroundItemPickedUp`
    /// event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the inventory was never
    /// initialized.
    pub fn record_pick_up(
        &mut self,
        item_id: &str,
        quantity: u32,
        inventory: Inventory,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_snapshot()?;
        let kind = InventoryEventKind::GroundItemPickedUp(GroundItemPickedUp {
            character_id: self.id,
            item_id: item_id.to_owned(),
            quantity,
            inventory,
        });
        self.record(GROUND_ITEM_PICKED_UP_EVENT_TYPE, kind, correlation_id, clock);
        Ok(())
    }

    /// Installs an empty vault at `location`, producing a `VaultRegistered`
    /// event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the inventory was never
    /// initialized, or `DomainError::AggregateAlreadyExists` if the character
    /// already has a vault.
    pub fn register_vault(
        &mut self,
        location: VaultLocation,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let current = self.require_snapshot()?;
        if current.vault().is_some() {
            return Err(DomainError::AggregateAlreadyExists(self.id));
        }
        let mut inventory = current.clone();
        inventory.install_vault(Vault::new(location.clone()));
        let kind = InventoryEventKind::VaultRegistered(VaultRegistered {
            character_id: self.id,
            city: location.city,
            building: location.building,
            inventory,
        });
        self.record(VAULT_REGISTERED_EVENT_TYPE, kind, correlation_id, clock);
        Ok(())
    }
}

impl AggregateRoot for CharacterInventory {
    type Event = InventoryEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.inventory = Some(event.kind.inventory().clone());
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
