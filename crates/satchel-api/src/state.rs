//! Shared application state.

use std::sync::Arc;

use satchel_content::domain::catalog::StaticCatalog;
use satchel_content::domain::starting_gear::StartingGearTable;
use satchel_core::clock::Clock;
use satchel_core::effects::CharacterMutator;
use satchel_core::repository::EventRepository;
use satchel_inventory::application::command_handlers::InventoryServices;
use satchel_inventory::application::locks::CharacterLocks;
use satchel_inventory::application::sessions::SessionRegistry;
use satchel_inventory::domain::ground::GroundStore;
use satchel_inventory::domain::location::CoLocatedVaultAccess;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for deterministic time.
    pub clock: Arc<dyn Clock>,
    /// Event repository for aggregate persistence.
    pub event_repository: Arc<dyn EventRepository>,
    /// Collaborators of the inventory handlers.
    pub inventory: InventoryServices,
    /// Class starting gear served to the wizard client.
    pub starting_gear: Arc<StartingGearTable>,
    /// Hash identifying the loaded item catalog.
    pub catalog_version: String,
}

impl AppState {
    /// Create new application state.
    ///
    /// Vault reachability uses the co-located policy; sessions, locks and
    /// the ground store start empty.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_repository: Arc<dyn EventRepository>,
        catalog: StaticCatalog,
        starting_gear: StartingGearTable,
        mutator: Arc<dyn CharacterMutator>,
        ground_ttl: chrono::Duration,
    ) -> Self {
        let catalog_version = catalog.content_version().to_owned();
        let inventory = InventoryServices {
            catalog: Arc::new(catalog),
            mutator,
            ground: Arc::new(GroundStore::new(Arc::clone(&clock), ground_ttl)),
            vault_access: Arc::new(CoLocatedVaultAccess),
            sessions: Arc::new(SessionRegistry::new()),
            locks: Arc::new(CharacterLocks::new()),
            clock: Arc::clone(&clock),
        };
        Self {
            clock,
            event_repository,
            inventory,
            starting_gear: Arc::new(starting_gear),
            catalog_version,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_state {
    use std::sync::Arc;

    use satchel_content::domain::starting_gear::StartingGearTable;
    use satchel_core::repository::EventRepository;
    use satchel_event_store::memory_event_repository::InMemoryEventRepository;
    use satchel_test_support::{FixedClock, RecordingCharacterMutator, fixed_now, sample_catalog};

    use super::AppState;

    /// State over the sample catalog with the given repository.
    pub(crate) fn app_state_with(event_repository: Arc<dyn EventRepository>) -> AppState {
        let gear = StartingGearTable::from_yaml_str(
            "- class: fighter\n  starting_gear:\n    given_items:\n      - item: dagger\n",
        )
        .unwrap();
        AppState::new(
            Arc::new(FixedClock(fixed_now())),
            event_repository,
            sample_catalog(),
            gear,
            Arc::new(RecordingCharacterMutator::new()),
            chrono::Duration::days(1),
        )
    }

    /// State over the sample catalog with an empty in-memory repository.
    pub(crate) fn test_app_state() -> AppState {
        app_state_with(Arc::new(InMemoryEventRepository::new()))
    }
}
