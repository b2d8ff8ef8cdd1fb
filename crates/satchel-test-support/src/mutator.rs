//! Character mutator that records every effect application.

use std::sync::Mutex;

use satchel_core::effects::{CharacterMutator, ItemEffect};
use uuid::Uuid;

/// One recorded `apply_item_effects` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEffects {
    /// The character the effects were applied to.
    pub character_id: Uuid,
    /// The consumed item.
    pub item_id: String,
    /// The effects handed over.
    pub effects: Vec<ItemEffect>,
}

/// A `CharacterMutator` that records calls instead of changing anything.
#[derive(Debug, Default)]
pub struct RecordingCharacterMutator {
    calls: Mutex<Vec<AppliedEffects>>,
}

impl RecordingCharacterMutator {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<AppliedEffects> {
        self.calls.lock().unwrap().clone()
    }
}

impl CharacterMutator for RecordingCharacterMutator {
    fn apply_item_effects(&self, character_id: Uuid, item_id: &str, effects: &[ItemEffect]) {
        self.calls.lock().unwrap().push(AppliedEffects {
            character_id,
            item_id: item_id.to_owned(),
            effects: effects.to_vec(),
        });
    }
}
