//! Item effects and the character-mutation collaborator.
//!
//! Using a consumable removes one unit from the inventory; what the unit
//! *does* to the character (healing, restoring mana, easing hunger) belongs
//! to whoever owns the character record. The inventory engine only hands the
//! effect descriptors over through [`CharacterMutator`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The character resource an effect adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Hit points.
    Hp,
    /// Secondary resource used for spells.
    Mana,
    /// Satiation level.
    Hunger,
    /// Tiredness level.
    Fatigue,
}

/// A single signed adjustment applied when an item is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEffect {
    /// Which resource changes.
    #[serde(rename = "type")]
    pub kind: EffectKind,
    /// Signed amount.
    pub value: i32,
}

impl ItemEffect {
    /// Creates a new effect.
    #[must_use]
    pub fn new(kind: EffectKind, value: i32) -> Self {
        Self { kind, value }
    }
}

/// Collaborator invoked by the `use` action once the consumption is committed.
///
/// Returns nothing to the inventory engine; failures inside the character
/// context are that context's concern.
pub trait CharacterMutator: Send + Sync {
    /// Applies the effects of one unit of `item_id` to the character.
    fn apply_item_effects(&self, character_id: Uuid, item_id: &str, effects: &[ItemEffect]);
}
