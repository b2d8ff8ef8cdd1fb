//! Character vitals and the ledger consumables are applied to.

use std::collections::HashMap;
use std::sync::Mutex;

use satchel_core::effects::{CharacterMutator, EffectKind, ItemEffect};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Highest hunger level (fully fed).
pub const MAX_HUNGER: i32 = 3;
/// Highest fatigue level.
pub const MAX_FATIGUE: i32 = 9;

/// The character resources consumables adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// Current hit points.
    pub hp: i32,
    /// Hit point ceiling.
    pub max_hp: i32,
    /// Current mana.
    pub mana: i32,
    /// Mana ceiling.
    pub max_mana: i32,
    /// 0 (starving) to `MAX_HUNGER` (fed).
    pub hunger: i32,
    /// 0 (rested) to `MAX_FATIGUE`.
    pub fatigue: i32,
}

impl Vitals {
    /// Full vitals for a freshly created character.
    #[must_use]
    pub fn new(max_hp: i32, max_mana: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            mana: max_mana,
            max_mana,
            hunger: MAX_HUNGER,
            fatigue: 0,
        }
    }

    /// Applies one effect, clamping the resource to its range.
    pub fn apply(&mut self, effect: ItemEffect) {
        match effect.kind {
            EffectKind::Hp => {
                self.hp = self.hp.saturating_add(effect.value).clamp(0, self.max_hp);
            }
            EffectKind::Mana => {
                self.mana = self
                    .mana
                    .saturating_add(effect.value)
                    .clamp(0, self.max_mana);
            }
            EffectKind::Hunger => {
                self.hunger = self.hunger.saturating_add(effect.value).clamp(0, MAX_HUNGER);
            }
            EffectKind::Fatigue => {
                self.fatigue = self
                    .fatigue
                    .saturating_add(effect.value)
                    .clamp(0, MAX_FATIGUE);
            }
        }
    }
}

/// In-process store of character vitals.
///
/// This is the default [`CharacterMutator`]: the inventory engine hands it the
/// effects of every consumed unit.
#[derive(Debug, Default)]
pub struct VitalsLedger {
    characters: Mutex<HashMap<Uuid, Vitals>>,
}

impl VitalsLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a character's vitals.
    pub fn register(&self, character_id: Uuid, vitals: Vitals) {
        if let Ok(mut characters) = self.characters.lock() {
            characters.insert(character_id, vitals);
        }
    }

    /// Current vitals of a character.
    #[must_use]
    pub fn get(&self, character_id: Uuid) -> Option<Vitals> {
        self.characters
            .lock()
            .ok()
            .and_then(|characters| characters.get(&character_id).copied())
    }
}

impl CharacterMutator for VitalsLedger {
    fn apply_item_effects(&self, character_id: Uuid, item_id: &str, effects: &[ItemEffect]) {
        let Ok(mut characters) = self.characters.lock() else {
            warn!(%character_id, item_id, "vitals ledger lock poisoned; effects dropped");
            return;
        };
        let Some(vitals) = characters.get_mut(&character_id) else {
            warn!(%character_id, item_id, "no vitals registered; effects dropped");
            return;
        };
        for effect in effects {
            vitals.apply(*effect);
        }
        info!(
            %character_id,
            item_id,
            hp = vitals.hp,
            mana = vitals.mana,
            hunger = vitals.hunger,
            fatigue = vitals.fatigue,
            "item effects applied"
        );
    }
}
