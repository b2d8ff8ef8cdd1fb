//! Item catalog lookup.
//!
//! The catalog is static game content, resident in memory before any action
//! is validated. It is passed into the action processor and the equipment
//! wizard as an injected read-only repository.

use serde::{Deserialize, Serialize};

use crate::effects::ItemEffect;

/// Tag marking an item as a container (bags, pouches). Containers never
/// nest inside the backpack.
pub const CONTAINER_TAG: &str = "container";

fn default_stack_limit() -> u32 {
    1
}

/// One `(item, quantity)` entry inside a pack's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackEntry {
    /// Item identifier.
    pub item: String,
    /// Number of units.
    pub quantity: u32,
}

/// Static properties of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Item identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Maximum quantity in one slot; 1 means non-stackable.
    #[serde(default = "default_stack_limit")]
    pub stack_limit: u32,
    /// Name of the equipment slot this item may be worn in.
    #[serde(default)]
    pub gear_slot: Option<String>,
    /// Whether the `use` action may consume this item.
    #[serde(default)]
    pub consumable: bool,
    /// Weight of one unit.
    #[serde(default)]
    pub weight: f64,
    /// Extra carrying capacity granted while worn as the bag.
    #[serde(default)]
    pub weight_increase: f64,
    /// Free-form tags (`container`, `two-handed`, ...).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Effects applied when the item is used.
    #[serde(default)]
    pub effects: Vec<ItemEffect>,
    /// For packs: the items the pack unpacks into.
    #[serde(default)]
    pub contents: Vec<PackEntry>,
}

impl ItemDefinition {
    /// Creates a non-stackable, non-equippable definition.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            stack_limit: 1,
            gear_slot: None,
            consumable: false,
            weight: 0.0,
            weight_increase: 0.0,
            tags: Vec::new(),
            effects: Vec::new(),
            contents: Vec::new(),
        }
    }

    /// Sets the stack limit.
    #[must_use]
    pub fn with_stack_limit(mut self, stack_limit: u32) -> Self {
        self.stack_limit = stack_limit;
        self
    }

    /// Sets the equipment slot name.
    #[must_use]
    pub fn with_gear_slot(mut self, gear_slot: impl Into<String>) -> Self {
        self.gear_slot = Some(gear_slot.into());
        self
    }

    /// Marks the item consumable with the given effects.
    #[must_use]
    pub fn consumable_with(mut self, effects: Vec<ItemEffect>) -> Self {
        self.consumable = true;
        self.effects = effects;
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Sets the weight of one unit.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the capacity bonus granted when worn as the bag.
    #[must_use]
    pub fn with_weight_increase(mut self, weight_increase: f64) -> Self {
        self.weight_increase = weight_increase;
        self
    }

    /// Sets pack contents.
    #[must_use]
    pub fn with_contents(mut self, contents: Vec<PackEntry>) -> Self {
        self.contents = contents;
        self
    }

    /// Effective stack limit; a zero in content data is read as 1.
    #[must_use]
    pub fn max_stack(&self) -> u32 {
        self.stack_limit.max(1)
    }

    /// Returns `true` if the item carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns `true` for bags, pouches and other containers.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.has_tag(CONTAINER_TAG)
    }

    /// Returns `true` if the item is a pack that unpacks on grant.
    #[must_use]
    pub fn is_pack(&self) -> bool {
        !self.contents.is_empty()
    }
}

/// Read-only lookup from item identifier to static properties.
pub trait ItemCatalog: Send + Sync {
    /// Returns the definition for `item_id`, if the catalog knows it.
    fn get_item(&self, item_id: &str) -> Option<&ItemDefinition>;
}
