//! Grant lists: the flat output of character creation.

use serde::{Deserialize, Serialize};

fn default_quantity() -> u32 {
    1
}

/// An `(item, quantity)` pair granted to a new character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Item identifier.
    pub item: String,
    /// Number of units; absent in content data means one.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl Grant {
    /// Creates a grant.
    #[must_use]
    pub fn new(item: impl Into<String>, quantity: u32) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

/// Everything a finished equipment wizard hands to the inventory.
///
/// The pack is kept apart from `items` because it unpacks into its catalog
/// contents when the inventory is seeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantList {
    /// Items in grant order.
    #[serde(default)]
    pub items: Vec<Grant>,
    /// Selected equipment pack, if the class offers one.
    #[serde(default)]
    pub pack: Option<String>,
}

impl GrantList {
    /// Total units granted for `item`, not counting pack contents.
    #[must_use]
    pub fn quantity_of(&self, item: &str) -> u32 {
        self.items
            .iter()
            .filter(|g| g.item == item)
            .map(|g| g.quantity)
            .sum()
    }
}
