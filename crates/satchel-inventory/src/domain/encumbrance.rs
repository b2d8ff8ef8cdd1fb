//! Carried weight and encumbrance.
//!
//! Everything a character carries counts: worn gear, the bag itself and its
//! contents, and the general slots. The vault is not carried. Items the
//! catalog does not know weigh nothing.

use satchel_core::catalog::ItemCatalog;
use serde::Serialize;

use super::model::{EquipmentSlot, Inventory, ItemStack};

/// Strength assumed when the caller has no character stats.
pub const DEFAULT_STRENGTH: u32 = 10;

/// Capacity granted per point of strength.
const CAPACITY_PER_STRENGTH: f64 = 5.0;

/// How heavily loaded a character is, by carried weight as a share of
/// capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncumbranceLevel {
    /// Up to 50%.
    Light,
    /// Up to 100%.
    Normal,
    /// Up to 150%.
    Overweight,
    /// Up to 200%.
    Encumbered,
    /// Over 200%.
    Overloaded,
}

impl EncumbranceLevel {
    /// Classifies `weight` against `capacity`. A character without capacity
    /// is treated as normally loaded.
    #[must_use]
    pub fn classify(weight: f64, capacity: f64) -> Self {
        if capacity <= 0.0 {
            return Self::Normal;
        }
        let percentage = weight / capacity * 100.0;
        if percentage <= 50.0 {
            Self::Light
        } else if percentage <= 100.0 {
            Self::Normal
        } else if percentage <= 150.0 {
            Self::Overweight
        } else if percentage <= 200.0 {
            Self::Encumbered
        } else {
            Self::Overloaded
        }
    }
}

/// Carried weight against capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarriedLoad {
    /// Total weight carried.
    pub weight: f64,
    /// Carrying capacity.
    pub capacity: f64,
    /// Resulting encumbrance.
    pub level: EncumbranceLevel,
}

fn stack_weight(stack: &ItemStack, catalog: &dyn ItemCatalog) -> f64 {
    catalog
        .get_item(&stack.item_id)
        .map_or(0.0, |def| def.weight * f64::from(stack.quantity))
}

/// Total weight of worn gear, the bag and its contents, and general slots.
#[must_use]
pub fn carried_weight(inventory: &Inventory, catalog: &dyn ItemCatalog) -> f64 {
    let worn = inventory.equipment().values();
    let held = inventory
        .general()
        .iter()
        .chain(inventory.backpack())
        .flatten();
    worn.chain(held)
        .map(|stack| stack_weight(stack, catalog))
        .sum()
}

/// Five per point of `strength`, plus the worn bag's `weight_increase`.
#[must_use]
pub fn weight_capacity(inventory: &Inventory, catalog: &dyn ItemCatalog, strength: u32) -> f64 {
    let bag_bonus = inventory
        .equipment()
        .get(&EquipmentSlot::Bag)
        .and_then(|bag| catalog.get_item(&bag.item_id))
        .map_or(0.0, |def| def.weight_increase);
    CAPACITY_PER_STRENGTH * f64::from(strength) + bag_bonus
}

/// Weighs `inventory` for a character of the given `strength`.
#[must_use]
pub fn assess(inventory: &Inventory, catalog: &dyn ItemCatalog, strength: u32) -> CarriedLoad {
    let weight = carried_weight(inventory, catalog);
    let capacity = weight_capacity(inventory, catalog, strength);
    CarriedLoad {
        weight,
        capacity,
        level: EncumbranceLevel::classify(weight, capacity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::VaultLocation;
    use crate::domain::model::{SlotRef, Vault};
    use satchel_content::domain::catalog::StaticCatalog;
    use satchel_core::catalog::{CONTAINER_TAG, ItemDefinition};

    fn catalog() -> StaticCatalog {
        StaticCatalog::from_definitions(vec![
            ItemDefinition::new("sword")
                .with_gear_slot("main_hand")
                .with_weight(3.0),
            ItemDefinition::new("backpack")
                .with_gear_slot("bag")
                .with_tag(CONTAINER_TAG)
                .with_weight(5.0)
                .with_weight_increase(30.0),
            ItemDefinition::new("rations")
                .with_stack_limit(10)
                .with_weight(2.0),
            ItemDefinition::new("rope").with_weight(10.0),
        ])
        .unwrap()
    }

    fn put(inventory: &mut Inventory, slot: SlotRef, item_id: &str, quantity: u32) {
        inventory.put(slot, Some(ItemStack::new(item_id, quantity)));
    }

    #[test]
    fn test_classify_thresholds() {
        // Arrange
        let cases = [
            (0.0, EncumbranceLevel::Light),
            (50.0, EncumbranceLevel::Light),
            (51.0, EncumbranceLevel::Normal),
            (100.0, EncumbranceLevel::Normal),
            (101.0, EncumbranceLevel::Overweight),
            (150.0, EncumbranceLevel::Overweight),
            (151.0, EncumbranceLevel::Encumbered),
            (200.0, EncumbranceLevel::Encumbered),
            (201.0, EncumbranceLevel::Overloaded),
        ];

        for (weight, expected) in cases {
            // Act
            let level = EncumbranceLevel::classify(weight, 100.0);

            // Assert
            assert_eq!(level, expected, "{weight} of 100");
        }
    }

    #[test]
    fn test_classify_without_capacity_is_normal() {
        // Act
        let level = EncumbranceLevel::classify(12.0, 0.0);

        // Assert
        assert_eq!(level, EncumbranceLevel::Normal);
    }

    #[test]
    fn test_carried_weight_counts_gear_bag_contents_and_general_but_not_vault() {
        // Arrange
        let mut inventory = Inventory::new();
        put(&mut inventory, SlotRef::Equipment(EquipmentSlot::MainHand), "sword", 1);
        put(&mut inventory, SlotRef::Equipment(EquipmentSlot::Bag), "backpack", 1);
        put(&mut inventory, SlotRef::Backpack(0), "rations", 3);
        put(&mut inventory, SlotRef::General(0), "rope", 1);
        inventory.install_vault(Vault::new(VaultLocation {
            city: "millbrook".to_owned(),
            building: "bank".to_owned(),
        }));
        put(&mut inventory, SlotRef::Vault(0), "rope", 1);

        // Act
        let weight = carried_weight(&inventory, &catalog());

        // Assert
        assert!((weight - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_items_weigh_nothing() {
        // Arrange
        let mut inventory = Inventory::new();
        put(&mut inventory, SlotRef::General(0), "mystery-orb", 4);

        // Act
        let weight = carried_weight(&inventory, &catalog());

        // Assert
        assert!(weight.abs() < f64::EPSILON);
    }

    #[test]
    fn test_worn_bag_raises_capacity() {
        // Arrange
        let catalog = catalog();
        let bare = Inventory::new();
        let mut with_bag = Inventory::new();
        put(&mut with_bag, SlotRef::Equipment(EquipmentSlot::Bag), "backpack", 1);

        // Act
        let without = weight_capacity(&bare, &catalog, DEFAULT_STRENGTH);
        let with = weight_capacity(&with_bag, &catalog, DEFAULT_STRENGTH);

        // Assert
        assert!((without - 50.0).abs() < f64::EPSILON);
        assert!((with - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_assess_reports_level_for_strength() {
        // Arrange
        let mut inventory = Inventory::new();
        put(&mut inventory, SlotRef::General(0), "rope", 1);
        put(&mut inventory, SlotRef::General(1), "rope", 1);
        put(&mut inventory, SlotRef::General(2), "rations", 10);

        // Act
        let strong = assess(&inventory, &catalog(), 10);
        let weak = assess(&inventory, &catalog(), 2);

        // Assert
        assert!((strong.weight - 40.0).abs() < f64::EPSILON);
        assert_eq!(strong.level, EncumbranceLevel::Normal);
        assert!((weak.capacity - 10.0).abs() < f64::EPSILON);
        assert_eq!(weak.level, EncumbranceLevel::Overloaded);
    }
}
