//! Building a character's first inventory from a grant list.

use satchel_character::domain::grants::{Grant, GrantList};
use satchel_core::catalog::{ItemCatalog, ItemDefinition};

use super::failure::{Failure, FailureKind};
use super::model::{EquipmentSlot, Inventory, ItemStack, SlotRef};
use super::placement::place;

/// Bag worn automatically when a pack is granted.
pub const DEFAULT_BAG: &str = "backpack";

/// Seeds an empty inventory from `grants`.
///
/// Granted items that can be worn go into their equipment slot when it is
/// still empty, in grant order. A granted pack puts on the default bag and
/// unpacks into its catalog contents. Everything else is placed like a
/// pick-up: existing stacks first, then empty backpack slots, then empty
/// general slots.
///
/// # Errors
///
/// `ItemNotFound` for an item the catalog does not know and
/// `CapacityExceeded` when the grants do not fit.
pub fn seed(grants: &GrantList, catalog: &dyn ItemCatalog) -> Result<Inventory, Failure> {
    let mut inventory = Inventory::new();
    let mut pending: Vec<Grant> = Vec::new();

    for grant in &grants.items {
        let definition = lookup(catalog, &grant.item)?;
        let mut remaining = grant.quantity;
        let target = definition
            .gear_slot
            .as_deref()
            .and_then(EquipmentSlot::from_name)
            .map(SlotRef::Equipment)
            .filter(|slot| inventory.get(*slot).is_none());
        if let Some(slot) = target.filter(|_| remaining > 0) {
            let worn = remaining.min(definition.max_stack());
            inventory.put(slot, Some(ItemStack::new(definition.id.clone(), worn)));
            remaining -= worn;
        }
        if remaining > 0 {
            pending.push(Grant::new(grant.item.clone(), remaining));
        }
    }

    if let Some(pack_id) = &grants.pack {
        let pack = lookup(catalog, pack_id)?;
        let bag = SlotRef::Equipment(EquipmentSlot::Bag);
        if inventory.get(bag).is_none()
            && catalog
                .get_item(DEFAULT_BAG)
                .is_some_and(|d| d.gear_slot.as_deref() == Some(EquipmentSlot::Bag.name()))
        {
            inventory.put(bag, Some(ItemStack::new(DEFAULT_BAG, 1)));
        }
        if pack.is_pack() {
            pending.extend(pack.contents.iter().map(|e| Grant::new(e.item.clone(), e.quantity)));
        } else {
            pending.push(Grant::new(pack_id.clone(), 1));
        }
    }

    for grant in pending {
        let definition = lookup(catalog, &grant.item)?;
        place(&mut inventory, definition, grant.quantity)?;
    }
    inventory.validate()?;
    Ok(inventory)
}

fn lookup<'a>(
    catalog: &'a dyn ItemCatalog,
    item_id: &str,
) -> Result<&'a ItemDefinition, Failure> {
    catalog.get_item(item_id).ok_or_else(|| {
        Failure::new(
            FailureKind::ItemNotFound,
            format!("granted item '{item_id}' is not in the catalog"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ContainerKind;
    use satchel_test_support::sample_catalog;

    #[test]
    fn test_wearable_grants_are_equipped_in_order() {
        // Arrange
        let catalog = sample_catalog();
        let grants = GrantList {
            items: vec![
                Grant::new("sword", 1),
                Grant::new("dagger", 1),
                Grant::new("leather-armor", 1),
            ],
            pack: None,
        };

        // Act
        let inventory = seed(&grants, &catalog).unwrap();

        // Assert
        assert_eq!(
            inventory.get(SlotRef::Equipment(EquipmentSlot::MainHand)).unwrap().item_id,
            "sword"
        );
        assert_eq!(
            inventory.get(SlotRef::Equipment(EquipmentSlot::Armor)).unwrap().item_id,
            "leather-armor"
        );
        assert_eq!(inventory.get(SlotRef::General(0)).unwrap().item_id, "dagger");
    }

    #[test]
    fn test_pack_puts_on_bag_and_unpacks_into_backpack() {
        // Arrange
        let catalog = sample_catalog();
        let grants = GrantList {
            items: vec![Grant::new("rations", 8)],
            pack: Some("explorers-pack".to_owned()),
        };

        // Act
        let inventory = seed(&grants, &catalog).unwrap();

        // Assert
        assert!(inventory.has_bag());
        assert_eq!(inventory.total_quantity("rations"), 13);
        assert_eq!(inventory.get(SlotRef::Backpack(0)), Some(&ItemStack::new("rations", 10)));
        assert_eq!(inventory.get(SlotRef::Backpack(1)), Some(&ItemStack::new("rations", 3)));
        assert_eq!(inventory.total_quantity("torch"), 2);
        assert_eq!(inventory.total_quantity("rope"), 1);
        assert_eq!(inventory.total_quantity("explorers-pack"), 0);
    }

    #[test]
    fn test_without_bag_grants_fill_general_slots() {
        // Arrange
        let catalog = sample_catalog();
        let grants = GrantList {
            items: vec![Grant::new("pouch", 1), Grant::new("arrows", 20)],
            pack: None,
        };

        // Act
        let inventory = seed(&grants, &catalog).unwrap();

        // Assert
        assert_eq!(inventory.get(SlotRef::General(0)).unwrap().item_id, "pouch");
        assert_eq!(inventory.get(SlotRef::General(1)), Some(&ItemStack::new("arrows", 20)));
        assert!(inventory.occupied(ContainerKind::Backpack).is_empty());
    }

    #[test]
    fn test_overflow_is_capacity_exceeded() {
        // Arrange
        let catalog = sample_catalog();
        let grants = GrantList {
            items: vec![Grant::new("rope", 5)],
            pack: None,
        };

        // Act
        let failure = seed(&grants, &catalog).unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::CapacityExceeded);
    }

    #[test]
    fn test_unknown_grant_is_item_not_found() {
        // Arrange
        let catalog = sample_catalog();
        let grants = GrantList {
            items: vec![Grant::new("mithril", 1)],
            pack: None,
        };

        // Act
        let failure = seed(&grants, &catalog).unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::ItemNotFound);
    }
}
