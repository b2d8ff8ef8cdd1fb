//! The action processor.
//!
//! Validates one action against a snapshot and, if every precondition holds,
//! produces the next snapshot. The input is never mutated: the processor works
//! on a clone, so a rejected action leaves nothing behind. Effects outside the
//! inventory (ground drops and consumed units) are returned for the caller to
//! commit once the new snapshot is persisted.

use satchel_core::catalog::{ItemCatalog, ItemDefinition};
use satchel_core::effects::ItemEffect;
use uuid::Uuid;

use super::actions::Action;
use super::failure::{Failure, FailureKind};
use super::location::{Location, VaultAccess};
use super::model::{ContainerKind, EquipmentSlot, Inventory, ItemStack, SlotRef};

/// Everything an action is validated against besides the snapshot.
#[derive(Clone, Copy)]
pub struct ActionContext<'a> {
    /// The acting character.
    pub character_id: Uuid,
    /// Where the character currently is.
    pub location: &'a Location,
    /// Static item properties.
    pub catalog: &'a dyn ItemCatalog,
    /// Vault reachability policy.
    pub vault_access: &'a dyn VaultAccess,
}

/// Units removed by `drop`, to be appended to the ground store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundDrop {
    /// Where the units were dropped.
    pub location: Location,
    /// Item identifier.
    pub item_id: String,
    /// Units dropped.
    pub quantity: u32,
}

/// A unit consumed by `use`, whose effects go to the character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumption {
    /// The consuming character.
    pub character_id: Uuid,
    /// Item identifier.
    pub item_id: String,
    /// Effects of one unit.
    pub effects: Vec<ItemEffect>,
}

/// A successfully applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// The new snapshot.
    pub inventory: Inventory,
    /// Human-readable description.
    pub message: String,
    /// Pending ground drop, for `drop`.
    pub dropped: Option<GroundDrop>,
    /// Pending consumption, for `use`.
    pub consumed: Option<Consumption>,
}

impl ActionOutcome {
    fn new(inventory: Inventory, message: String) -> Self {
        Self {
            inventory,
            message,
            dropped: None,
            consumed: None,
        }
    }
}

fn fail(kind: FailureKind, message: impl Into<String>) -> Failure {
    Failure::new(kind, message)
}

/// Applies `action` to `inventory`.
///
/// # Errors
///
/// Returns the `Failure` describing the first violated precondition. An
/// `InternalInconsistency` failure means `inventory` itself was invalid.
pub fn apply(
    inventory: &Inventory,
    action: &Action,
    ctx: &ActionContext<'_>,
) -> Result<ActionOutcome, Failure> {
    inventory.validate()?;

    let outcome = match action {
        Action::Equip { item_id, from, to } => equip(inventory, item_id, *from, *to, ctx),
        Action::Unequip { item_id, from } => unequip(inventory, item_id, *from, ctx),
        Action::Move { item_id, from, to } => move_stack(inventory, item_id, *from, *to, ctx),
        Action::Stack { item_id, from, to } => stack(inventory, item_id, *from, *to, ctx),
        Action::Split {
            item_id,
            from,
            to,
            quantity,
        } => split(inventory, item_id, *from, *to, *quantity, ctx),
        Action::Drop {
            item_id,
            from,
            quantity,
        } => drop_units(inventory, item_id, *from, *quantity, ctx),
        Action::Use { item_id, from } => use_unit(inventory, item_id, *from, ctx),
    }?;

    if !outcome.inventory.has_bag()
        && !outcome.inventory.occupied(ContainerKind::Backpack).is_empty()
    {
        return Err(fail(
            FailureKind::SlotOccupiedIncompatible,
            "the bag still holds items",
        ));
    }
    outcome.inventory.validate()?;
    Ok(outcome)
}

/// Rejects slots that do not exist or cannot be reached from here.
fn check_reachable(
    inventory: &Inventory,
    slot: SlotRef,
    ctx: &ActionContext<'_>,
) -> Result<(), Failure> {
    match slot {
        SlotRef::Backpack(_) if !inventory.has_bag() => {
            return Err(fail(FailureKind::InvalidSlot, "no bag is worn"));
        }
        SlotRef::Vault(_) => {
            let vault = inventory
                .vault()
                .ok_or_else(|| fail(FailureKind::InvalidSlot, "no vault is registered"))?;
            if !ctx.vault_access.can_reach(&vault.location, ctx.location) {
                return Err(fail(
                    FailureKind::VaultUnreachable,
                    format!(
                        "the vault is in {}/{}",
                        vault.location.city, vault.location.building
                    ),
                ));
            }
        }
        _ => {}
    }
    if inventory.is_addressable(slot) {
        Ok(())
    } else {
        Err(fail(FailureKind::InvalidSlot, format!("{slot} does not exist")))
    }
}

/// Resolves the source of an action: the stack there and its definition.
fn source<'a>(
    inventory: &'a Inventory,
    item_id: &str,
    from: SlotRef,
    ctx: &ActionContext<'a>,
) -> Result<(&'a ItemStack, &'a ItemDefinition), Failure> {
    check_reachable(inventory, from, ctx)?;
    let stack = inventory
        .get(from)
        .ok_or_else(|| fail(FailureKind::SourceEmpty, format!("{from} is empty")))?;
    if stack.item_id != item_id {
        return Err(fail(
            FailureKind::ItemNotFound,
            format!("{item_id} is not in {from}"),
        ));
    }
    let definition = definition(ctx, item_id)?;
    Ok((stack, definition))
}

fn definition<'a>(ctx: &ActionContext<'a>, item_id: &str) -> Result<&'a ItemDefinition, Failure> {
    ctx.catalog
        .get_item(item_id)
        .ok_or_else(|| fail(FailureKind::ItemNotFound, format!("unknown item '{item_id}'")))
}

fn check_wearable(definition: &ItemDefinition, slot: EquipmentSlot) -> Result<(), Failure> {
    if definition.gear_slot.as_deref() == Some(slot.name()) {
        Ok(())
    } else {
        Err(fail(
            FailureKind::GearSlotMismatch,
            format!("{} cannot be worn in {slot}", definition.name),
        ))
    }
}

/// Checks that `definition` may be placed in `slot`.
fn check_destination(definition: &ItemDefinition, slot: SlotRef) -> Result<(), Failure> {
    match slot {
        SlotRef::Equipment(name) => check_wearable(definition, name),
        SlotRef::Backpack(_) if definition.is_container() => Err(fail(
            FailureKind::SlotOccupiedIncompatible,
            format!("{} cannot go inside the backpack", definition.name),
        )),
        _ => Ok(()),
    }
}

fn equip(
    inventory: &Inventory,
    item_id: &str,
    from: SlotRef,
    to: EquipmentSlot,
    ctx: &ActionContext<'_>,
) -> Result<ActionOutcome, Failure> {
    if matches!(from, SlotRef::Equipment(_)) {
        return Err(fail(
            FailureKind::InvalidSlot,
            "equip takes an item from general, backpack or vault",
        ));
    }
    let (_, def) = source(inventory, item_id, from, ctx)?;
    check_wearable(def, to)?;

    if let Some(displaced) = inventory.get(SlotRef::Equipment(to)) {
        let displaced_def = definition(ctx, &displaced.item_id)?;
        if matches!(from, SlotRef::Backpack(_)) && displaced_def.is_container() {
            return Err(fail(
                FailureKind::CapacityExceeded,
                format!("no room for {} in {from}", displaced_def.name),
            ));
        }
    }

    let mut next = inventory.clone();
    let incoming = next.take(from);
    let displaced = next.put(SlotRef::Equipment(to), incoming);
    next.put(from, displaced);
    Ok(ActionOutcome::new(next, format!("Equipped {}", def.name)))
}

fn unequip(
    inventory: &Inventory,
    item_id: &str,
    from: EquipmentSlot,
    ctx: &ActionContext<'_>,
) -> Result<ActionOutcome, Failure> {
    let slot = SlotRef::Equipment(from);
    let (_, def) = source(inventory, item_id, slot, ctx)?;

    let mut next = inventory.clone();
    let stack = next.take(slot);
    let destination = if def.is_container() {
        next.first_free(ContainerKind::General)
    } else {
        next.first_free(ContainerKind::Backpack)
            .or_else(|| next.first_free(ContainerKind::General))
    };
    let Some(destination) = destination else {
        return Err(fail(
            FailureKind::CapacityExceeded,
            format!("no free slot for {}", def.name),
        ));
    };
    next.put(destination, stack);
    Ok(ActionOutcome::new(next, format!("Unequipped {}", def.name)))
}

fn move_stack(
    inventory: &Inventory,
    item_id: &str,
    from: SlotRef,
    to: SlotRef,
    ctx: &ActionContext<'_>,
) -> Result<ActionOutcome, Failure> {
    let (_, def) = source(inventory, item_id, from, ctx)?;
    if from == to {
        return Ok(ActionOutcome::new(inventory.clone(), "Nothing to move".to_owned()));
    }
    check_reachable(inventory, to, ctx)?;
    check_destination(def, to)?;
    if let Some(occupant) = inventory.get(to) {
        check_destination(definition(ctx, &occupant.item_id)?, from)?;
    }

    let mut next = inventory.clone();
    let moving = next.take(from);
    let occupant = next.put(to, moving);
    next.put(from, occupant);
    Ok(ActionOutcome::new(next, format!("Moved {} to {to}", def.name)))
}

fn stack(
    inventory: &Inventory,
    item_id: &str,
    from: SlotRef,
    to: SlotRef,
    ctx: &ActionContext<'_>,
) -> Result<ActionOutcome, Failure> {
    if from == to {
        return Err(fail(FailureKind::InvalidSlot, "cannot stack a slot onto itself"));
    }
    let (source_stack, def) = source(inventory, item_id, from, ctx)?;
    check_reachable(inventory, to, ctx)?;
    let target = inventory
        .get(to)
        .filter(|t| t.item_id == source_stack.item_id)
        .ok_or_else(|| {
            fail(
                FailureKind::SlotOccupiedIncompatible,
                format!("{to} does not hold {}", def.name),
            )
        })?;
    let limit = def.max_stack();
    if target.quantity >= limit {
        return Err(fail(
            FailureKind::CapacityExceeded,
            format!("{to} already holds a full stack of {}", def.name),
        ));
    }

    let moved = source_stack.quantity.min(limit - target.quantity);
    let mut next = inventory.clone();
    if let Some(target) = next.stack_mut(to) {
        target.quantity += moved;
    }
    next.remove_quantity(from, moved);
    Ok(ActionOutcome::new(next, format!("Stacked {moved} {}", def.name)))
}

fn split(
    inventory: &Inventory,
    item_id: &str,
    from: SlotRef,
    to: Option<SlotRef>,
    quantity: u32,
    ctx: &ActionContext<'_>,
) -> Result<ActionOutcome, Failure> {
    let to = to.ok_or_else(|| fail(FailureKind::InvalidSlot, "split needs an empty destination"))?;
    let (source_stack, def) = source(inventory, item_id, from, ctx)?;
    if quantity == 0 || quantity >= source_stack.quantity {
        return Err(fail(
            FailureKind::QuantityOutOfRange,
            format!(
                "can split 1 to {} of {}",
                source_stack.quantity.saturating_sub(1),
                def.name
            ),
        ));
    }
    check_reachable(inventory, to, ctx)?;
    if inventory.get(to).is_some() {
        return Err(fail(
            FailureKind::SlotOccupiedIncompatible,
            format!("{to} is occupied"),
        ));
    }
    check_destination(def, to)?;

    let mut next = inventory.clone();
    next.remove_quantity(from, quantity);
    next.put(to, Some(ItemStack::new(item_id, quantity)));
    Ok(ActionOutcome::new(
        next,
        format!("Split {quantity} {} into {to}", def.name),
    ))
}

fn drop_units(
    inventory: &Inventory,
    item_id: &str,
    from: SlotRef,
    quantity: u32,
    ctx: &ActionContext<'_>,
) -> Result<ActionOutcome, Failure> {
    let (source_stack, def) = source(inventory, item_id, from, ctx)?;
    if quantity == 0 || quantity > source_stack.quantity {
        return Err(fail(
            FailureKind::QuantityOutOfRange,
            format!("can drop 1 to {} of {}", source_stack.quantity, def.name),
        ));
    }

    let mut next = inventory.clone();
    next.remove_quantity(from, quantity);
    let mut outcome = ActionOutcome::new(next, format!("Dropped {quantity} {}", def.name));
    outcome.dropped = Some(GroundDrop {
        location: ctx.location.clone(),
        item_id: item_id.to_owned(),
        quantity,
    });
    Ok(outcome)
}

fn use_unit(
    inventory: &Inventory,
    item_id: &str,
    from: SlotRef,
    ctx: &ActionContext<'_>,
) -> Result<ActionOutcome, Failure> {
    let (_, def) = source(inventory, item_id, from, ctx)?;
    if !def.consumable {
        return Err(fail(
            FailureKind::NotConsumable,
            format!("{} cannot be used", def.name),
        ));
    }

    let mut next = inventory.clone();
    next.remove_quantity(from, 1);
    let mut outcome = ActionOutcome::new(next, format!("Used {}", def.name));
    outcome.consumed = Some(Consumption {
        character_id: ctx.character_id,
        item_id: item_id.to_owned(),
        effects: def.effects.clone(),
    });
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::{CoLocatedVaultAccess, VaultLocation};
    use crate::domain::model::{BACKPACK_SLOTS, GENERAL_SLOTS, Vault};
    use satchel_content::domain::catalog::StaticCatalog;
    use satchel_core::effects::EffectKind;
    use satchel_test_support::sample_catalog;

    struct Fixture {
        catalog: StaticCatalog,
        location: Location,
        character_id: Uuid,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: sample_catalog(),
                location: Location::inside("millbrook", "bank"),
                character_id: Uuid::new_v4(),
            }
        }

        fn at(location: Location) -> Self {
            Self {
                location,
                ..Self::new()
            }
        }

        fn ctx(&self) -> ActionContext<'_> {
            ActionContext {
                character_id: self.character_id,
                location: &self.location,
                catalog: &self.catalog,
                vault_access: &CoLocatedVaultAccess,
            }
        }

        fn apply(&self, inventory: &Inventory, action: Action) -> Result<ActionOutcome, Failure> {
            apply(inventory, &action, &self.ctx())
        }
    }

    fn with(slots: &[(SlotRef, &str, u32)]) -> Inventory {
        let mut inventory = Inventory::new();
        inventory.put(
            SlotRef::Equipment(EquipmentSlot::Bag),
            Some(ItemStack::new("backpack", 1)),
        );
        for (slot, item, quantity) in slots {
            inventory.put(*slot, Some(ItemStack::new(*item, *quantity)));
        }
        inventory
    }

    fn with_vault(mut inventory: Inventory) -> Inventory {
        inventory.install_vault(Vault::new(VaultLocation {
            city: "millbrook".to_owned(),
            building: "bank".to_owned(),
        }));
        inventory
    }

    fn total_with_ground(outcome: &ActionOutcome, item: &str) -> u64 {
        outcome.inventory.total_quantity(item)
            + outcome
                .dropped
                .as_ref()
                .filter(|d| d.item_id == item)
                .map_or(0, |d| u64::from(d.quantity))
    }

    // --- equip ---

    #[test]
    fn test_equip_from_backpack_moves_item_to_equipment_slot() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::Backpack(0), "dagger", 1)]);

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Equip {
                    item_id: "dagger".to_owned(),
                    from: SlotRef::Backpack(0),
                    to: EquipmentSlot::MainHand,
                },
            )
            .unwrap();

        // Assert
        let next = &outcome.inventory;
        assert_eq!(
            next.get(SlotRef::Equipment(EquipmentSlot::MainHand)),
            Some(&ItemStack::new("dagger", 1))
        );
        assert_eq!(next.get(SlotRef::Backpack(0)), None);
        assert_eq!(outcome.message, "Equipped dagger");
        assert_eq!(inventory.get(SlotRef::Backpack(0)).unwrap().item_id, "dagger");
    }

    #[test]
    fn test_equip_displaces_worn_item_back_to_source_slot() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[
            (SlotRef::General(2), "sword", 1),
            (SlotRef::Equipment(EquipmentSlot::MainHand), "dagger", 1),
        ]);

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Equip {
                    item_id: "sword".to_owned(),
                    from: SlotRef::General(2),
                    to: EquipmentSlot::MainHand,
                },
            )
            .unwrap();

        // Assert
        let next = &outcome.inventory;
        assert_eq!(
            next.get(SlotRef::Equipment(EquipmentSlot::MainHand)).unwrap().item_id,
            "sword"
        );
        assert_eq!(next.get(SlotRef::General(2)).unwrap().item_id, "dagger");
    }

    #[test]
    fn test_equip_into_wrong_slot_is_gear_slot_mismatch() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::Backpack(0), "dagger", 1)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Equip {
                    item_id: "dagger".to_owned(),
                    from: SlotRef::Backpack(0),
                    to: EquipmentSlot::OffHand,
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::GearSlotMismatch);
    }

    #[test]
    fn test_equip_succeeds_exactly_when_gear_slot_matches_target() {
        // Arrange
        let fx = Fixture::new();
        let items = [
            "dagger",
            "sword",
            "shield",
            "leather-armor",
            "ring",
            "backpack",
            "pouch",
            "rations",
            "potion",
            "arrows",
            "torch",
            "rope",
            "explorers-pack",
        ];

        for item_id in items {
            let def = fx.catalog.get_item(item_id).unwrap();
            let inventory = with(&[(SlotRef::General(0), item_id, 1)]);
            for slot in EquipmentSlot::ALL {
                // Act
                let result = fx.apply(
                    &inventory,
                    Action::Equip {
                        item_id: item_id.to_owned(),
                        from: SlotRef::General(0),
                        to: slot,
                    },
                );

                // Assert
                if def.gear_slot.as_deref() == Some(slot.name()) {
                    let outcome = result.unwrap();
                    assert_eq!(
                        outcome.inventory.get(SlotRef::Equipment(slot)).unwrap().item_id,
                        item_id
                    );
                } else {
                    let failure = result.unwrap_err();
                    assert_eq!(
                        failure.kind,
                        FailureKind::GearSlotMismatch,
                        "{item_id} into {}",
                        slot.name()
                    );
                }
            }
            assert_eq!(inventory.get(SlotRef::General(0)).unwrap().item_id, item_id);
        }
    }

    #[test]
    fn test_equip_from_empty_slot_is_source_empty() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Equip {
                    item_id: "dagger".to_owned(),
                    from: SlotRef::Backpack(5),
                    to: EquipmentSlot::MainHand,
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::SourceEmpty);
    }

    #[test]
    fn test_equip_bag_from_general_swaps_worn_bag_into_general() {
        // Arrange
        let fx = Fixture::new();
        let mut inventory = with(&[(SlotRef::Backpack(0), "rope", 1)]);
        inventory.put(SlotRef::General(0), Some(ItemStack::new("backpack", 1)));

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Equip {
                    item_id: "backpack".to_owned(),
                    from: SlotRef::General(0),
                    to: EquipmentSlot::Bag,
                },
            )
            .unwrap();

        // Assert
        assert_eq!(outcome.inventory.get(SlotRef::General(0)).unwrap().item_id, "backpack");
        assert!(outcome.inventory.has_bag());
        assert_eq!(outcome.inventory.get(SlotRef::Backpack(0)).unwrap().item_id, "rope");
    }

    #[test]
    fn test_equip_item_mismatching_request_is_item_not_found() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::Backpack(0), "sword", 1)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Equip {
                    item_id: "dagger".to_owned(),
                    from: SlotRef::Backpack(0),
                    to: EquipmentSlot::MainHand,
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::ItemNotFound);
    }

    // --- unequip ---

    #[test]
    fn test_unequip_prefers_backpack_then_general() {
        // Arrange
        let fx = Fixture::new();
        let mut slots: Vec<(SlotRef, &str, u32)> =
            (0..BACKPACK_SLOTS).map(|i| (SlotRef::Backpack(i), "rope", 1)).collect();
        slots.push((SlotRef::General(0), "rope", 1));
        slots.push((SlotRef::Equipment(EquipmentSlot::MainHand), "sword", 1));
        let full_backpack = with(&slots);

        // Act
        let outcome = fx
            .apply(
                &full_backpack,
                Action::Unequip {
                    item_id: "sword".to_owned(),
                    from: EquipmentSlot::MainHand,
                },
            )
            .unwrap();

        // Assert
        assert_eq!(outcome.inventory.get(SlotRef::General(1)).unwrap().item_id, "sword");
        assert!(outcome.inventory.get(SlotRef::Equipment(EquipmentSlot::MainHand)).is_none());
    }

    #[test]
    fn test_unequip_with_everything_full_is_capacity_exceeded() {
        // Arrange
        let fx = Fixture::new();
        let mut slots: Vec<(SlotRef, &str, u32)> =
            (0..BACKPACK_SLOTS).map(|i| (SlotRef::Backpack(i), "rope", 1)).collect();
        slots.extend((0..GENERAL_SLOTS).map(|i| (SlotRef::General(i), "rope", 1)));
        slots.push((SlotRef::Equipment(EquipmentSlot::MainHand), "sword", 1));
        let inventory = with(&slots);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Unequip {
                    item_id: "sword".to_owned(),
                    from: EquipmentSlot::MainHand,
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::CapacityExceeded);
        assert_eq!(
            inventory.get(SlotRef::Equipment(EquipmentSlot::MainHand)).unwrap().item_id,
            "sword"
        );
    }

    #[test]
    fn test_unequip_bag_holding_items_is_rejected() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::Backpack(3), "rope", 1)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Unequip {
                    item_id: "backpack".to_owned(),
                    from: EquipmentSlot::Bag,
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::SlotOccupiedIncompatible);
    }

    #[test]
    fn test_unequip_empty_bag_goes_to_general() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[]);

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Unequip {
                    item_id: "backpack".to_owned(),
                    from: EquipmentSlot::Bag,
                },
            )
            .unwrap();

        // Assert
        assert!(!outcome.inventory.has_bag());
        assert_eq!(outcome.inventory.get(SlotRef::General(0)).unwrap().item_id, "backpack");
    }

    // --- move ---

    #[test]
    fn test_move_to_occupied_slot_swaps_stacks() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[
            (SlotRef::General(0), "rope", 1),
            (SlotRef::Backpack(7), "torch", 3),
        ]);

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Move {
                    item_id: "rope".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::Backpack(7),
                },
            )
            .unwrap();

        // Assert
        let next = &outcome.inventory;
        assert_eq!(next.get(SlotRef::Backpack(7)), Some(&ItemStack::new("rope", 1)));
        assert_eq!(next.get(SlotRef::General(0)), Some(&ItemStack::new("torch", 3)));
        assert_eq!(next.total_quantity("torch"), inventory.total_quantity("torch"));
        assert_eq!(next.total_quantity("rope"), inventory.total_quantity("rope"));
    }

    #[test]
    fn test_move_container_into_backpack_is_slot_occupied_incompatible() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::General(0), "pouch", 1)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Move {
                    item_id: "pouch".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::Backpack(0),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::SlotOccupiedIncompatible);
    }

    #[test]
    fn test_move_swap_would_put_ineligible_item_in_equipment() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[
            (SlotRef::Equipment(EquipmentSlot::MainHand), "dagger", 1),
            (SlotRef::General(1), "rope", 1),
        ]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Move {
                    item_id: "dagger".to_owned(),
                    from: SlotRef::Equipment(EquipmentSlot::MainHand),
                    to: SlotRef::General(1),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::GearSlotMismatch);
    }

    #[test]
    fn test_move_out_of_range_index_is_invalid_slot() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::General(0), "rope", 1)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Move {
                    item_id: "rope".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::General(GENERAL_SLOTS),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::InvalidSlot);
    }

    #[test]
    fn test_move_into_vault_requires_being_at_the_vault() {
        // Arrange
        let inventory = with_vault(with(&[(SlotRef::General(0), "rope", 1)]));
        let action = Action::Move {
            item_id: "rope".to_owned(),
            from: SlotRef::General(0),
            to: SlotRef::Vault(39),
        };

        // Act
        let away = Fixture::at(Location::outdoors("millbrook")).apply(&inventory, action.clone());
        let there = Fixture::new().apply(&inventory, action).unwrap();

        // Assert
        assert_eq!(away.unwrap_err().kind, FailureKind::VaultUnreachable);
        assert_eq!(there.inventory.get(SlotRef::Vault(39)).unwrap().item_id, "rope");
    }

    #[test]
    fn test_vault_slot_without_vault_is_invalid_slot() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::General(0), "rope", 1)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Move {
                    item_id: "rope".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::Vault(0),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::InvalidSlot);
    }

    // --- stack ---

    #[test]
    fn test_stack_merges_up_to_limit_and_leaves_remainder() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[
            (SlotRef::General(0), "arrows", 15),
            (SlotRef::Backpack(0), "arrows", 12),
        ]);

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Stack {
                    item_id: "arrows".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::Backpack(0),
                },
            )
            .unwrap();

        // Assert
        let next = &outcome.inventory;
        assert_eq!(next.get(SlotRef::Backpack(0)).unwrap().quantity, 20);
        assert_eq!(next.get(SlotRef::General(0)).unwrap().quantity, 7);
        assert_eq!(next.total_quantity("arrows"), 27);
    }

    #[test]
    fn test_stack_fully_merged_source_becomes_empty() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[
            (SlotRef::General(0), "rations", 3),
            (SlotRef::General(1), "rations", 2),
        ]);

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Stack {
                    item_id: "rations".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::General(1),
                },
            )
            .unwrap();

        // Assert
        assert_eq!(outcome.inventory.get(SlotRef::General(0)), None);
        assert_eq!(outcome.inventory.get(SlotRef::General(1)).unwrap().quantity, 5);
    }

    #[test]
    fn test_stack_different_items_is_slot_occupied_incompatible() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[
            (SlotRef::General(0), "rations", 3),
            (SlotRef::General(1), "torch", 2),
        ]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Stack {
                    item_id: "rations".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::General(1),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::SlotOccupiedIncompatible);
    }

    #[test]
    fn test_stack_onto_empty_slot_is_slot_occupied_incompatible() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::General(0), "rations", 3)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Stack {
                    item_id: "rations".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::General(1),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::SlotOccupiedIncompatible);
    }

    #[test]
    fn test_stack_onto_full_stack_is_capacity_exceeded() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[
            (SlotRef::General(0), "rations", 3),
            (SlotRef::General(1), "rations", 10),
        ]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Stack {
                    item_id: "rations".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::General(1),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::CapacityExceeded);
    }

    // --- split ---

    #[test]
    fn test_split_creates_new_stack_at_destination() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::General(0), "rations", 3)]);

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Split {
                    item_id: "rations".to_owned(),
                    from: SlotRef::General(0),
                    to: Some(SlotRef::Backpack(2)),
                    quantity: 1,
                },
            )
            .unwrap();

        // Assert
        let next = &outcome.inventory;
        assert_eq!(next.get(SlotRef::General(0)), Some(&ItemStack::new("rations", 2)));
        assert_eq!(next.get(SlotRef::Backpack(2)), Some(&ItemStack::new("rations", 1)));
    }

    #[test]
    fn test_split_then_stack_restores_original_stack() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::Backpack(1), "arrows", 9)]);

        // Act
        let split = fx
            .apply(
                &inventory,
                Action::Split {
                    item_id: "arrows".to_owned(),
                    from: SlotRef::Backpack(1),
                    to: Some(SlotRef::Backpack(2)),
                    quantity: 4,
                },
            )
            .unwrap();
        let merged = fx
            .apply(
                &split.inventory,
                Action::Stack {
                    item_id: "arrows".to_owned(),
                    from: SlotRef::Backpack(2),
                    to: SlotRef::Backpack(1),
                },
            )
            .unwrap();

        // Assert
        assert_eq!(merged.inventory, inventory);
    }

    #[test]
    fn test_split_whole_stack_is_quantity_out_of_range() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::General(0), "rations", 3)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Split {
                    item_id: "rations".to_owned(),
                    from: SlotRef::General(0),
                    to: Some(SlotRef::General(1)),
                    quantity: 3,
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::QuantityOutOfRange);
    }

    #[test]
    fn test_split_without_destination_is_invalid_slot() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::General(0), "rations", 3)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Split {
                    item_id: "rations".to_owned(),
                    from: SlotRef::General(0),
                    to: None,
                    quantity: 1,
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::InvalidSlot);
    }

    #[test]
    fn test_split_into_occupied_slot_is_slot_occupied_incompatible() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[
            (SlotRef::General(0), "rations", 3),
            (SlotRef::General(1), "rations", 1),
        ]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Split {
                    item_id: "rations".to_owned(),
                    from: SlotRef::General(0),
                    to: Some(SlotRef::General(1)),
                    quantity: 1,
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::SlotOccupiedIncompatible);
    }

    // --- drop ---

    #[test]
    fn test_drop_removes_units_and_reports_ground_drop() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::Backpack(3), "torch", 4)]);

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Drop {
                    item_id: "torch".to_owned(),
                    from: SlotRef::Backpack(3),
                    quantity: 3,
                },
            )
            .unwrap();

        // Assert
        assert_eq!(outcome.inventory.get(SlotRef::Backpack(3)).unwrap().quantity, 1);
        assert_eq!(
            outcome.dropped,
            Some(GroundDrop {
                location: fx.location.clone(),
                item_id: "torch".to_owned(),
                quantity: 3,
            })
        );
        assert_eq!(total_with_ground(&outcome, "torch"), 4);
    }

    #[test]
    fn test_action_sequence_conserves_item_totals() {
        // Arrange
        let fx = Fixture::new();
        let mut inventory = with(&[
            (SlotRef::Backpack(0), "dagger", 1),
            (SlotRef::Backpack(1), "arrows", 9),
            (SlotRef::General(0), "torch", 4),
        ]);
        let actions = vec![
            Action::Equip {
                item_id: "dagger".to_owned(),
                from: SlotRef::Backpack(0),
                to: EquipmentSlot::MainHand,
            },
            Action::Split {
                item_id: "arrows".to_owned(),
                from: SlotRef::Backpack(1),
                to: Some(SlotRef::General(1)),
                quantity: 5,
            },
            Action::Move {
                item_id: "torch".to_owned(),
                from: SlotRef::General(0),
                to: SlotRef::Backpack(1),
            },
            Action::Stack {
                item_id: "arrows".to_owned(),
                from: SlotRef::General(0),
                to: SlotRef::General(1),
            },
            Action::Unequip {
                item_id: "dagger".to_owned(),
                from: EquipmentSlot::MainHand,
            },
        ];

        // Act
        for action in actions {
            inventory = fx.apply(&inventory, action).unwrap().inventory;
        }

        // Assert
        assert_eq!(inventory.total_quantity("dagger"), 1);
        assert_eq!(inventory.total_quantity("arrows"), 9);
        assert_eq!(inventory.total_quantity("torch"), 4);
        assert!(inventory.validate().is_ok());
    }

    #[test]
    fn test_drop_more_than_held_is_quantity_out_of_range() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::Backpack(3), "torch", 4)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Drop {
                    item_id: "torch".to_owned(),
                    from: SlotRef::Backpack(3),
                    quantity: 5,
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::QuantityOutOfRange);
    }

    // --- use ---

    #[test]
    fn test_use_last_unit_empties_slot_and_reports_consumption() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::Backpack(1), "potion", 1)]);

        // Act
        let outcome = fx
            .apply(
                &inventory,
                Action::Use {
                    item_id: "potion".to_owned(),
                    from: SlotRef::Backpack(1),
                },
            )
            .unwrap();

        // Assert
        assert_eq!(outcome.inventory.get(SlotRef::Backpack(1)), None);
        let consumed = outcome.consumed.unwrap();
        assert_eq!(consumed.character_id, fx.character_id);
        assert_eq!(consumed.effects, vec![ItemEffect::new(EffectKind::Hp, 5)]);
        assert_eq!(
            outcome.inventory.total_quantity("potion") + 1,
            inventory.total_quantity("potion")
        );
    }

    #[test]
    fn test_use_non_consumable_is_not_consumable() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::General(0), "rope", 1)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Use {
                    item_id: "rope".to_owned(),
                    from: SlotRef::General(0),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::NotConsumable);
    }

    // --- invariants ---

    #[test]
    fn test_invalid_input_is_internal_inconsistency() {
        // Arrange
        let fx = Fixture::new();
        let inventory = with(&[(SlotRef::General(0), "rope", 0)]);

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Use {
                    item_id: "rope".to_owned(),
                    from: SlotRef::General(0),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::InternalInconsistency);
    }

    #[test]
    fn test_backpack_slot_without_bag_is_invalid_slot() {
        // Arrange
        let fx = Fixture::new();
        let mut inventory = Inventory::new();
        inventory.put(SlotRef::General(0), Some(ItemStack::new("rope", 1)));

        // Act
        let failure = fx
            .apply(
                &inventory,
                Action::Move {
                    item_id: "rope".to_owned(),
                    from: SlotRef::General(0),
                    to: SlotRef::Backpack(0),
                },
            )
            .unwrap_err();

        // Assert
        assert_eq!(failure.kind, FailureKind::InvalidSlot);
    }
}
