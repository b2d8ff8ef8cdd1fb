//! Placing incoming items into free space.
//!
//! Items arriving from outside the inventory (picked up from the ground or
//! granted at creation) top up existing stacks before taking empty slots:
//! backpack stacks, general stacks, empty backpack slots, empty general
//! slots. Containers skip the backpack entirely and never merge.

use satchel_core::catalog::{ItemCatalog, ItemDefinition};

use super::failure::{Failure, FailureKind};
use super::model::{ContainerKind, Inventory, ItemStack, SlotRef};

const PRIORITY: [ContainerKind; 2] = [ContainerKind::Backpack, ContainerKind::General];

/// Places `quantity` units of `definition` into `inventory`, all or nothing.
pub(crate) fn place(
    inventory: &mut Inventory,
    definition: &ItemDefinition,
    quantity: u32,
) -> Result<(), Failure> {
    let mut working = inventory.clone();
    let limit = definition.max_stack();
    let mut remaining = quantity;

    let kinds: &[ContainerKind] = if definition.is_container() {
        &[ContainerKind::General]
    } else {
        &PRIORITY
    };

    if !definition.is_container() {
        for kind in kinds {
            let partial: Vec<SlotRef> = working
                .occupied(*kind)
                .into_iter()
                .filter(|(_, s)| s.item_id == definition.id && s.quantity < limit)
                .map(|(slot, _)| slot)
                .collect();
            for slot in partial {
                if remaining == 0 {
                    break;
                }
                if let Some(stack) = working.stack_mut(slot) {
                    let added = remaining.min(limit - stack.quantity);
                    stack.quantity += added;
                    remaining -= added;
                }
            }
        }
    }

    while remaining > 0 {
        let Some(slot) = kinds.iter().find_map(|kind| working.first_free(*kind)) else {
            break;
        };
        let added = remaining.min(limit);
        working.put(slot, Some(ItemStack::new(definition.id.clone(), added)));
        remaining -= added;
    }

    if remaining > 0 {
        return Err(Failure::new(
            FailureKind::CapacityExceeded,
            format!("no room for {remaining} {}", definition.name),
        ));
    }
    *inventory = working;
    Ok(())
}

/// Adds `quantity` units of `item_id` picked up from the ground.
///
/// # Errors
///
/// Returns `ItemNotFound` for an item the catalog does not know,
/// `QuantityOutOfRange` for a zero quantity and `CapacityExceeded` when the
/// units do not all fit.
pub fn pick_up(
    inventory: &Inventory,
    item_id: &str,
    quantity: u32,
    catalog: &dyn ItemCatalog,
) -> Result<Inventory, Failure> {
    let definition = catalog.get_item(item_id).ok_or_else(|| {
        Failure::new(FailureKind::ItemNotFound, format!("unknown item '{item_id}'"))
    })?;
    if quantity == 0 {
        return Err(Failure::new(
            FailureKind::QuantityOutOfRange,
            "quantity must be at least 1",
        ));
    }
    let mut next = inventory.clone();
    place(&mut next, definition, quantity)?;
    Ok(next)
}
