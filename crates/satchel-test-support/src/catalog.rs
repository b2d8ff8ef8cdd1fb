//! Sample item catalog shared by tests across the workspace.

use satchel_content::domain::catalog::StaticCatalog;
use satchel_core::catalog::{CONTAINER_TAG, ItemDefinition, PackEntry};
use satchel_core::effects::{EffectKind, ItemEffect};

/// A small catalog covering every item shape the engine distinguishes:
///
/// | id | shape |
/// |---|---|
/// | `dagger`, `sword` | `main_hand` weapons |
/// | `shield` | `off_hand` |
/// | `leather-armor` | `armor` |
/// | `ring` | `ring_1` |
/// | `backpack` | `bag` container |
/// | `pouch` | container without a gear slot |
/// | `rations` | consumable, stack 10, hunger +1 |
/// | `potion` | consumable, stack 5, hp +5 |
/// | `arrows` | stack 20 |
/// | `torch` | stack 5 |
/// | `rope` | plain item |
/// | `explorers-pack` | pack of rations x5, torch x2, rope |
///
/// Weights: dagger 1, backpack 5 (+30 capacity), rations 2, potion 1,
/// torch 1, rope 10; everything else weighs nothing.
///
/// # Panics
///
/// Never; the fixture has unique ids and valid pack contents.
#[must_use]
pub fn sample_catalog() -> StaticCatalog {
    StaticCatalog::from_definitions(vec![
        ItemDefinition::new("dagger")
            .with_gear_slot("main_hand")
            .with_weight(1.0),
        ItemDefinition::new("sword").with_gear_slot("main_hand"),
        ItemDefinition::new("shield").with_gear_slot("off_hand"),
        ItemDefinition::new("leather-armor").with_gear_slot("armor"),
        ItemDefinition::new("ring").with_gear_slot("ring_1"),
        ItemDefinition::new("backpack")
            .with_gear_slot("bag")
            .with_tag(CONTAINER_TAG)
            .with_weight(5.0)
            .with_weight_increase(30.0),
        ItemDefinition::new("pouch").with_tag(CONTAINER_TAG),
        ItemDefinition::new("rations")
            .with_stack_limit(10)
            .with_weight(2.0)
            .consumable_with(vec![ItemEffect::new(EffectKind::Hunger, 1)]),
        ItemDefinition::new("potion")
            .with_stack_limit(5)
            .with_weight(1.0)
            .consumable_with(vec![ItemEffect::new(EffectKind::Hp, 5)]),
        ItemDefinition::new("arrows").with_stack_limit(20),
        ItemDefinition::new("torch")
            .with_stack_limit(5)
            .with_weight(1.0),
        ItemDefinition::new("rope").with_weight(10.0),
        ItemDefinition::new("explorers-pack").with_contents(vec![
            PackEntry {
                item: "rations".to_owned(),
                quantity: 5,
            },
            PackEntry {
                item: "torch".to_owned(),
                quantity: 2,
            },
            PackEntry {
                item: "rope".to_owned(),
                quantity: 1,
            },
        ]),
    ])
    .unwrap()
}
