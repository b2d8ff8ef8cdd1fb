//! Class starting-gear table.

use std::collections::BTreeMap;

use satchel_character::domain::starting_gear::{
    ClassStartingGear, EquipmentOption, MultiSlotEntry, StartingGear,
};
use satchel_core::catalog::ItemCatalog;

use crate::error::ContentError;

/// Starting gear for every playable class.
#[derive(Debug, Clone, Default)]
pub struct StartingGearTable {
    classes: BTreeMap<String, StartingGear>,
}

impl StartingGearTable {
    /// Builds the table from per-class entries.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::DuplicateClass` if a class appears twice.
    pub fn from_entries(entries: Vec<ClassStartingGear>) -> Result<Self, ContentError> {
        let mut classes = BTreeMap::new();
        for entry in entries {
            if classes.contains_key(&entry.class) {
                return Err(ContentError::DuplicateClass(entry.class));
            }
            classes.insert(entry.class, entry.starting_gear);
        }
        Ok(Self { classes })
    }

    /// Parses the table from a YAML list of class entries.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Parse` for malformed YAML and
    /// `ContentError::DuplicateClass` for a repeated class.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ContentError> {
        let entries: Vec<ClassStartingGear> = serde_yaml::from_str(yaml)?;
        Self::from_entries(entries)
    }

    /// Starting gear for `class`.
    #[must_use]
    pub fn get(&self, class: &str) -> Option<&StartingGear> {
        self.classes.get(class)
    }

    /// Class names in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Checks that every referenced item exists in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::UnknownGearItem` for the first missing item.
    pub fn validate_against(&self, catalog: &dyn ItemCatalog) -> Result<(), ContentError> {
        for (class, gear) in &self.classes {
            if let Some(item) = referenced_items(gear).find(|i| catalog.get_item(i).is_none()) {
                return Err(ContentError::UnknownGearItem {
                    class: class.clone(),
                    item: item.to_owned(),
                });
            }
        }
        Ok(())
    }
}

fn referenced_items(gear: &StartingGear) -> impl Iterator<Item = &str> {
    let options = gear
        .equipment_choices
        .iter()
        .flat_map(|c| c.options.iter())
        .flat_map(option_items);
    let packs = gear
        .pack_choice
        .iter()
        .flat_map(|p| p.options.iter().map(String::as_str));
    let given = gear.given_items.iter().map(|g| g.item.as_str());
    options.chain(packs).chain(given)
}

fn option_items(option: &EquipmentOption) -> Vec<&str> {
    match option {
        EquipmentOption::Single { item, .. } => vec![item.as_str()],
        EquipmentOption::Bundle { items } => items.iter().map(|g| g.item.as_str()).collect(),
        EquipmentOption::MultiSlot { slots, .. } => slots
            .iter()
            .flat_map(|slot| match slot {
                MultiSlotEntry::Fixed { item, .. } => vec![item.as_str()],
                MultiSlotEntry::WeaponChoice { options } => {
                    options.iter().map(String::as_str).collect()
                }
            })
            .collect(),
    }
}
