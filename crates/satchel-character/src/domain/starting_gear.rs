//! Class starting-gear configuration.
//!
//! Static content describing the equipment decisions a class makes at
//! creation time. Loaded by the content context and fed to the wizard.

use serde::{Deserialize, Serialize};

use super::grants::Grant;

fn default_quantity() -> u32 {
    1
}

/// One position inside a multi-slot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MultiSlotEntry {
    /// Always granted.
    Fixed {
        /// Item identifier.
        item: String,
        /// Number of units.
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
    /// The player picks one weapon from `options`.
    WeaponChoice {
        /// Candidate item identifiers.
        options: Vec<String>,
    },
}

/// A selectable option within an equipment choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EquipmentOption {
    /// A single item stack.
    Single {
        /// Item identifier.
        item: String,
        /// Number of units.
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
    /// A fixed group of stacks taken together.
    Bundle {
        /// The grouped stacks.
        items: Vec<Grant>,
    },
    /// A configuration of fixed items and weapon picks.
    MultiSlot {
        /// Display label.
        #[serde(default)]
        label: String,
        /// Slots in presentation order.
        slots: Vec<MultiSlotEntry>,
    },
}

impl EquipmentOption {
    /// Indexes of the slots that need a weapon pick, in order.
    #[must_use]
    pub fn weapon_slots(&self) -> Vec<usize> {
        match self {
            Self::MultiSlot { slots, .. } => slots
                .iter()
                .enumerate()
                .filter(|(_, s)| matches!(s, MultiSlotEntry::WeaponChoice { .. }))
                .map(|(i, _)| i)
                .collect(),
            Self::Single { .. } | Self::Bundle { .. } => Vec::new(),
        }
    }

    /// Weapon candidates for the multi-slot entry at `slot`.
    #[must_use]
    pub fn weapon_options(&self, slot: usize) -> Option<&[String]> {
        match self {
            Self::MultiSlot { slots, .. } => match slots.get(slot) {
                Some(MultiSlotEntry::WeaponChoice { options }) => Some(options),
                _ => None,
            },
            Self::Single { .. } | Self::Bundle { .. } => None,
        }
    }
}

/// One decision the player makes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentChoice {
    /// Identifier, stable within a class.
    #[serde(default)]
    pub id: String,
    /// Prompt shown to the player.
    #[serde(default)]
    pub description: String,
    /// The mutually exclusive options.
    pub options: Vec<EquipmentOption>,
}

/// The equipment packs a class may pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackChoice {
    /// Prompt shown to the player.
    #[serde(default)]
    pub description: String,
    /// Pack item identifiers. A single entry means the pack is forced.
    pub options: Vec<String>,
}

/// Starting-gear configuration for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingGear {
    /// Ordered equipment decisions.
    #[serde(default)]
    pub equipment_choices: Vec<EquipmentChoice>,
    /// Pack decision, absent when the class gets no pack.
    #[serde(default)]
    pub pack_choice: Option<PackChoice>,
    /// Items every member of the class receives.
    #[serde(default)]
    pub given_items: Vec<Grant>,
}

impl StartingGear {
    /// Returns `true` if the wizard needs a pack-selection step.
    #[must_use]
    pub fn offers_pack(&self) -> bool {
        self.pack_choice
            .as_ref()
            .is_some_and(|p| !p.options.is_empty())
    }
}

/// Starting gear keyed by class name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStartingGear {
    /// Class name.
    pub class: String,
    /// The class's configuration.
    pub starting_gear: StartingGear,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIGHTER_YAML: &str = r"
class: fighter
starting_gear:
  equipment_choices:
    - id: armor
      description: Choose your armor
      options:
        - type: single
          item: chain-mail
        - type: bundle
          items:
            - item: leather-armor
            - item: longbow
            - item: arrows
              quantity: 20
    - id: weapons
      description: Choose your weapons
      options:
        - type: multi_slot
          label: Weapon and shield
          slots:
            - type: weapon_choice
              options: [longsword, battleaxe]
            - type: fixed
              item: shield
  pack_choice:
    description: Choose a pack
    options: [dungeoneers-pack, explorers-pack]
  given_items:
    - item: rations
      quantity: 2
";

    #[test]
    fn test_deserialize_class_starting_gear_from_yaml() {
        // Act
        let gear: ClassStartingGear = serde_yaml::from_str(FIGHTER_YAML).unwrap();

        // Assert
        assert_eq!(gear.class, "fighter");
        let choices = &gear.starting_gear.equipment_choices;
        assert_eq!(choices.len(), 2);
        assert_eq!(
            choices[0].options[0],
            EquipmentOption::Single {
                item: "chain-mail".to_owned(),
                quantity: 1
            }
        );
        match &choices[0].options[1] {
            EquipmentOption::Bundle { items } => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[2], Grant::new("arrows", 20));
            }
            other => panic!("expected Bundle, got {other:?}"),
        }
        assert_eq!(choices[1].options[0].weapon_slots(), vec![0]);
        assert!(gear.starting_gear.offers_pack());
        assert_eq!(gear.starting_gear.given_items[0].quantity, 2);
    }

    #[test]
    fn test_weapon_options_only_for_weapon_choice_slots() {
        // Arrange
        let gear: ClassStartingGear = serde_yaml::from_str(FIGHTER_YAML).unwrap();
        let multi = &gear.starting_gear.equipment_choices[1].options[0];

        // Act / Assert
        assert_eq!(
            multi.weapon_options(0),
            Some(&["longsword".to_owned(), "battleaxe".to_owned()][..])
        );
        assert_eq!(multi.weapon_options(1), None);
        assert_eq!(multi.weapon_options(7), None);
    }

    #[test]
    fn test_empty_pack_choice_is_not_offered() {
        // Arrange
        let gear = StartingGear {
            equipment_choices: Vec::new(),
            pack_choice: Some(PackChoice {
                description: String::new(),
                options: Vec::new(),
            }),
            given_items: Vec::new(),
        };

        // Act / Assert
        assert!(!gear.offers_pack());
    }
}
