//! The equipment-choice wizard.
//!
//! A step-indexed state machine run once at character creation. Every forward
//! step records a checkpoint, so `back()` undoes exactly one step no matter how
//! deeply nested it was. The wizard finishes by resolving the player's
//! selections into a flat [`GrantList`].

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use super::grants::{Grant, GrantList};
use super::starting_gear::{EquipmentChoice, EquipmentOption, MultiSlotEntry, StartingGear};

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// Presenting the options of equipment choice `choice`.
    Presenting {
        /// Index into the class's equipment choices.
        choice: usize,
    },
    /// Waiting for a weapon pick inside a multi-slot option.
    ChoosingWeapon {
        /// Index into the class's equipment choices.
        choice: usize,
        /// Index of the weapon-choice slot within the selected option.
        slot: usize,
    },
    /// Waiting for a pack.
    PackSelection,
    /// All selections made; awaiting confirm or reject.
    Confirming,
    /// The grant list has been produced.
    Finalized,
    /// The player backed out of the first step.
    Exited,
}

/// What the player picked for one equipment choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Index of the selected option.
    pub option: usize,
    /// Weapon picks keyed by multi-slot index.
    pub weapons: BTreeMap<usize, String>,
}

/// Errors returned by wizard operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// The requested option index does not exist.
    #[error("option {index} is out of range ({available} available)")]
    OptionOutOfRange {
        /// The requested index.
        index: usize,
        /// How many options exist.
        available: usize,
    },

    /// The weapon is not one of the slot's candidates.
    #[error("weapon {0} is not offered for this slot")]
    WeaponNotOffered(String),

    /// The operation does not apply to the current state.
    #[error("operation not valid in state {0:?}")]
    InvalidState(WizardState),

    /// `confirm()` already produced the grant list.
    #[error("equipment selection already finalized")]
    AlreadyFinalized,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    state: WizardState,
    selections: Vec<Option<Selection>>,
    pack: Option<String>,
}

/// Back-navigable equipment-choice wizard for one class.
#[derive(Debug, Clone)]
pub struct EquipmentWizard {
    gear: StartingGear,
    state: WizardState,
    selections: Vec<Option<Selection>>,
    pack: Option<String>,
    history: Vec<Checkpoint>,
}

impl EquipmentWizard {
    /// Starts the wizard at the first step the configuration needs.
    #[must_use]
    pub fn new(gear: StartingGear) -> Self {
        let selections = vec![None; gear.equipment_choices.len()];
        let mut wizard = Self {
            gear,
            state: WizardState::Confirming,
            selections,
            pack: None,
            history: Vec::new(),
        };
        wizard.state = wizard.state_after(None);
        wizard
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> WizardState {
        self.state
    }

    /// The equipment choice being presented or configured.
    #[must_use]
    pub fn current_choice(&self) -> Option<&EquipmentChoice> {
        match self.state {
            WizardState::Presenting { choice } | WizardState::ChoosingWeapon { choice, .. } => {
                self.gear.equipment_choices.get(choice)
            }
            _ => None,
        }
    }

    /// Weapon candidates while in `ChoosingWeapon`.
    #[must_use]
    pub fn weapon_options(&self) -> Option<&[String]> {
        let WizardState::ChoosingWeapon { choice, slot } = self.state else {
            return None;
        };
        self.selected_option(choice)?.weapon_options(slot)
    }

    /// Pack candidates; empty when the class has no pack step.
    #[must_use]
    pub fn pack_options(&self) -> &[String] {
        self.gear
            .pack_choice
            .as_ref()
            .map_or(&[][..], |p| p.options.as_slice())
    }

    /// The selection recorded for equipment choice `choice`.
    #[must_use]
    pub fn selection(&self, choice: usize) -> Option<&Selection> {
        self.selections.get(choice).and_then(Option::as_ref)
    }

    /// The selected pack, if any.
    #[must_use]
    pub fn selected_pack(&self) -> Option<&str> {
        self.pack.as_deref()
    }

    /// Selects option `index` of the presented choice.
    ///
    /// Reselecting replaces the previous selection together with its weapon
    /// picks.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::InvalidState` outside `Presenting` and
    /// `WizardError::OptionOutOfRange` for an unknown option.
    pub fn select_option(&mut self, index: usize) -> Result<WizardState, WizardError> {
        self.ensure_open()?;
        let WizardState::Presenting { choice } = self.state else {
            return Err(WizardError::InvalidState(self.state));
        };
        let first_weapon_slot = {
            let options = self
                .gear
                .equipment_choices
                .get(choice)
                .map_or(&[][..], |c| c.options.as_slice());
            let option = options.get(index).ok_or(WizardError::OptionOutOfRange {
                index,
                available: options.len(),
            })?;
            option.weapon_slots().first().copied()
        };

        self.checkpoint();
        self.selections[choice] = Some(Selection {
            option: index,
            weapons: BTreeMap::new(),
        });
        self.state = match first_weapon_slot {
            Some(slot) => WizardState::ChoosingWeapon { choice, slot },
            None => self.state_after(Some(choice)),
        };
        debug!(choice, option = index, state = ?self.state, "equipment option selected");
        Ok(self.state)
    }

    /// Picks `weapon` for the current weapon-choice slot.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::InvalidState` outside `ChoosingWeapon` and
    /// `WizardError::WeaponNotOffered` if the slot does not list `weapon`.
    pub fn choose_weapon(&mut self, weapon: &str) -> Result<WizardState, WizardError> {
        self.ensure_open()?;
        let WizardState::ChoosingWeapon { choice, slot } = self.state else {
            return Err(WizardError::InvalidState(self.state));
        };
        let next_slot = {
            let option = self
                .selected_option(choice)
                .ok_or(WizardError::InvalidState(self.state))?;
            let offered = option.weapon_options(slot).unwrap_or_default();
            if !offered.iter().any(|w| w == weapon) {
                return Err(WizardError::WeaponNotOffered(weapon.to_owned()));
            }
            option.weapon_slots().into_iter().find(|s| *s > slot)
        };

        self.checkpoint();
        if let Some(selection) = self.selections[choice].as_mut() {
            selection.weapons.insert(slot, weapon.to_owned());
        }
        self.state = match next_slot {
            Some(slot) => WizardState::ChoosingWeapon { choice, slot },
            None => self.state_after(Some(choice)),
        };
        debug!(choice, slot, weapon, "weapon chosen");
        Ok(self.state)
    }

    /// Selects pack option `index`.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::InvalidState` outside `PackSelection` and
    /// `WizardError::OptionOutOfRange` for an unknown pack.
    pub fn select_pack(&mut self, index: usize) -> Result<WizardState, WizardError> {
        self.ensure_open()?;
        if self.state != WizardState::PackSelection {
            return Err(WizardError::InvalidState(self.state));
        }
        let options = self.pack_options();
        let pack = options
            .get(index)
            .cloned()
            .ok_or(WizardError::OptionOutOfRange {
                index,
                available: options.len(),
            })?;

        self.checkpoint();
        self.pack = Some(pack);
        self.state = WizardState::Confirming;
        Ok(self.state)
    }

    /// Undoes the last forward step; from the first step, exits the wizard.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::AlreadyFinalized` after `confirm()` and
    /// `WizardError::InvalidState` once exited.
    pub fn back(&mut self) -> Result<WizardState, WizardError> {
        self.ensure_open()?;
        match self.history.pop() {
            Some(checkpoint) => self.restore(checkpoint),
            None => self.state = WizardState::Exited,
        }
        debug!(state = ?self.state, "wizard stepped back");
        Ok(self.state)
    }

    /// Rejects the summary and rewinds to the last equipment choice, discarding
    /// that choice's selection and the pack selection.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::InvalidState` outside `Confirming`.
    pub fn reject(&mut self) -> Result<WizardState, WizardError> {
        self.ensure_open()?;
        if self.state != WizardState::Confirming {
            return Err(WizardError::InvalidState(self.state));
        }
        let target = match self.gear.equipment_choices.len().checked_sub(1) {
            Some(last) => WizardState::Presenting { choice: last },
            None if self.gear.offers_pack() => WizardState::PackSelection,
            None => return Ok(self.state),
        };
        if let Some(position) = self.history.iter().rposition(|c| c.state == target) {
            let checkpoint = self.history.swap_remove(position);
            self.history.truncate(position);
            self.restore(checkpoint);
        }
        debug!(state = ?self.state, "selection rejected");
        Ok(self.state)
    }

    /// Produces the grant list. Succeeds exactly once.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::AlreadyFinalized` on a second call and
    /// `WizardError::InvalidState` outside `Confirming`.
    pub fn confirm(&mut self) -> Result<GrantList, WizardError> {
        self.ensure_open()?;
        if self.state != WizardState::Confirming {
            return Err(WizardError::InvalidState(self.state));
        }

        let mut items = Vec::new();
        for (choice, selection) in self.gear.equipment_choices.iter().zip(&self.selections) {
            let Some(selection) = selection else { continue };
            let Some(option) = choice.options.get(selection.option) else {
                continue;
            };
            match option {
                EquipmentOption::Single { item, quantity } => {
                    items.push(Grant::new(item.clone(), *quantity));
                }
                EquipmentOption::Bundle { items: bundle } => items.extend(bundle.iter().cloned()),
                EquipmentOption::MultiSlot { slots, .. } => {
                    for (index, slot) in slots.iter().enumerate() {
                        match slot {
                            MultiSlotEntry::Fixed { item, quantity } => {
                                items.push(Grant::new(item.clone(), *quantity));
                            }
                            MultiSlotEntry::WeaponChoice { .. } => {
                                if let Some(weapon) = selection.weapons.get(&index) {
                                    items.push(Grant::new(weapon.clone(), 1));
                                }
                            }
                        }
                    }
                }
            }
        }
        items.extend(self.gear.given_items.iter().cloned());

        self.state = WizardState::Finalized;
        self.history.clear();
        Ok(GrantList {
            items,
            pack: self.pack.clone(),
        })
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        match self.state {
            WizardState::Finalized => Err(WizardError::AlreadyFinalized),
            WizardState::Exited => Err(WizardError::InvalidState(WizardState::Exited)),
            _ => Ok(()),
        }
    }

    fn selected_option(&self, choice: usize) -> Option<&EquipmentOption> {
        let selection = self.selection(choice)?;
        self.gear
            .equipment_choices
            .get(choice)?
            .options
            .get(selection.option)
    }

    fn state_after(&self, choice: Option<usize>) -> WizardState {
        let next = choice.map_or(0, |c| c + 1);
        if next < self.gear.equipment_choices.len() {
            WizardState::Presenting { choice: next }
        } else if self.gear.offers_pack() {
            WizardState::PackSelection
        } else {
            WizardState::Confirming
        }
    }

    fn checkpoint(&mut self) {
        self.history.push(Checkpoint {
            state: self.state,
            selections: self.selections.clone(),
            pack: self.pack.clone(),
        });
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.state = checkpoint.state;
        self.selections = checkpoint.selections;
        self.pack = checkpoint.pack;
    }
}
