//! The inventory model: slot collections and their invariants.
//!
//! A character carries four quick-access general slots, a twenty-slot
//! backpack reachable while a bag is worn, named equipment slots and, once
//! registered, a forty-slot vault kept in a building. Empty slots are `None`;
//! a stack never has quantity zero.
//!
//! The public surface is query-only. Mutation goes through the action
//! processor, seeding and pick-up placement inside this crate.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::failure::{Failure, FailureKind};
use super::location::VaultLocation;

/// Number of general (quick-access) slots.
pub const GENERAL_SLOTS: usize = 4;
/// Number of backpack slots.
pub const BACKPACK_SLOTS: usize = 20;
/// Number of vault slots.
pub const VAULT_SLOTS: usize = 40;

/// A quantity of one item occupying one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item identifier.
    #[serde(rename = "item")]
    pub item_id: String,
    /// Number of units, at least one.
    pub quantity: u32,
}

impl ItemStack {
    /// Creates a stack.
    #[must_use]
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Named worn-equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    /// Primary weapon hand.
    MainHand,
    /// Shield or secondary weapon.
    OffHand,
    /// Body armor.
    Armor,
    /// Head.
    Helmet,
    /// Feet.
    Boots,
    /// Hands.
    Gloves,
    /// First ring.
    #[serde(rename = "ring_1")]
    Ring1,
    /// Second ring.
    #[serde(rename = "ring_2")]
    Ring2,
    /// Neck.
    Necklace,
    /// Back.
    Cloak,
    /// The worn bag; holding one makes the backpack reachable.
    Bag,
}

impl EquipmentSlot {
    /// Every slot in display order.
    pub const ALL: [Self; 11] = [
        Self::MainHand,
        Self::OffHand,
        Self::Armor,
        Self::Helmet,
        Self::Boots,
        Self::Gloves,
        Self::Ring1,
        Self::Ring2,
        Self::Necklace,
        Self::Cloak,
        Self::Bag,
    ];

    /// The slot's wire name, matched against catalog `gear_slot` values.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MainHand => "main_hand",
            Self::OffHand => "off_hand",
            Self::Armor => "armor",
            Self::Helmet => "helmet",
            Self::Boots => "boots",
            Self::Gloves => "gloves",
            Self::Ring1 => "ring_1",
            Self::Ring2 => "ring_2",
            Self::Necklace => "necklace",
            Self::Cloak => "cloak",
            Self::Bag => "bag",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kinds of slot collection a character owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// Quick-access slots.
    #[serde(rename = "general")]
    General,
    /// Slots inside the worn bag.
    #[serde(rename = "inventory", alias = "backpack")]
    Backpack,
    /// Worn equipment.
    #[serde(rename = "equipment")]
    Equipment,
    /// Off-site storage.
    #[serde(rename = "vault")]
    Vault,
}

impl ContainerKind {
    /// The wire name of the container.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Backpack => "inventory",
            Self::Equipment => "equipment",
            Self::Vault => "vault",
        }
    }

    /// Parses a wire name; `backpack` is accepted for `inventory`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "general" => Some(Self::General),
            "inventory" | "backpack" => Some(Self::Backpack),
            "equipment" => Some(Self::Equipment),
            "vault" => Some(Self::Vault),
            _ => None,
        }
    }
}

/// Address of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRef {
    /// General slot by index.
    General(usize),
    /// Backpack slot by index.
    Backpack(usize),
    /// Equipment slot by name.
    Equipment(EquipmentSlot),
    /// Vault slot by index.
    Vault(usize),
}

impl SlotRef {
    /// The container this slot belongs to.
    #[must_use]
    pub fn kind(self) -> ContainerKind {
        match self {
            Self::General(_) => ContainerKind::General,
            Self::Backpack(_) => ContainerKind::Backpack,
            Self::Equipment(_) => ContainerKind::Equipment,
            Self::Vault(_) => ContainerKind::Vault,
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General(i) => write!(f, "general[{i}]"),
            Self::Backpack(i) => write!(f, "backpack[{i}]"),
            Self::Equipment(slot) => write!(f, "equipment[{slot}]"),
            Self::Vault(i) => write!(f, "vault[{i}]"),
        }
    }
}

/// A registered storage vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    /// Where the vault is kept.
    pub location: VaultLocation,
    slots: Vec<Option<ItemStack>>,
}

impl Vault {
    /// An empty vault at `location`.
    #[must_use]
    pub fn new(location: VaultLocation) -> Self {
        Self {
            location,
            slots: vec![None; VAULT_SLOTS],
        }
    }

    /// The vault's slots.
    #[must_use]
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }
}

/// A character's complete carried state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "InventorySnapshot", try_from = "InventorySnapshot")]
pub struct Inventory {
    general: Vec<Option<ItemStack>>,
    backpack: Vec<Option<ItemStack>>,
    equipment: BTreeMap<EquipmentSlot, ItemStack>,
    vault: Option<Vault>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// An inventory with every slot empty and no vault.
    #[must_use]
    pub fn new() -> Self {
        Self {
            general: vec![None; GENERAL_SLOTS],
            backpack: vec![None; BACKPACK_SLOTS],
            equipment: BTreeMap::new(),
            vault: None,
        }
    }

    /// General slots in index order.
    #[must_use]
    pub fn general(&self) -> &[Option<ItemStack>] {
        &self.general
    }

    /// Backpack slots in index order.
    #[must_use]
    pub fn backpack(&self) -> &[Option<ItemStack>] {
        &self.backpack
    }

    /// Worn equipment.
    #[must_use]
    pub fn equipment(&self) -> &BTreeMap<EquipmentSlot, ItemStack> {
        &self.equipment
    }

    /// The registered vault, if any.
    #[must_use]
    pub fn vault(&self) -> Option<&Vault> {
        self.vault.as_ref()
    }

    /// Returns `true` while a bag is worn.
    #[must_use]
    pub fn has_bag(&self) -> bool {
        self.equipment.contains_key(&EquipmentSlot::Bag)
    }

    /// Returns `true` if `slot` names a slot that exists right now.
    ///
    /// Backpack slots exist only while a bag is worn and vault slots only
    /// once a vault is registered. Reachability of the vault is a separate
    /// question decided by the session's location.
    #[must_use]
    pub fn is_addressable(&self, slot: SlotRef) -> bool {
        match slot {
            SlotRef::General(i) => i < self.general.len(),
            SlotRef::Backpack(i) => self.has_bag() && i < self.backpack.len(),
            SlotRef::Equipment(_) => true,
            SlotRef::Vault(i) => self.vault.as_ref().is_some_and(|v| i < v.slots.len()),
        }
    }

    /// The stack in `slot`, or `None` if empty or not addressable.
    #[must_use]
    pub fn get(&self, slot: SlotRef) -> Option<&ItemStack> {
        match slot {
            SlotRef::General(i) => self.general.get(i)?.as_ref(),
            SlotRef::Backpack(i) => self.backpack.get(i)?.as_ref(),
            SlotRef::Equipment(name) => self.equipment.get(&name),
            SlotRef::Vault(i) => self.vault.as_ref()?.slots.get(i)?.as_ref(),
        }
    }

    /// Every slot of `kind` with its content, in index order.
    #[must_use]
    pub fn slots(&self, kind: ContainerKind) -> Vec<(SlotRef, Option<&ItemStack>)> {
        match kind {
            ContainerKind::General => indexed(&self.general, SlotRef::General),
            ContainerKind::Backpack => indexed(&self.backpack, SlotRef::Backpack),
            ContainerKind::Equipment => EquipmentSlot::ALL
                .into_iter()
                .map(|slot| (SlotRef::Equipment(slot), self.equipment.get(&slot)))
                .collect(),
            ContainerKind::Vault => self
                .vault
                .as_ref()
                .map(|v| indexed(&v.slots, SlotRef::Vault))
                .unwrap_or_default(),
        }
    }

    /// Occupied slots of `kind`, in index order.
    #[must_use]
    pub fn occupied(&self, kind: ContainerKind) -> Vec<(SlotRef, &ItemStack)> {
        self.slots(kind)
            .into_iter()
            .filter_map(|(slot, stack)| stack.map(|s| (slot, s)))
            .collect()
    }

    /// First slot of `kind` holding `item_id`.
    #[must_use]
    pub fn find(&self, kind: ContainerKind, item_id: &str) -> Option<SlotRef> {
        self.occupied(kind)
            .into_iter()
            .find(|(_, stack)| stack.item_id == item_id)
            .map(|(slot, _)| slot)
    }

    /// Number of empty, addressable slots of `kind`.
    #[must_use]
    pub fn free_slots(&self, kind: ContainerKind) -> usize {
        self.slots(kind)
            .into_iter()
            .filter(|(slot, stack)| stack.is_none() && self.is_addressable(*slot))
            .count()
    }

    /// Lowest-index empty, addressable slot of `kind`.
    #[must_use]
    pub fn first_free(&self, kind: ContainerKind) -> Option<SlotRef> {
        self.slots(kind)
            .into_iter()
            .find(|(slot, stack)| stack.is_none() && self.is_addressable(*slot))
            .map(|(slot, _)| slot)
    }

    /// Units of `item_id` across every container.
    #[must_use]
    pub fn total_quantity(&self, item_id: &str) -> u64 {
        [
            ContainerKind::General,
            ContainerKind::Backpack,
            ContainerKind::Equipment,
            ContainerKind::Vault,
        ]
        .into_iter()
        .flat_map(|kind| self.occupied(kind))
        .filter(|(_, stack)| stack.item_id == item_id)
        .map(|(_, stack)| u64::from(stack.quantity))
        .sum()
    }

    /// Checks the model's invariants without repairing anything.
    ///
    /// # Errors
    ///
    /// Returns an `InternalInconsistency` failure for a zero-quantity stack,
    /// a container with the wrong number of slots, or backpack contents with
    /// no bag worn.
    pub fn validate(&self) -> Result<(), Failure> {
        let inconsistent =
            |message: String| Failure::new(FailureKind::InternalInconsistency, message);

        if self.general.len() != GENERAL_SLOTS {
            return Err(inconsistent(format!(
                "general has {} slots, expected {GENERAL_SLOTS}",
                self.general.len()
            )));
        }
        if self.backpack.len() != BACKPACK_SLOTS {
            return Err(inconsistent(format!(
                "backpack has {} slots, expected {BACKPACK_SLOTS}",
                self.backpack.len()
            )));
        }
        if let Some(vault) = self.vault.as_ref().filter(|v| v.slots.len() != VAULT_SLOTS) {
            return Err(inconsistent(format!(
                "vault has {} slots, expected {VAULT_SLOTS}",
                vault.slots.len()
            )));
        }
        if !self.has_bag() && self.backpack.iter().any(Option::is_some) {
            return Err(inconsistent("backpack holds items but no bag is worn".to_owned()));
        }
        for kind in [
            ContainerKind::General,
            ContainerKind::Backpack,
            ContainerKind::Equipment,
            ContainerKind::Vault,
        ] {
            if let Some((slot, _)) = self
                .occupied(kind)
                .into_iter()
                .find(|(_, stack)| stack.quantity == 0)
            {
                return Err(inconsistent(format!("{slot} holds a zero-quantity stack")));
            }
        }
        Ok(())
    }

    /// Mutable access to the content of an addressable indexed slot.
    fn cell_mut(&mut self, slot: SlotRef) -> Option<&mut Option<ItemStack>> {
        match slot {
            SlotRef::General(i) => self.general.get_mut(i),
            SlotRef::Backpack(i) => self.backpack.get_mut(i),
            SlotRef::Vault(i) => self.vault.as_mut()?.slots.get_mut(i),
            SlotRef::Equipment(_) => None,
        }
    }

    /// Removes and returns the whole stack in `slot`.
    pub(crate) fn take(&mut self, slot: SlotRef) -> Option<ItemStack> {
        match slot {
            SlotRef::Equipment(name) => self.equipment.remove(&name),
            _ => self.cell_mut(slot)?.take(),
        }
    }

    /// Replaces the content of `slot`, returning what was there.
    pub(crate) fn put(&mut self, slot: SlotRef, stack: Option<ItemStack>) -> Option<ItemStack> {
        match slot {
            SlotRef::Equipment(name) => match stack {
                Some(stack) => self.equipment.insert(name, stack),
                None => self.equipment.remove(&name),
            },
            _ => match self.cell_mut(slot) {
                Some(cell) => std::mem::replace(cell, stack),
                None => stack,
            },
        }
    }

    /// Mutable access to the stack in `slot`.
    pub(crate) fn stack_mut(&mut self, slot: SlotRef) -> Option<&mut ItemStack> {
        match slot {
            SlotRef::Equipment(name) => self.equipment.get_mut(&name),
            _ => self.cell_mut(slot)?.as_mut(),
        }
    }

    /// Removes `quantity` units from `slot`, emptying it at zero.
    pub(crate) fn remove_quantity(&mut self, slot: SlotRef, quantity: u32) {
        let emptied = match self.stack_mut(slot) {
            Some(stack) => {
                stack.quantity = stack.quantity.saturating_sub(quantity);
                stack.quantity == 0
            }
            None => false,
        };
        if emptied {
            self.take(slot);
        }
    }

    /// Installs a vault, replacing none.
    pub(crate) fn install_vault(&mut self, vault: Vault) {
        self.vault = Some(vault);
    }
}

fn indexed(
    cells: &[Option<ItemStack>],
    to_ref: fn(usize) -> SlotRef,
) -> Vec<(SlotRef, Option<&ItemStack>)> {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| (to_ref(i), cell.as_ref()))
        .collect()
}

// --- persisted layout ---

/// The worn bag with the backpack's contents nested inside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BagSlot {
    item: Option<String>,
    #[serde(default)]
    quantity: u32,
    #[serde(default)]
    contents: Vec<Option<ItemStack>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GearSlots {
    #[serde(default)]
    main_hand: Option<ItemStack>,
    #[serde(default)]
    off_hand: Option<ItemStack>,
    #[serde(default)]
    armor: Option<ItemStack>,
    #[serde(default)]
    helmet: Option<ItemStack>,
    #[serde(default)]
    boots: Option<ItemStack>,
    #[serde(default)]
    gloves: Option<ItemStack>,
    #[serde(default)]
    ring_1: Option<ItemStack>,
    #[serde(default)]
    ring_2: Option<ItemStack>,
    #[serde(default)]
    necklace: Option<ItemStack>,
    #[serde(default)]
    cloak: Option<ItemStack>,
    #[serde(default)]
    bag: BagSlot,
}

impl GearSlots {
    fn worn_mut(&mut self, slot: EquipmentSlot) -> Option<&mut Option<ItemStack>> {
        match slot {
            EquipmentSlot::MainHand => Some(&mut self.main_hand),
            EquipmentSlot::OffHand => Some(&mut self.off_hand),
            EquipmentSlot::Armor => Some(&mut self.armor),
            EquipmentSlot::Helmet => Some(&mut self.helmet),
            EquipmentSlot::Boots => Some(&mut self.boots),
            EquipmentSlot::Gloves => Some(&mut self.gloves),
            EquipmentSlot::Ring1 => Some(&mut self.ring_1),
            EquipmentSlot::Ring2 => Some(&mut self.ring_2),
            EquipmentSlot::Necklace => Some(&mut self.necklace),
            EquipmentSlot::Cloak => Some(&mut self.cloak),
            EquipmentSlot::Bag => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VaultSnapshot {
    city: String,
    building: String,
    slots: Vec<Option<ItemStack>>,
}

/// Serialized form of [`Inventory`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InventorySnapshot {
    general_slots: Vec<Option<ItemStack>>,
    gear_slots: GearSlots,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vault: Option<VaultSnapshot>,
}

impl From<Inventory> for InventorySnapshot {
    fn from(inventory: Inventory) -> Self {
        let Inventory {
            general,
            backpack,
            mut equipment,
            vault,
        } = inventory;

        let bag = match equipment.remove(&EquipmentSlot::Bag) {
            Some(stack) => BagSlot {
                item: Some(stack.item_id),
                quantity: stack.quantity,
                contents: backpack,
            },
            None => BagSlot::default(),
        };
        let mut gear_slots = GearSlots {
            bag,
            ..GearSlots::default()
        };
        for (slot, stack) in equipment {
            if let Some(cell) = gear_slots.worn_mut(slot) {
                *cell = Some(stack);
            }
        }

        Self {
            general_slots: general,
            gear_slots,
            vault: vault.map(|v| VaultSnapshot {
                city: v.location.city,
                building: v.location.building,
                slots: v.slots,
            }),
        }
    }
}

fn padded(
    mut cells: Vec<Option<ItemStack>>,
    capacity: usize,
    name: &str,
) -> Result<Vec<Option<ItemStack>>, String> {
    if cells.len() > capacity {
        return Err(format!(
            "{name} has {} slots, at most {capacity} allowed",
            cells.len()
        ));
    }
    cells.resize(capacity, None);
    Ok(cells)
}

impl TryFrom<InventorySnapshot> for Inventory {
    type Error = String;

    fn try_from(snapshot: InventorySnapshot) -> Result<Self, Self::Error> {
        let InventorySnapshot {
            general_slots,
            mut gear_slots,
            vault,
        } = snapshot;

        let mut equipment = BTreeMap::new();
        for slot in EquipmentSlot::ALL {
            if let Some(stack) = gear_slots.worn_mut(slot).and_then(Option::take) {
                equipment.insert(slot, stack);
            }
        }
        let bag = gear_slots.bag;
        if let Some(item) = bag.item {
            equipment.insert(EquipmentSlot::Bag, ItemStack::new(item, bag.quantity));
        } else if bag.contents.iter().any(Option::is_some) {
            return Err("backpack contents present but no bag is worn".to_owned());
        }

        let inventory = Self {
            general: padded(general_slots, GENERAL_SLOTS, "general_slots")?,
            backpack: padded(bag.contents, BACKPACK_SLOTS, "bag contents")?,
            equipment,
            vault: vault
                .map(|v| -> Result<Vault, String> {
                    Ok(Vault {
                        location: VaultLocation {
                            city: v.city,
                            building: v.building,
                        },
                        slots: padded(v.slots, VAULT_SLOTS, "vault")?,
                    })
                })
                .transpose()?,
        };
        inventory.validate().map_err(|f| f.message)?;
        Ok(inventory)
    }
}
