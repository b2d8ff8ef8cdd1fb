//! Inventory actions and their wire representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::failure::{Failure, FailureKind};
use super::model::{ContainerKind, EquipmentSlot, Inventory, SlotRef};

/// The seven atomic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Wear an item.
    Equip,
    /// Take a worn item off.
    Unequip,
    /// Relocate a stack, swapping with the destination's occupant.
    Move,
    /// Merge a stack into another of the same item.
    Stack,
    /// Divide a stack in two.
    Split,
    /// Put units on the ground.
    Drop,
    /// Consume one unit.
    Use,
}

impl ActionKind {
    /// The wire name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Equip => "equip",
            Self::Unequip => "unequip",
            Self::Move => "move",
            Self::Stack => "stack",
            Self::Split => "split",
            Self::Drop => "drop",
            Self::Use => "use",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully addressed inventory operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Wear the stack at `from` in equipment slot `to`.
    Equip {
        /// Item the caller expects at `from`.
        item_id: String,
        /// Source slot.
        from: SlotRef,
        /// Target equipment slot.
        to: EquipmentSlot,
    },
    /// Take off the item worn in `from`.
    Unequip {
        /// Item the caller expects at `from`.
        item_id: String,
        /// Equipment slot to empty.
        from: EquipmentSlot,
    },
    /// Move the stack at `from` to `to`, swapping with any occupant.
    Move {
        /// Item the caller expects at `from`.
        item_id: String,
        /// Source slot.
        from: SlotRef,
        /// Destination slot.
        to: SlotRef,
    },
    /// Merge the stack at `from` into the same item at `to`.
    Stack {
        /// Item the caller expects at `from`.
        item_id: String,
        /// Source slot.
        from: SlotRef,
        /// Destination slot.
        to: SlotRef,
    },
    /// Move `quantity` units from `from` into a new stack at `to`.
    Split {
        /// Item the caller expects at `from`.
        item_id: String,
        /// Source slot.
        from: SlotRef,
        /// Empty destination slot, required.
        to: Option<SlotRef>,
        /// Units to move.
        quantity: u32,
    },
    /// Put `quantity` units from `from` on the ground.
    Drop {
        /// Item the caller expects at `from`.
        item_id: String,
        /// Source slot.
        from: SlotRef,
        /// Units to drop.
        quantity: u32,
    },
    /// Consume one unit from `from`.
    Use {
        /// Item the caller expects at `from`.
        item_id: String,
        /// Source slot.
        from: SlotRef,
    },
}

impl Action {
    /// The operation's kind.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Equip { .. } => ActionKind::Equip,
            Self::Unequip { .. } => ActionKind::Unequip,
            Self::Move { .. } => ActionKind::Move,
            Self::Stack { .. } => ActionKind::Stack,
            Self::Split { .. } => ActionKind::Split,
            Self::Drop { .. } => ActionKind::Drop,
            Self::Use { .. } => ActionKind::Use,
        }
    }

    /// The item the caller expects at the source.
    #[must_use]
    pub fn item_id(&self) -> &str {
        match self {
            Self::Equip { item_id, .. }
            | Self::Unequip { item_id, .. }
            | Self::Move { item_id, .. }
            | Self::Stack { item_id, .. }
            | Self::Split { item_id, .. }
            | Self::Drop { item_id, .. }
            | Self::Use { item_id, .. } => item_id,
        }
    }
}

fn default_index() -> i64 {
    -1
}

fn default_quantity() -> i64 {
    1
}

/// An action as sent by a client.
///
/// Indexes are `-1` and names are empty when not applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Item the client believes occupies the source slot.
    pub item_id: String,
    /// Operation to perform.
    pub action: ActionKind,
    /// Source index.
    #[serde(default = "default_index")]
    pub from_slot: i64,
    /// Destination index.
    #[serde(default = "default_index")]
    pub to_slot: i64,
    /// Source container name.
    #[serde(default)]
    pub from_slot_type: String,
    /// Destination container name.
    #[serde(default)]
    pub to_slot_type: String,
    /// Source equipment slot name.
    #[serde(default)]
    pub from_equip: String,
    /// Destination equipment slot name.
    #[serde(default)]
    pub to_equip: String,
    /// Units for `split` and `drop`.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

impl ActionRequest {
    /// A request with no slots addressed.
    #[must_use]
    pub fn new(action: ActionKind, item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            action,
            from_slot: -1,
            to_slot: -1,
            from_slot_type: String::new(),
            to_slot_type: String::new(),
            from_equip: String::new(),
            to_equip: String::new(),
            quantity: 1,
        }
    }

    /// Addresses the source slot.
    #[must_use]
    pub fn from(mut self, slot: SlotRef) -> Self {
        let (kind, index, equip) = wire_address(slot);
        self.from_slot_type = kind;
        self.from_slot = index;
        self.from_equip = equip;
        self
    }

    /// Addresses the destination slot.
    #[must_use]
    pub fn to(mut self, slot: SlotRef) -> Self {
        let (kind, index, equip) = wire_address(slot);
        self.to_slot_type = kind;
        self.to_slot = index;
        self.to_equip = equip;
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }
}

fn wire_address(slot: SlotRef) -> (String, i64, String) {
    let index = |i: usize| i64::try_from(i).unwrap_or(i64::MAX);
    match slot {
        SlotRef::General(i) | SlotRef::Backpack(i) | SlotRef::Vault(i) => {
            (slot.kind().name().to_owned(), index(i), String::new())
        }
        SlotRef::Equipment(name) => (
            ContainerKind::Equipment.name().to_owned(),
            -1,
            name.name().to_owned(),
        ),
    }
}

fn invalid_slot(message: impl Into<String>) -> Failure {
    Failure::new(FailureKind::InvalidSlot, message)
}

/// Resolves one end of a wire address; `Ok(None)` when nothing is addressed.
fn resolve(slot_type: &str, index: i64, equip: &str) -> Result<Option<SlotRef>, Failure> {
    let kind = match (slot_type, equip) {
        ("", "") => return Ok(None),
        ("", _) => ContainerKind::Equipment,
        (name, _) => ContainerKind::from_name(name)
            .ok_or_else(|| invalid_slot(format!("unknown slot type '{name}'")))?,
    };
    let parse_index = || {
        usize::try_from(index)
            .map_err(|_| invalid_slot(format!("invalid {} index {index}", kind.name())))
    };
    let slot = match kind {
        ContainerKind::Equipment => SlotRef::Equipment(
            EquipmentSlot::from_name(equip)
                .ok_or_else(|| invalid_slot(format!("unknown equipment slot '{equip}'")))?,
        ),
        ContainerKind::General => SlotRef::General(parse_index()?),
        ContainerKind::Backpack => SlotRef::Backpack(parse_index()?),
        ContainerKind::Vault => SlotRef::Vault(parse_index()?),
    };
    Ok(Some(slot))
}

fn required(slot: Option<SlotRef>, end: &str) -> Result<SlotRef, Failure> {
    slot.ok_or_else(|| invalid_slot(format!("{end} slot is required")))
}

fn equipment(slot: SlotRef, end: &str) -> Result<EquipmentSlot, Failure> {
    match slot {
        SlotRef::Equipment(name) => Ok(name),
        other => Err(invalid_slot(format!("{end} must be an equipment slot, got {other}"))),
    }
}

fn quantity(value: i64) -> Result<u32, Failure> {
    u32::try_from(value)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or_else(|| {
            Failure::new(
                FailureKind::QuantityOutOfRange,
                format!("invalid quantity {value}"),
            )
        })
}

impl TryFrom<&ActionRequest> for Action {
    type Error = Failure;

    fn try_from(request: &ActionRequest) -> Result<Self, Self::Error> {
        if request.item_id.is_empty() {
            return Err(Failure::new(FailureKind::ItemNotFound, "no item specified"));
        }
        let item_id = request.item_id.clone();
        let from = resolve(&request.from_slot_type, request.from_slot, &request.from_equip)?;
        let to = resolve(&request.to_slot_type, request.to_slot, &request.to_equip)?;

        Ok(match request.action {
            ActionKind::Equip => Self::Equip {
                item_id,
                from: required(from, "source")?,
                to: equipment(required(to, "destination")?, "destination")?,
            },
            ActionKind::Unequip => Self::Unequip {
                item_id,
                from: equipment(required(from, "source")?, "source")?,
            },
            ActionKind::Move => Self::Move {
                item_id,
                from: required(from, "source")?,
                to: required(to, "destination")?,
            },
            ActionKind::Stack => Self::Stack {
                item_id,
                from: required(from, "source")?,
                to: required(to, "destination")?,
            },
            ActionKind::Split => Self::Split {
                item_id,
                from: required(from, "source")?,
                to,
                quantity: quantity(request.quantity)?,
            },
            ActionKind::Drop => Self::Drop {
                item_id,
                from: required(from, "source")?,
                quantity: quantity(request.quantity)?,
            },
            ActionKind::Use => Self::Use {
                item_id,
                from: required(from, "source")?,
            },
        })
    }
}

/// The result of an action as sent to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    /// Whether the action was applied.
    pub success: bool,
    /// The authoritative snapshot after a successful action.
    #[serde(rename = "newState", default, skip_serializing_if = "Option::is_none")]
    pub new_state: Option<Inventory>,
    /// Human-readable outcome.
    pub message: String,
    /// Rejection reason after a failed action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureKind>,
}

impl ActionResponse {
    /// A success carrying the new snapshot.
    #[must_use]
    pub fn applied(new_state: Inventory, message: impl Into<String>) -> Self {
        Self {
            success: true,
            new_state: Some(new_state),
            message: message.into(),
            error: None,
        }
    }

    /// A rejection.
    #[must_use]
    pub fn rejected(failure: &Failure) -> Self {
        Self {
            success: false,
            new_state: None,
            message: failure.message.clone(),
            error: Some(failure.kind),
        }
    }

    /// Splits the response into the new snapshot or the failure.
    ///
    /// # Errors
    ///
    /// Returns the carried failure for an unsuccessful response, and an
    /// `InternalInconsistency` failure for a success without a snapshot.
    pub fn into_result(self) -> Result<(Inventory, String), Failure> {
        match (self.success, self.new_state) {
            (true, Some(state)) => Ok((state, self.message)),
            (true, None) => Err(Failure::new(
                FailureKind::InternalInconsistency,
                "successful response carried no state",
            )),
            (false, _) => Err(Failure::new(
                self.error.unwrap_or(FailureKind::InternalInconsistency),
                self.message,
            )),
        }
    }
}
