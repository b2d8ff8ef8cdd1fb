//! Typed rejections returned by inventory operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an inventory operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The item is absent from the addressed slot or unknown to the catalog.
    ItemNotFound,
    /// The destination holds something the operation cannot combine with.
    SlotOccupiedIncompatible,
    /// The item may not be worn in the addressed equipment slot.
    GearSlotMismatch,
    /// No room for the item.
    CapacityExceeded,
    /// The requested quantity is outside the permitted range.
    QuantityOutOfRange,
    /// `use` on an item that cannot be consumed.
    NotConsumable,
    /// The source slot is empty.
    SourceEmpty,
    /// The request does not belong to an open session.
    NoActiveSession,
    /// Stored state violates an inventory invariant.
    InternalInconsistency,
    /// The slot address is malformed or out of range.
    InvalidSlot,
    /// The vault is not reachable from the current location.
    VaultUnreachable,
}

impl FailureKind {
    /// The wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ItemNotFound => "ItemNotFound",
            Self::SlotOccupiedIncompatible => "SlotOccupiedIncompatible",
            Self::GearSlotMismatch => "GearSlotMismatch",
            Self::CapacityExceeded => "CapacityExceeded",
            Self::QuantityOutOfRange => "QuantityOutOfRange",
            Self::NotConsumable => "NotConsumable",
            Self::SourceEmpty => "SourceEmpty",
            Self::NoActiveSession => "NoActiveSession",
            Self::InternalInconsistency => "InternalInconsistency",
            Self::InvalidSlot => "InvalidSlot",
            Self::VaultUnreachable => "VaultUnreachable",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected operation: the kind plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct Failure {
    /// Machine-readable reason.
    pub kind: FailureKind,
    /// Message suitable for display to the player.
    pub message: String,
}

impl Failure {
    /// Creates a failure.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
